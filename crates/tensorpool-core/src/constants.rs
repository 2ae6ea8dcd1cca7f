//! Compile-time defaults shared across the workspace.
//!
//! All of these are overridable at runtime (see [`crate::env`] and
//! `CpuDeviceConfig` in the `tensorpool-runtime` crate) — they exist here
//! only as the fallback values a fresh config starts from.

/// Byte alignment every storage buffer is allocated at.
pub const STORAGE_ALIGNMENT: usize = 16;

/// Default growth-scale factor `g` for the work-width heuristic.
pub const DEFAULT_GROWTH_SCALE: f64 = 0.3;

/// Default element-count threshold `T` below which a single thread runs.
pub const DEFAULT_NUMEL_THRESHOLD: usize = 250_000;

/// Hard ceiling on the number of worker threads a pool will allocate,
/// independent of what the host reports as available parallelism.
pub const MAX_WORKERS: usize = 256;

/// Fallback worker count used when the host fails to report hardware
/// concurrency (mirrors `std::thread::available_parallelism()`'s own
/// documented failure mode).
pub const DEFAULT_HARDWARE_CONCURRENCY: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        assert!(DEFAULT_GROWTH_SCALE > 0.0);
        assert!(DEFAULT_NUMEL_THRESHOLD > 0);
        assert!(STORAGE_ALIGNMENT.is_power_of_two());
    }
}
