//! Error types for the tensorpool CPU backend.
//!
//! Most faults in this crate are invariant violations (out-of-bounds
//! storage access, a worker thread that failed to spawn or join) and are
//! handled by aborting with a diagnostic rather than by propagating a
//! `Result` across a thread boundary — see the pool and device modules.
//! `PoolError` exists so those abort sites have a structured, printable
//! diagnostic, and so purely local failures (config validation) can
//! return `Result` the normal way.

use std::fmt;

/// Result alias used throughout the crate for the non-fatal error paths.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors produced by the tensorpool CPU backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    /// A device or pool operation was attempted before initialization.
    NotInitialized,
    /// A device or pool was initialized twice.
    AlreadyInitialized,
    /// A storage access fell outside `[base, base + size)`.
    OutOfBounds { offset: usize, len: usize, size: usize },
    /// The allocator returned null for an aligned allocation request.
    AllocationFailed { size: usize, align: usize },
    /// `std::thread::Builder::spawn` failed for a worker thread.
    SpawnFailed(String),
    /// A worker thread panicked instead of returning cleanly on join.
    JoinPanicked(usize),
    /// The requested device configuration was rejected by `validate()`.
    InvalidConfig(String),
    /// Backward execution was requested; it is not implemented.
    BackwardNotImplemented,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::NotInitialized => write!(f, "tensorpool: device not initialized"),
            PoolError::AlreadyInitialized => write!(f, "tensorpool: device already initialized"),
            PoolError::OutOfBounds { offset, len, size } => write!(
                f,
                "tensorpool: storage access [{}, {}) out of bounds for buffer of size {}",
                offset,
                offset + len,
                size
            ),
            PoolError::AllocationFailed { size, align } => write!(
                f,
                "tensorpool: failed to allocate {} bytes at alignment {}",
                size, align
            ),
            PoolError::SpawnFailed(msg) => write!(f, "tensorpool: worker spawn failed: {}", msg),
            PoolError::JoinPanicked(idx) => {
                write!(f, "tensorpool: worker {} panicked instead of exiting cleanly", idx)
            }
            PoolError::InvalidConfig(msg) => write!(f, "tensorpool: invalid device config: {}", msg),
            PoolError::BackwardNotImplemented => {
                write!(f, "tensorpool: backward execution is not implemented on the CPU device")
            }
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_every_variant() {
        let variants = [
            PoolError::NotInitialized,
            PoolError::AlreadyInitialized,
            PoolError::OutOfBounds { offset: 4, len: 8, size: 10 },
            PoolError::AllocationFailed { size: 64, align: 16 },
            PoolError::SpawnFailed("os error 11".into()),
            PoolError::JoinPanicked(2),
            PoolError::InvalidConfig("growth_scale must be > 0".into()),
            PoolError::BackwardNotImplemented,
        ];
        for v in variants {
            let rendered = v.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn is_std_error() {
        fn assert_err<E: std::error::Error>(_: &E) {}
        assert_err(&PoolError::NotInitialized);
    }
}
