//! Device configuration: the minimal external descriptor plus the
//! richer, env-overridable builder the facade crate actually constructs
//! a device from.

use tensorpool_core::constants::{DEFAULT_GROWTH_SCALE, DEFAULT_NUMEL_THRESHOLD};
use tensorpool_core::env::{env_get, env_get_bool};
use tensorpool_core::error::{PoolError, PoolResult};

/// The device type a descriptor names. Only `Cpu` exists today; the
/// variant exists so the external interface doesn't have to change if a
/// second device type is added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Cpu,
}

/// Minimal external device-creation interface: `{ type, thread_count }`.
/// `thread_count == 0` means "use hardware concurrency".
#[derive(Debug, Clone, Copy)]
pub struct DeviceDescriptor {
    pub device_type: DeviceType,
    pub thread_count: usize,
}

impl Default for DeviceDescriptor {
    fn default() -> Self {
        Self { device_type: DeviceType::Cpu, thread_count: 0 }
    }
}

/// Builder-style device configuration, mirroring the reference
/// scheduler config this workspace is built around: explicit field
/// setters, a `Default`, and a `validate()` that rejects nonsensical
/// tunables before a device is constructed.
#[derive(Debug, Clone)]
pub struct CpuDeviceConfig {
    pub thread_count: usize,
    pub growth_scale: f64,
    pub numel_threshold: usize,
    pub debug_logging: bool,
}

impl Default for CpuDeviceConfig {
    fn default() -> Self {
        Self {
            thread_count: 0,
            growth_scale: DEFAULT_GROWTH_SCALE,
            numel_threshold: DEFAULT_NUMEL_THRESHOLD,
            debug_logging: false,
        }
    }
}

impl CpuDeviceConfig {
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = n;
        self
    }

    pub fn growth_scale(mut self, g: f64) -> Self {
        self.growth_scale = g;
        self
    }

    pub fn numel_threshold(mut self, t: usize) -> Self {
        self.numel_threshold = t;
        self
    }

    pub fn debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Build a config from defaults overridden by `TENSORPOOL_*`
    /// environment variables, then by the fields already set on `self`.
    /// Call this before any explicit builder methods to let env vars act
    /// as defaults rather than overrides.
    pub fn from_env() -> Self {
        Self {
            thread_count: env_get("TENSORPOOL_THREADS", 0),
            growth_scale: env_get("TENSORPOOL_GROWTH_SCALE", DEFAULT_GROWTH_SCALE),
            numel_threshold: env_get("TENSORPOOL_NUMEL_THRESHOLD", DEFAULT_NUMEL_THRESHOLD),
            debug_logging: env_get_bool("TENSORPOOL_DEBUG", false),
        }
    }

    pub fn validate(&self) -> PoolResult<()> {
        if !(self.growth_scale > 0.0) || !self.growth_scale.is_finite() {
            return Err(PoolError::InvalidConfig(format!(
                "growth_scale must be a positive finite number, got {}",
                self.growth_scale
            )));
        }
        Ok(())
    }
}

impl From<DeviceDescriptor> for CpuDeviceConfig {
    fn from(descriptor: DeviceDescriptor) -> Self {
        Self { thread_count: descriptor.thread_count, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_passes_validation() {
        assert!(CpuDeviceConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_growth_scale_is_rejected() {
        let cfg = CpuDeviceConfig::default().growth_scale(0.0);
        assert!(matches!(cfg.validate(), Err(PoolError::InvalidConfig(_))));
        let cfg = CpuDeviceConfig::default().growth_scale(-1.0);
        assert!(matches!(cfg.validate(), Err(PoolError::InvalidConfig(_))));
    }

    #[test]
    fn builder_methods_compose() {
        let cfg = CpuDeviceConfig::default().thread_count(4).growth_scale(0.5).numel_threshold(1000);
        assert_eq!(cfg.thread_count, 4);
        assert_eq!(cfg.growth_scale, 0.5);
        assert_eq!(cfg.numel_threshold, 1000);
    }

    #[test]
    fn descriptor_converts_with_device_defaults() {
        let descriptor = DeviceDescriptor { device_type: DeviceType::Cpu, thread_count: 6 };
        let cfg: CpuDeviceConfig = descriptor.into();
        assert_eq!(cfg.thread_count, 6);
        assert_eq!(cfg.growth_scale, DEFAULT_GROWTH_SCALE);
    }

    #[test]
    fn env_overrides_are_picked_up() {
        std::env::set_var("TENSORPOOL_GROWTH_SCALE", "0.75");
        std::env::set_var("TENSORPOOL_NUMEL_THRESHOLD", "1024");
        let cfg = CpuDeviceConfig::from_env();
        assert_eq!(cfg.growth_scale, 0.75);
        assert_eq!(cfg.numel_threshold, 1024);
        std::env::remove_var("TENSORPOOL_GROWTH_SCALE");
        std::env::remove_var("TENSORPOOL_NUMEL_THRESHOLD");
    }
}
