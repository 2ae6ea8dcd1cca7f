//! Environment variable utilities.
//!
//! Generic `env_get<T>` function for parsing environment variables with
//! defaults. Used to let `TENSORPOOL_*` variables override `CpuDeviceConfig`
//! tunables without threading a config object through test helpers.
//!
//! # Usage
//!
//! ```ignore
//! use tensorpool_core::env::{env_get, env_get_bool};
//!
//! let threads: usize = env_get("TENSORPOOL_THREADS", 0);
//! let debug: bool = env_get_bool("TENSORPOOL_DEBUG", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type `T`, or return default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean.
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true.
/// Everything else (including unset) returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as an optional value.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Get environment variable as string, or return default.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value).
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var(key).is_ok()
}
