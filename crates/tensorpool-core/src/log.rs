//! Minimal leveled logging, built on `eprintln!` rather than an external
//! logging crate.
//!
//! The level is configured once (programmatically, or via the
//! `TENSORPOOL_LOG_LEVEL` environment variable, see [`crate::env`]) and
//! read on every call — there is no per-call allocation beyond the
//! formatted message itself.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::env::env_get_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_str_lossy(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static LEVEL_INIT: std::sync::Once = std::sync::Once::new();

fn ensure_init() {
    LEVEL_INIT.call_once(|| {
        let raw = env_get_str("TENSORPOOL_LOG_LEVEL", "info");
        if let Some(level) = LogLevel::from_str_lossy(&raw) {
            LEVEL.store(level as u8, Ordering::Relaxed);
        }
    });
}

/// Override the active log level programmatically (tests, embedders).
pub fn set_level(level: LogLevel) {
    ensure_init();
    LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn current_level() -> LogLevel {
    ensure_init();
    match LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Off,
        1 => LogLevel::Error,
        2 => LogLevel::Warn,
        3 => LogLevel::Info,
        4 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

#[doc(hidden)]
pub fn enabled(level: LogLevel) -> bool {
    current_level() >= level
}

#[doc(hidden)]
pub fn emit(level: &str, args: std::fmt::Arguments<'_>) {
    eprintln!("[tensorpool {}] {}", level, args);
}

#[macro_export]
macro_rules! tp_error {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Error) {
            $crate::log::emit("error", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! tp_warn {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Warn) {
            $crate::log::emit("warn", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! tp_info {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Info) {
            $crate::log::emit("info", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! tp_debug {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Debug) {
            $crate::log::emit("debug", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! tp_trace {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Trace) {
            $crate::log::emit("trace", format_args!($($arg)*));
        }
    };
}
