//! Minimal structured logger, used only for diagnostics about the engine itself
//! (grammar-construction problems, escape-buffer overflow, history eviction) — never for
//! the user-facing prompt/echo/error output, which always goes through the caller's print
//! sink instead.
//!
//! Mirrors the no_std/hosted split of a typical embedded logging facade: a
//! `critical_section`-guarded global under `no_std`, a `std::sync::Mutex`-guarded one under
//! `hosted`.

#[cfg(feature = "hosted")]
use std::sync::{Mutex, Once};

#[cfg(not(feature = "hosted"))]
use core::cell::RefCell;
#[cfg(not(feature = "hosted"))]
use critical_section::Mutex;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[94m";
const GRAY: &str = "\x1b[90m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn color(self) -> &'static str {
        match self {
            LogLevel::Error => RED,
            LogLevel::Warn => YELLOW,
            LogLevel::Info => GREEN,
            LogLevel::Debug => BLUE,
            LogLevel::Trace => GRAY,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => " WARN",
            LogLevel::Info => " INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    pub const fn is_enabled(self, min_level: LogLevel) -> bool {
        (self as u8) <= (min_level as u8)
    }
}

/// Capability used by the global logger to emit a finished line.
pub trait UnifiedWriter {
    fn write_str(&mut self, s: &str);
    fn flush(&mut self) {}
}

struct LoggerState {
    min_level: LogLevel,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[cfg(feature = "hosted")]
static INIT: Once = Once::new();
#[cfg(feature = "hosted")]
static mut GLOBAL_STATE: Option<Mutex<LoggerState>> = None;

#[cfg(feature = "hosted")]
pub fn set_min_level(level: LogLevel) {
    INIT.call_once(|| unsafe {
        GLOBAL_STATE = Some(Mutex::new(LoggerState::default()));
    });
    if let Some(state) = unsafe { &GLOBAL_STATE } {
        if let Ok(mut guard) = state.lock() {
            guard.min_level = level;
        }
    }
}

#[cfg(feature = "hosted")]
pub fn log_with_level(level: LogLevel, message: &str) {
    INIT.call_once(|| unsafe {
        GLOBAL_STATE = Some(Mutex::new(LoggerState::default()));
    });
    let min_level = unsafe { &GLOBAL_STATE }
        .as_ref()
        .and_then(|s| s.lock().ok().map(|g| g.min_level))
        .unwrap_or(LogLevel::Info);
    if !level.is_enabled(min_level) {
        return;
    }
    println!("{}[{}]{} {}", level.color(), level.label(), RESET, message);
}

#[cfg(not(feature = "hosted"))]
static GLOBAL_STATE: Mutex<RefCell<LoggerState>> = Mutex::new(RefCell::new(LoggerState {
    min_level: LogLevel::Info,
}));
#[cfg(not(feature = "hosted"))]
static GLOBAL_WRITER: Mutex<RefCell<Option<&'static mut dyn UnifiedWriter>>> =
    Mutex::new(RefCell::new(None));

#[cfg(not(feature = "hosted"))]
pub fn init_logger(writer: &'static mut dyn UnifiedWriter) {
    critical_section::with(|cs| {
        *GLOBAL_WRITER.borrow_ref_mut(cs) = Some(writer);
    });
}

#[cfg(not(feature = "hosted"))]
pub fn set_min_level(level: LogLevel) {
    critical_section::with(|cs| {
        GLOBAL_STATE.borrow_ref_mut(cs).min_level = level;
    });
}

#[cfg(not(feature = "hosted"))]
pub fn log_with_level(level: LogLevel, message: &str) {
    critical_section::with(|cs| {
        if !level.is_enabled(GLOBAL_STATE.borrow_ref(cs).min_level) {
            return;
        }
        if let Some(writer) = GLOBAL_WRITER.borrow_ref_mut(cs).as_mut() {
            writer.write_str(level.color());
            writer.write_str("[");
            writer.write_str(level.label());
            writer.write_str("] ");
            writer.write_str(message);
            writer.write_str(RESET);
            writer.write_str("\r\n");
            writer.flush();
        }
    });
}

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {{
        #[cfg(not(feature = "hosted"))]
        {
            use ::core::fmt::Write as _;
            let mut msg_buf = ::heapless::String::<128>::new();
            let _ = ::core::write!(&mut msg_buf, $($arg)*);
            $crate::log::log_with_level($level, msg_buf.as_str());
        }
        #[cfg(feature = "hosted")]
        {
            $crate::log::log_with_level($level, &::std::format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log!($crate::log::LogLevel::Error, $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log!($crate::log::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log!($crate::log::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log!($crate::log::LogLevel::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::log!($crate::log::LogLevel::Trace, $($arg)*) };
}
