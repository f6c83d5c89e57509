//! FILENAME: core/engine/src/logging.rs
// PURPOSE: Category-tagged logging for the engine.
// CONTEXT: Lines use the SEQ|LEVEL|CATEGORY|message layout and go through the
//          `log` facade under the `calcexp` target, so the host application
//          chooses the sink. Categories in use: EVAL, REG, GRAM.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Target every engine log line is emitted under.
pub const TARGET: &str = "calcexp";

/// Sequence counter shared by every evaluator in the process
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

fn level_letter(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
}

/// Write a log line in unified format
pub fn write_log(level: log::Level, category: &str, message: fmt::Arguments<'_>) {
    if log::log_enabled!(target: TARGET, level) {
        log::log!(
            target: TARGET,
            level,
            "{}|{}|{}|{}",
            next_seq(),
            level_letter(level),
            category,
            message
        );
    }
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: log::Level, category: &str, func_name: &str, params: fmt::Arguments<'_>) {
    write_log(level, category, format_args!("ENTER {} {}", func_name, params));
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: log::Level, category: &str, func_name: &str, result: fmt::Arguments<'_>) {
    write_log(level, category, format_args!("EXIT {} {}", func_name, result));
}

// ============================================================================
// MACRO DEFINITIONS
// ============================================================================

macro_rules! log_trace {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log(::log::Level::Trace, $cat, format_args!($($arg)*))
    };
}

macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log(::log::Level::Debug, $cat, format_args!($($arg)*))
    };
}

macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log(::log::Level::Warn, $cat, format_args!($($arg)*))
    };
}

macro_rules! log_enter {
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter(::log::Level::Debug, $cat, $func, format_args!($($arg)*))
    };
}

macro_rules! log_exit {
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit(::log::Level::Debug, $cat, $func, format_args!($($arg)*))
    };
}

// Re-export the macros so they can be imported via `use crate::logging::log_debug;`
pub(crate) use log_debug;
pub(crate) use log_enter;
pub(crate) use log_exit;
pub(crate) use log_trace;
pub(crate) use log_warn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let first = next_seq();
        let second = next_seq();
        assert!(second > first);
    }

    #[test]
    fn level_letters_match_unified_format() {
        assert_eq!(level_letter(log::Level::Debug), "D");
        assert_eq!(level_letter(log::Level::Warn), "W");
    }
}
