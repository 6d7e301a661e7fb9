//! # Rust Log Utils
//!
//! A developer logging utility: framed, tagged console output with call-site
//! headers, and date-rotated log files with retention cleanup written from a
//! background worker.
//!
//! ## Features
//!
//! - **Call-Site Headers**: Thread, type, function, file and line of every call
//! - **Framed Output**: Optional box borders, long messages split into units
//! - **Pretty Printing**: JSON and XML bodies, arrays, error chains
//! - **Daily Files**: One file per day with a header block and retention
//! - **Thread Safe**: Share one `Logger` across threads

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender};
    pub use crate::core::{
        Appender, Config, FormatHint, Json, LogEntry, LogLevel, LogRequest, Loggable, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Result, Settings, StackFrame, Throwable,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender};
pub use core::{
    Appender, Config, FormatHint, Json, LogEntry, LogLevel, LogRequest, Loggable, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Result, Settings, StackFrame, Throwable,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
