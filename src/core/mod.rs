//! Core logger types and traits

pub mod appender;
pub mod call_site;
pub mod config;
pub mod error;
pub mod file_header;
pub mod line_wrapper;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pretty;
pub mod render;
pub mod throwable;
pub mod timestamp;

pub use appender::{AppendFileWriter, Appender, FileWriter};
pub use call_site::{CallSiteResolver, CallStackProvider, FixedStackProvider, NativeStackProvider, StackFrame, TagHead};
pub use config::{Config, ConsoleObserver, FileObserver, Settings, SharedConfig};
pub use error::{LoggerError, Result};
pub use file_header::FileHeader;
pub use line_wrapper::LineWrapper;
pub use log_entry::{LogEntry, LogRequest, Target};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use render::{FormatHint, FormatterRegistry, Json, Loggable, ValueKind, ValueRenderer};
pub use throwable::Throwable;
pub use timestamp::{Clock, FixedClock, SystemClock};
