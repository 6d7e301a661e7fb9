//! Appender implementations

pub mod console;
pub mod retention;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use retention::RetentionPolicy;
pub use rotating_file::RotatingFileAppender;

pub use crate::core::Appender;
