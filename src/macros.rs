//! Logging macros that record their own call site.
//!
//! Each macro passes the caller's function path, file and line to the
//! logger, so headers and derived tags work without debug symbols.
//! Values are anything implementing [`Loggable`](crate::Loggable); more than
//! one value is logged as an `args[i] = ...` list.
//!
//! # Examples
//!
//! ```
//! use rust_log_utils::prelude::*;
//! use rust_log_utils::{debug, info};
//!
//! let logger = Logger::builder().silent_console().build().unwrap();
//!
//! // Tag derived from this file
//! debug!(logger, 42);
//!
//! // Explicit tag and several values
//! let user_id = 7;
//! info!(logger, tag: "Auth"; "login", user_id);
//! ```

/// Fully qualified path of the enclosing function.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`StackFrame`](crate::core::StackFrame) of the macro's own location.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::StackFrame::from_function_path($crate::function_path!(), file!(), line!())
    };
}

/// Log values at a given level.
///
/// # Examples
///
/// ```
/// # use rust_log_utils::prelude::*;
/// # let logger = Logger::builder().silent_console().build().unwrap();
/// use rust_log_utils::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, tag: "Db"; "Error code", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, tag: $tag:expr; $($value:expr),+ $(,)?) => {
        $logger.emit(
            $crate::core::LogRequest::new($level).tag($tag).at($crate::call_site!()),
            &[$(&$value as &dyn $crate::Loggable),+],
        )
    };
    ($logger:expr, $level:expr, $($value:expr),+ $(,)?) => {
        $crate::log!($logger, $level, tag: ""; $($value),+)
    };
}

/// Log at verbose level.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log at debug level.
///
/// # Examples
///
/// ```
/// # use rust_log_utils::prelude::*;
/// # let logger = Logger::builder().silent_console().build().unwrap();
/// use rust_log_utils::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, tag: "Cache"; "hits", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at assert level, the highest severity.
#[macro_export]
macro_rules! log_assert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Assert, $($arg)+)
    };
}

/// Pretty-print a JSON string or serializable value.
///
/// # Examples
///
/// ```
/// # use rust_log_utils::prelude::*;
/// # let logger = Logger::builder().silent_console().build().unwrap();
/// use rust_log_utils::log_json;
/// log_json!(logger, r#"{"id":1}"#);
/// log_json!(logger, LogLevel::Info, "Api", r#"[1,2,3]"#);
/// ```
#[macro_export]
macro_rules! log_json {
    ($logger:expr, $value:expr) => {
        $crate::log_json!($logger, $crate::LogLevel::Debug, "", $value)
    };
    ($logger:expr, $level:expr, $tag:expr, $value:expr) => {
        $logger.emit(
            $crate::core::LogRequest::new($level)
                .tag($tag)
                .hint($crate::FormatHint::Json)
                .at($crate::call_site!()),
            &[&$value as &dyn $crate::Loggable],
        )
    };
}

/// Pretty-print an XML string.
#[macro_export]
macro_rules! log_xml {
    ($logger:expr, $value:expr) => {
        $crate::log_xml!($logger, $crate::LogLevel::Debug, "", $value)
    };
    ($logger:expr, $level:expr, $tag:expr, $value:expr) => {
        $logger.emit(
            $crate::core::LogRequest::new($level)
                .tag($tag)
                .hint($crate::FormatHint::Xml)
                .at($crate::call_site!()),
            &[&$value as &dyn $crate::Loggable],
        )
    };
}

/// Write to the log file only.
#[macro_export]
macro_rules! log_file {
    ($logger:expr, $value:expr) => {
        $crate::log_file!($logger, $crate::LogLevel::Debug, "", $value)
    };
    ($logger:expr, $level:expr, $tag:expr, $value:expr) => {
        $logger.emit(
            $crate::core::LogRequest::new($level)
                .tag($tag)
                .file_only()
                .at($crate::call_site!()),
            &[&$value as &dyn $crate::Loggable],
        )
    };
}
