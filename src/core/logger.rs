//! Main logger implementation

use super::{
    appender::{Appender, FileWriter},
    call_site::{CallSiteResolver, CallStackProvider, FixedStackProvider, StackFrame},
    config::{is_blank, Config, Settings, SharedConfig},
    error::Result,
    log_entry::{current_thread_name, LogEntry, LogRequest, Target},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    render::{FormatHint, FormatterRegistry, Loggable, ValueRenderer},
    timestamp::Clock,
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use chrono::{DateTime, Local};
use parking_lot::RwLockReadGuard;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for the file worker (5 seconds)
///
/// Used when the logger is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Entry point for logging
///
/// Each call is filtered by the switches and severity floors, annotated with
/// a tag and call-site header, rendered, and handed to the console appender
/// (synchronously) and the file appender (queued).
///
/// # Example
///
/// ```no_run
/// use rust_log_utils::prelude::*;
///
/// let logger = Logger::builder()
///     .file_switch(true)
///     .dir("/tmp/my-app/log")
///     .save_days(7)
///     .build()
///     .unwrap();
///
/// logger.d(&[&"connected", &42]);
/// logger.e_tag("Net", &[&"timeout"]);
/// logger.json(&r#"{"id":1,"ok":true}"#);
/// ```
pub struct Logger {
    config: SharedConfig,
    console: ConsoleAppender,
    file: RotatingFileAppender,
    metrics: Arc<LoggerMetrics>,
}

/// Config values needed after the read lock is released
struct Dispatch {
    resolver: CallSiteResolver,
    tag: String,
    formatters: Arc<FormatterRegistry>,
    stack_provider: Arc<dyn CallStackProvider>,
    timestamp: DateTime<Local>,
    to_console: bool,
    to_file: bool,
}

impl Logger {
    /// Logger with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Validate `config` and start the file worker
    pub fn with_config(config: Config) -> Result<Self> {
        Self::assemble(config, |console| console)
    }

    fn assemble(
        config: Config,
        console: impl FnOnce(ConsoleAppender) -> ConsoleAppender,
    ) -> Result<Self> {
        config.settings.validate()?;
        let config = config.into_shared();
        let metrics = Arc::new(LoggerMetrics::new());
        let file = RotatingFileAppender::new(Arc::clone(&config), Arc::clone(&metrics))?;
        let console = console(ConsoleAppender::new(Arc::clone(&config)));

        Ok(Self {
            config,
            console,
            file,
            metrics,
        })
    }

    /// Read access to the live configuration
    pub fn config(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read()
    }

    /// Change the configuration; applies to the next log call
    pub fn configure<F: FnOnce(&mut Config)>(&self, update: F) {
        let mut config = self.config.write();
        update(&mut config);
    }

    /// Render values of type `T` with `formatter` from now on
    pub fn register_formatter<T, F>(&self, formatter: F)
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let mut config = self.config.write();
        Arc::make_mut(&mut config.formatters).register::<T, F>(formatter);
    }

    /// Add an entry to the header of files created from now on
    pub fn add_file_extra_head(&self, key: &str, value: &str) {
        self.config.write().file_header.append(key, value);
    }

    /// Log `values` as described by `request`
    pub fn emit(&self, request: LogRequest<'_>, values: &[&dyn Loggable]) {
        let Some(dispatch) = self.prepare(&request) else {
            return;
        };

        let thread_name = current_thread_name();
        let tag_head = match request.call_site {
            Some(frame) => {
                // an explicit frame is the caller itself
                let resolver = CallSiteResolver { stack_offset: 0, ..dispatch.resolver };
                resolver.resolve(&dispatch.tag, &FixedStackProvider::single(frame), &thread_name)
            }
            None => dispatch
                .resolver
                .resolve(&dispatch.tag, dispatch.stack_provider.as_ref(), &thread_name),
        };
        let body = ValueRenderer::new(&dispatch.formatters).render_body(values, request.hint);
        let entry = LogEntry::new(request.level, tag_head, body, dispatch.timestamp);

        if dispatch.to_console {
            self.append_isolated(&self.console, &entry);
        }
        if dispatch.to_file && !self.append_isolated(&self.file, &entry) {
            self.metrics.record_dropped();
        }
    }

    /// Apply switches and floors; `None` means the call produces nothing
    fn prepare(&self, request: &LogRequest<'_>) -> Option<Dispatch> {
        let config = self.config.read();
        let settings = &config.settings;
        let level = request.level;
        let file_only = request.target == Target::FileOnly;

        if !settings.log_switch {
            return None;
        }
        if !(settings.console_switch || settings.file_switch || file_only) {
            return None;
        }
        if level < settings.console_filter && level < settings.file_filter {
            return None;
        }

        let to_console = settings.console_switch && !file_only && level >= settings.console_filter;
        let to_file = (settings.file_switch || file_only) && level >= settings.file_filter;
        if !to_console && !to_file {
            return None;
        }

        let global_tag = settings.global_tag();
        let tag = if is_blank(request.tag) {
            global_tag.to_string()
        } else if request.hint == FormatHint::Json && !global_tag.is_empty() {
            format!("{}-{}", global_tag, request.tag)
        } else {
            request.tag.to_string()
        };

        Some(Dispatch {
            resolver: CallSiteResolver::from(settings),
            tag,
            formatters: Arc::clone(&config.formatters),
            stack_provider: Arc::clone(&config.stack_provider),
            timestamp: config.clock.now(),
            to_console,
            to_file,
        })
    }

    /// Hand `entry` to one appender, isolating its errors and panics
    fn append_isolated(&self, appender: &dyn Appender, entry: &LogEntry) -> bool {
        let append_result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| appender.append(entry)));

        match append_result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                false
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                     Other appenders continue to function.",
                    appender.name(),
                    panic_msg
                );
                false
            }
        }
    }

    pub fn log(&self, level: LogLevel, tag: &str, values: &[&dyn Loggable]) {
        self.emit(LogRequest::new(level).tag(tag), values);
    }

    /// Log with an explicit caller frame instead of inspecting the stack
    pub fn log_at(&self, frame: StackFrame, level: LogLevel, tag: &str, values: &[&dyn Loggable]) {
        self.emit(LogRequest::new(level).tag(tag).at(frame), values);
    }

    #[inline]
    pub fn v(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Verbose, "", values);
    }

    #[inline]
    pub fn v_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Verbose, tag, values);
    }

    #[inline]
    pub fn d(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Debug, "", values);
    }

    #[inline]
    pub fn d_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Debug, tag, values);
    }

    #[inline]
    pub fn i(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Info, "", values);
    }

    #[inline]
    pub fn i_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Info, tag, values);
    }

    #[inline]
    pub fn w(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Warn, "", values);
    }

    #[inline]
    pub fn w_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Warn, tag, values);
    }

    #[inline]
    pub fn e(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Error, "", values);
    }

    #[inline]
    pub fn e_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Error, tag, values);
    }

    #[inline]
    pub fn a(&self, values: &[&dyn Loggable]) {
        self.log(LogLevel::Assert, "", values);
    }

    #[inline]
    pub fn a_tag(&self, tag: &str, values: &[&dyn Loggable]) {
        self.log(LogLevel::Assert, tag, values);
    }

    /// Pretty-print JSON at debug level
    pub fn json(&self, value: &dyn Loggable) {
        self.json_tag(LogLevel::Debug, "", value);
    }

    /// Pretty-print JSON; a non-blank `tag` is prefixed with the global tag
    pub fn json_tag(&self, level: LogLevel, tag: &str, value: &dyn Loggable) {
        self.emit(
            LogRequest::new(level).tag(tag).hint(FormatHint::Json),
            &[value],
        );
    }

    /// Pretty-print XML at debug level
    pub fn xml(&self, text: &str) {
        self.xml_tag(LogLevel::Debug, "", text);
    }

    pub fn xml_tag(&self, level: LogLevel, tag: &str, text: &str) {
        let text = text.to_string();
        self.emit(LogRequest::new(level).tag(tag).hint(FormatHint::Xml), &[&text]);
    }

    /// Write to the log file only, even when the file switch is off
    pub fn file(&self, value: &dyn Loggable) {
        self.file_tag(LogLevel::Debug, "", value);
    }

    pub fn file_tag(&self, level: LogLevel, tag: &str, value: &dyn Loggable) {
        self.emit(LogRequest::new(level).tag(tag).file_only(), &[value]);
    }

    /// File that entries logged now go to
    pub fn current_log_file_path(&self) -> PathBuf {
        self.file.current_path()
    }

    /// Existing log files in the configured directory
    pub fn log_files(&self) -> Result<Vec<PathBuf>> {
        self.file.log_files()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_utils::Logger;
    ///
    /// let logger = Logger::new().unwrap();
    ///
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Total logged: {}", metrics.total_logged());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush the console and wait for queued file work
    pub fn flush(&self) -> Result<()> {
        self.console.flush()?;
        self.file.flush()
    }

    /// Stop the file worker after it drains the queue
    ///
    /// Returns `false` if it did not finish within `timeout`. Later file
    /// writes are reported and dropped.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_log_utils::{Logger, DEFAULT_SHUTDOWN_TIMEOUT};
    ///
    /// let mut logger = Logger::new().unwrap();
    /// logger.file(&"Important message");
    ///
    /// if !logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
    ///     eprintln!("Warning: logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let finished = self.file.shutdown(timeout);
        if let Err(e) = self.console.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }
        finished
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        // Report any dropped logs
        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_log_utils::prelude::*;
///
/// let logger = Logger::builder()
///     .console_filter(LogLevel::Debug)
///     .global_tag("App")
///     .border_switch(false)
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: Config,
    silent_console: bool,
    use_colors: Option<bool>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            silent_console: false,
            use_colors: None,
        }
    }

    /// Replace all plain settings at once
    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.config.settings = settings;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_switch(mut self, on: bool) -> Self {
        self.config.settings.log_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_switch(mut self, on: bool) -> Self {
        self.config.settings.console_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_switch(mut self, on: bool) -> Self {
        self.config.settings.file_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn border_switch(mut self, on: bool) -> Self {
        self.config.settings.border_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn head_switch(mut self, on: bool) -> Self {
        self.config.settings.head_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn single_tag_switch(mut self, on: bool) -> Self {
        self.config.settings.single_tag_switch = on;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_filter(mut self, level: LogLevel) -> Self {
        self.config.settings.console_filter = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_filter(mut self, level: LogLevel) -> Self {
        self.config.settings.file_filter = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_tag(mut self, tag: &str) -> Self {
        self.config.settings.set_global_tag(tag);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.settings.set_dir(dir.as_ref());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_prefix(mut self, prefix: &str) -> Self {
        self.config.settings.set_file_prefix(prefix);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_extension(mut self, extension: &str) -> Self {
        self.config.settings.set_file_extension(extension);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn process_name(mut self, name: &str) -> Self {
        self.config.settings.set_process_name(name);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_deep(mut self, depth: usize) -> Self {
        self.config.settings.stack_deep = depth;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_offset(mut self, offset: usize) -> Self {
        self.config.settings.stack_offset = offset;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn save_days(mut self, days: i64) -> Self {
        self.config.settings.save_days = days;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_extra_head(mut self, key: &str, value: &str) -> Self {
        self.config.file_header.append(key, value);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter<T, F>(mut self, formatter: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.config.formatters).register::<T, F>(formatter);
        self
    }

    /// Replace the default file append
    #[must_use = "builder methods return a new value"]
    pub fn file_writer<W: FileWriter + 'static>(mut self, writer: W) -> Self {
        self.config.file_writer = Some(Arc::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_console_output<F>(mut self, observer: F) -> Self
    where
        F: Fn(LogLevel, &str, &str) + Send + Sync + 'static,
    {
        self.config.on_console_output = Some(Arc::new(observer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_file_output<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Path, &str) + Send + Sync + 'static,
    {
        self.config.on_file_output = Some(Arc::new(observer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.config.clock = Arc::new(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_provider<P: CallStackProvider + 'static>(mut self, provider: P) -> Self {
        self.config.stack_provider = Arc::new(provider);
        self
    }

    /// Skip printing console units; observers are still called
    #[must_use = "builder methods return a new value"]
    pub fn silent_console(mut self) -> Self {
        self.silent_console = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    /// Build the Logger
    ///
    /// Fails if the settings do not validate or the file worker cannot start.
    pub fn build(self) -> Result<Logger> {
        let silent = self.silent_console;
        let use_colors = self.use_colors;
        Logger::assemble(self.config, |console| {
            let console = match use_colors {
                Some(use_colors) => console.with_colors(use_colors),
                None => console,
            };
            if silent {
                console.silent()
            } else {
                console
            }
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::core::timestamp::FixedClock;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    type Captured = Arc<Mutex<Vec<(LogLevel, String, String)>>>;

    fn caller() -> StackFrame {
        StackFrame::new("app::Service", "run", Some("service.rs".to_string()), 12)
    }

    fn capturing_builder() -> (LoggerBuilder, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let builder = Logger::builder()
            .silent_console()
            .stack_provider(FixedStackProvider::single(caller()))
            .on_console_output(move |level, tag, unit| {
                sink.lock().push((level, tag.to_string(), unit.to_string()));
            });
        (builder, captured)
    }

    #[test]
    fn test_builder_basic() {
        let logger = Logger::builder().console_filter(LogLevel::Debug).build().unwrap();
        assert_eq!(logger.config().settings.console_filter, LogLevel::Debug);
        assert_eq!(logger.metrics().dropped_count(), 0);
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let result = Logger::builder().stack_deep(0).build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_tag_derived_from_caller_file() {
        let (builder, captured) = capturing_builder();
        let logger = builder.border_switch(false).build().unwrap();

        logger.d(&[&42]);

        let captured = captured.lock();
        assert_eq!(captured.len(), 1);
        let (level, tag, unit) = &captured[0];
        assert_eq!(*level, LogLevel::Debug);
        assert_eq!(tag, "service");
        let thread = current_thread_name();
        assert_eq!(
            unit,
            &format!(" \n{}, app::Service.run(service.rs:12)\n42", thread)
        );
    }

    #[test]
    fn test_level_below_floor_is_suppressed() {
        let (builder, captured) = capturing_builder();
        let logger = builder.console_filter(LogLevel::Warn).build().unwrap();

        logger.i(&[&"quiet"]);
        logger.w(&[&"loud"]);

        let captured = captured.lock();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].0, LogLevel::Warn);
    }

    #[test]
    fn test_log_switch_off_suppresses_everything() {
        let (builder, captured) = capturing_builder();
        let logger = builder.log_switch(false).build().unwrap();
        logger.a(&[&"nothing"]);
        assert!(captured.lock().is_empty());
    }

    #[test]
    fn test_global_tag_and_json_prefix() {
        let (builder, captured) = capturing_builder();
        let logger = builder
            .global_tag("App")
            .head_switch(false)
            .border_switch(false)
            .build()
            .unwrap();

        logger.i(&[&"a"]);
        logger.i_tag("Net", &[&"b"]);
        logger.json_tag(LogLevel::Info, "Net", &r#"{"k":1}"#);

        let tags: Vec<String> = captured.lock().iter().map(|(_, tag, _)| tag.clone()).collect();
        assert_eq!(tags, vec!["App", "Net", "App-Net"]);
        assert_eq!(captured.lock()[2].2, "{\n  \"k\": 1\n}");
    }

    #[test]
    fn test_registered_formatter_used() {
        #[derive(Debug)]
        struct Celsius(f64);
        impl Loggable for Celsius {}

        let (builder, captured) = capturing_builder();
        let logger = builder.head_switch(false).border_switch(false).build().unwrap();
        logger.register_formatter::<Celsius, _>(|c| format!("{:.1}°C", c.0));

        logger.i(&[&Celsius(21.456)]);
        assert_eq!(captured.lock()[0].2, "21.5°C");
    }

    #[test]
    fn test_configure_at_runtime() {
        let (builder, captured) = capturing_builder();
        let logger = builder.build().unwrap();

        logger.configure(|config| config.settings.console_switch = false);
        logger.i(&[&"hidden"]);
        assert!(captured.lock().is_empty());

        logger.configure(|config| config.settings.console_switch = true);
        logger.i(&[&"shown"]);
        assert_eq!(captured.lock().len(), 1);
    }

    #[test]
    fn test_file_only_entry_point() {
        let dir = TempDir::new().unwrap();
        let clock = FixedClock::at_local(2024, 1, 6, 9, 15, 0);
        let (builder, captured) = capturing_builder();
        let logger = builder
            .dir(dir.path())
            .file_prefix("app")
            .process_name("proc")
            .head_switch(false)
            .clock(clock)
            .build()
            .unwrap();

        logger.file_tag(LogLevel::Info, "Disk", &"only in file");
        logger.flush().unwrap();

        assert!(captured.lock().is_empty());
        let path = logger.current_log_file_path();
        assert_eq!(path, dir.path().join("app_2024_01_06_proc.txt"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("09:15:00.000 I/Disk: only in file\n"));
        assert_eq!(logger.log_files().unwrap(), vec![path]);
    }

    #[test]
    fn test_file_floor_applies() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::builder()
            .silent_console()
            .dir(dir.path())
            .file_switch(true)
            .file_filter(LogLevel::Error)
            .stack_provider(FixedStackProvider::single(caller()))
            .build()
            .unwrap();

        logger.w(&[&"not in file"]);
        logger.flush().unwrap();
        assert!(logger.log_files().unwrap().is_empty());

        logger.e(&[&"in file"]);
        logger.flush().unwrap();
        assert_eq!(logger.log_files().unwrap().len(), 1);
        assert_eq!(logger.metrics().total_logged(), 1);
    }

    #[test]
    fn test_explicit_call_site() {
        let (builder, captured) = capturing_builder();
        let logger = builder.border_switch(false).build().unwrap();

        let frame = StackFrame::new("app::jobs", "tick", Some("jobs.rs".to_string()), 7);
        logger.log_at(frame, LogLevel::Info, "", &[&"tick"]);

        let captured = captured.lock();
        assert_eq!(captured[0].1, "jobs");
        assert!(captured[0].2.contains("app::jobs.tick(jobs.rs:7)"));
    }

    #[test]
    fn test_explicit_call_site_ignores_depth_and_offset() {
        let (builder, captured) = capturing_builder();
        let logger = builder.border_switch(false).stack_deep(4).stack_offset(3).build().unwrap();

        let frame = StackFrame::new("app::jobs", "tick", Some("jobs.rs".to_string()), 7);
        logger.log_at(frame, LogLevel::Info, "", &[&"tick"]);

        let captured = captured.lock();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].1, "jobs");
        let header: Vec<&str> = captured[0].2.lines().filter(|line| line.contains("jobs.rs")).collect();
        assert_eq!(header.len(), 1);
        assert!(header[0].ends_with("app::jobs.tick(jobs.rs:7)"));
    }

    #[test]
    fn test_panicking_observer_does_not_reach_caller() {
        let logger = Logger::builder()
            .silent_console()
            .stack_provider(FixedStackProvider::single(caller()))
            .on_console_output(|_, _, _| panic!("observer bug"))
            .build()
            .unwrap();

        logger.i(&[&"still fine"]);
    }
}
