//! Logger configuration
//!
//! [`Settings`] holds the plain, serializable options and can be loaded from
//! TOML. [`Config`] pairs it with the runtime hooks: formatter registry, file
//! header, file writer override, output observers, clock and stack provider.
//! The logger and the file worker share one `Config` behind an
//! `Arc<RwLock<_>>`; changes apply to the next log call.

use super::appender::FileWriter;
use super::call_site::{CallSiteResolver, CallStackProvider, NativeStackProvider};
use super::error::{LoggerError, Result};
use super::file_header::FileHeader;
use super::log_level::LogLevel;
use super::render::FormatterRegistry;
use super::timestamp::{file_date, Clock, SystemClock};
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_FILE_PREFIX: &str = "util";
pub const DEFAULT_FILE_EXTENSION: &str = ".txt";
const DEFAULT_PROCESS_NAME: &str = "process";

/// True for empty or whitespace-only strings
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Serializable logger options
///
/// # Examples
///
/// ```
/// use rust_log_utils::core::{LogLevel, Settings};
///
/// let settings = Settings::from_toml_str(
///     r#"
///     file_switch = true
///     file_filter = "warn"
///     file_prefix = "app"
///     save_days = 3
///     "#,
/// )
/// .unwrap();
///
/// assert!(settings.file_switch);
/// assert_eq!(settings.file_filter, LogLevel::Warn);
/// assert_eq!(settings.file_prefix(), "app");
/// assert_eq!(settings.file_extension(), ".txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_switch: bool,
    pub console_switch: bool,
    pub file_switch: bool,
    pub border_switch: bool,
    pub head_switch: bool,
    pub single_tag_switch: bool,
    pub console_filter: LogLevel,
    pub file_filter: LogLevel,
    /// Lines of call-site header, at least 1
    ///
    /// Only stacks captured at runtime can be deeper than one frame. Calls
    /// that carry an explicit call site, which includes every logging macro
    /// and [`Logger::log_at`](crate::Logger::log_at), always get a single
    /// header line.
    pub stack_deep: usize,
    /// Frames to skip above the caller
    ///
    /// Applies to captured stacks only; an explicit call site is used as is.
    /// If the offset runs past the captured stack, the call is logged with
    /// its tag and no header.
    pub stack_offset: usize,
    /// Days to keep old files; zero or negative keeps everything
    pub save_days: i64,
    global_tag: String,
    dir: PathBuf,
    file_prefix: String,
    file_extension: String,
    process_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_switch: true,
            console_switch: true,
            file_switch: false,
            border_switch: true,
            head_switch: true,
            single_tag_switch: true,
            console_filter: LogLevel::Verbose,
            file_filter: LogLevel::Verbose,
            stack_deep: 1,
            stack_offset: 0,
            save_days: -1,
            global_tag: String::new(),
            dir: std::env::temp_dir().join("log"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            process_name: default_process_name(),
        }
    }
}

fn default_process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .filter(|name| !is_blank(name))
        .unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string())
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(text)?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading settings",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&text)
    }

    /// Check values that would produce broken file paths or headers
    pub fn validate(&self) -> Result<()> {
        if self.stack_deep == 0 {
            return Err(LoggerError::config("Settings", "stack_deep must be at least 1"));
        }
        for (field, value) in [
            ("file_prefix", &self.file_prefix),
            ("file_extension", &self.file_extension),
            ("process_name", &self.process_name),
        ] {
            if value.contains('/') || value.contains('\\') {
                return Err(LoggerError::config(
                    "Settings",
                    format!("{} must not contain path separators: '{}'", field, value),
                ));
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let global_tag = std::mem::take(&mut self.global_tag);
        let prefix = std::mem::take(&mut self.file_prefix);
        let extension = std::mem::take(&mut self.file_extension);
        let process_name = std::mem::take(&mut self.process_name);
        self.set_global_tag(global_tag)
            .set_file_prefix(prefix)
            .set_file_extension(extension)
            .set_process_name(process_name);
    }

    pub fn global_tag(&self) -> &str {
        &self.global_tag
    }

    /// Blank clears the global tag, so tags are derived from the call site
    pub fn set_global_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        self.global_tag = if is_blank(&tag) { String::new() } else { tag };
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.dir = dir.into();
        self
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// Blank falls back to `util`
    pub fn set_file_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        self.file_prefix = if is_blank(&prefix) {
            DEFAULT_FILE_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Blank falls back to `.txt`; a leading `.` is added when missing
    pub fn set_file_extension(&mut self, extension: impl Into<String>) -> &mut Self {
        let extension = extension.into();
        self.file_extension = if is_blank(&extension) {
            DEFAULT_FILE_EXTENSION.to_string()
        } else if extension.starts_with('.') {
            extension
        } else {
            format!(".{}", extension)
        };
        self
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// `:` is replaced by `_` so the name is usable in a file name
    pub fn set_process_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.process_name = if is_blank(&name) {
            default_process_name()
        } else {
            name.replace(':', "_")
        };
        self
    }

    /// File name for the given instant, e.g. `util_2024_01_06_app.txt`
    pub fn log_file_name(&self, at: &DateTime<Local>) -> String {
        format!(
            "{}_{}_{}{}",
            self.file_prefix,
            file_date(at),
            self.process_name,
            self.file_extension
        )
    }

    pub fn log_file_path(&self, at: &DateTime<Local>) -> PathBuf {
        self.dir.join(self.log_file_name(at))
    }
}

impl From<&Settings> for CallSiteResolver {
    fn from(settings: &Settings) -> Self {
        CallSiteResolver {
            global_tag_is_blank: is_blank(&settings.global_tag),
            log_head: settings.head_switch,
            stack_deep: settings.stack_deep,
            stack_offset: settings.stack_offset,
        }
    }
}

/// Called once per console unit with `(level, tag, unit)`
pub type ConsoleObserver = Arc<dyn Fn(LogLevel, &str, &str) + Send + Sync>;

/// Called after each successful file write with `(path, content)`
pub type FileObserver = Arc<dyn Fn(&Path, &str) + Send + Sync>;

/// Settings plus runtime hooks
#[derive(Clone)]
pub struct Config {
    pub settings: Settings,
    pub formatters: Arc<FormatterRegistry>,
    pub file_header: FileHeader,
    pub file_writer: Option<Arc<dyn FileWriter>>,
    pub on_console_output: Option<ConsoleObserver>,
    pub on_file_output: Option<FileObserver>,
    pub clock: Arc<dyn Clock>,
    pub stack_provider: Arc<dyn CallStackProvider>,
}

pub type SharedConfig = Arc<RwLock<Config>>;

impl Config {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            formatters: Arc::new(FormatterRegistry::new()),
            file_header: FileHeader::new("Log"),
            file_writer: None,
            on_console_output: None,
            on_file_output: None,
            clock: Arc::new(SystemClock),
            stack_provider: Arc::new(NativeStackProvider),
        }
    }

    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("settings", &self.settings)
            .field("formatters", &self.formatters)
            .field("file_header", &self.file_header)
            .field("file_writer", &self.file_writer.is_some())
            .field("on_console_output", &self.on_console_output.is_some())
            .field("on_file_output", &self.on_file_output.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::{Clock, FixedClock};

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.log_switch);
        assert!(settings.console_switch);
        assert!(!settings.file_switch);
        assert!(settings.border_switch);
        assert!(settings.head_switch);
        assert!(settings.single_tag_switch);
        assert_eq!(settings.console_filter, LogLevel::Verbose);
        assert_eq!(settings.file_filter, LogLevel::Verbose);
        assert_eq!(settings.stack_deep, 1);
        assert_eq!(settings.stack_offset, 0);
        assert_eq!(settings.save_days, -1);
        assert_eq!(settings.global_tag(), "");
        assert_eq!(settings.file_prefix(), "util");
        assert_eq!(settings.file_extension(), ".txt");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_normalization() {
        let mut settings = Settings::default();
        settings
            .set_file_prefix("  ")
            .set_file_extension("log")
            .set_process_name("com.app:remote")
            .set_global_tag(" ");
        assert_eq!(settings.file_prefix(), "util");
        assert_eq!(settings.file_extension(), ".log");
        assert_eq!(settings.process_name(), "com.app_remote");
        assert_eq!(settings.global_tag(), "");

        settings.set_file_extension("");
        assert_eq!(settings.file_extension(), ".txt");
    }

    #[test]
    fn test_log_file_name() {
        let mut settings = Settings::default();
        settings
            .set_dir("/var/log/app")
            .set_file_prefix("app")
            .set_process_name("proc");
        let clock = FixedClock::at_local(2024, 1, 6, 23, 59, 0);
        assert_eq!(settings.log_file_name(&clock.now()), "app_2024_01_06_proc.txt");
        assert_eq!(
            settings.log_file_path(&clock.now()),
            PathBuf::from("/var/log/app/app_2024_01_06_proc.txt")
        );
    }

    #[test]
    fn test_toml_round_trip_with_normalization() {
        let settings = Settings::from_toml_str(
            r#"
            border_switch = false
            console_filter = "I"
            file_extension = "log"
            process_name = "svc:worker"
            stack_deep = 3
            "#,
        )
        .unwrap();
        assert!(!settings.border_switch);
        assert_eq!(settings.console_filter, LogLevel::Info);
        assert_eq!(settings.file_extension(), ".log");
        assert_eq!(settings.process_name(), "svc_worker");
        assert_eq!(settings.stack_deep, 3);
        assert!(settings.log_switch);
    }

    #[test]
    fn test_toml_rejects_unknown_level() {
        let result = Settings::from_toml_str(r#"file_filter = "loud""#);
        assert!(matches!(result, Err(LoggerError::TomlError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let result = Settings::from_toml_str("stack_deep = 0");
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));

        let mut settings = Settings::default();
        settings.set_file_prefix("../escape");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load("/definitely/not/here/settings.toml");
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }

    #[test]
    fn test_resolver_from_settings() {
        let mut settings = Settings::default();
        settings.set_global_tag("App");
        settings.head_switch = false;
        settings.stack_deep = 2;
        let resolver = CallSiteResolver::from(&settings);
        assert!(!resolver.global_tag_is_blank);
        assert!(!resolver.log_head);
        assert_eq!(resolver.stack_deep, 2);
    }
}
