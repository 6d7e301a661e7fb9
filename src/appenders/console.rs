//! Console appender implementation

use crate::core::config::SharedConfig;
use crate::core::line_wrapper::{LineWrapper, LINE_SEP};
use crate::core::{Appender, LogEntry, LogLevel, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Prints framed units to stdout, or stderr for `Error` and `Assert`
///
/// Every line of a unit is prefixed with `{level}/{tag}: `. The console
/// observer, if configured, sees each unit once after it is printed.
pub struct ConsoleAppender {
    config: SharedConfig,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    echo: bool,
}

impl ConsoleAppender {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            use_colors: cfg!(feature = "console"),
            echo: true,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Stop printing; observers are still notified
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Units that `entry` prints as under the current settings
    pub fn units(&self, entry: &LogEntry) -> Vec<String> {
        let wrapper = {
            let config = self.config.read();
            LineWrapper::new(
                config.settings.border_switch,
                config.settings.single_tag_switch,
            )
        };
        wrapper.wrap(&entry.console_head, &entry.body)
    }

    fn format_line(&self, level: LogLevel, tag: &str, line: &str) -> String {
        let prefix = format!("{}/{}:", level.as_char(), tag);
        #[cfg(feature = "console")]
        let prefix = if self.use_colors {
            prefix.color(level.color_code()).to_string()
        } else {
            prefix
        };
        format!("{} {}", prefix, line)
    }

    fn print_unit(&self, level: LogLevel, tag: &str, unit: &str) -> Result<()> {
        let mut text = String::new();
        for line in unit.split(LINE_SEP) {
            text.push_str(&self.format_line(level, tag, line));
            text.push_str(LINE_SEP);
        }

        match level {
            LogLevel::Error | LogLevel::Assert => {
                let mut stderr = std::io::stderr().lock();
                stderr.write_all(text.as_bytes())?;
            }
            _ => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let units = self.units(entry);
        let observer = self.config.read().on_console_output.clone();

        for unit in &units {
            if self.echo {
                self.print_unit(entry.level, &entry.tag, unit)?;
            }
            if let Some(observer) = &observer {
                observer(entry.level, &entry.tag, unit);
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
