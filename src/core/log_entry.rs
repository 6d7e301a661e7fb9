//! Log entry and request structures

use super::call_site::{StackFrame, TagHead};
use super::log_level::LogLevel;
use super::render::FormatHint;
use chrono::{DateTime, Local};
use std::cell::RefCell;

// Thread-local cache for the thread label to avoid repeated allocations
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, or its id when unnamed
///
/// Computed once per thread.
pub fn current_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                match thread.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", thread.id()),
                }
            })
            .clone()
    })
}

/// Where a call may be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Console and file, subject to their switches and floors
    #[default]
    Default,
    /// File only, even when the file switch is off
    FileOnly,
}

/// Parameters of one log call other than its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest<'a> {
    pub level: LogLevel,
    /// Blank means the global tag, or a tag derived from the call site
    pub tag: &'a str,
    pub hint: FormatHint,
    pub target: Target,
    /// Explicit caller frame; the configured stack provider is used when absent
    pub call_site: Option<StackFrame>,
}

impl<'a> LogRequest<'a> {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            tag: "",
            hint: FormatHint::None,
            target: Target::Default,
            call_site: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, tag: &'a str) -> Self {
        self.tag = tag;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hint(mut self, hint: FormatHint) -> Self {
        self.hint = hint;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_only(mut self) -> Self {
        self.target = Target::FileOnly;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn at(mut self, frame: StackFrame) -> Self {
        self.call_site = Some(frame);
        self
    }
}

/// A rendered call ready for the sinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub tag: String,
    pub console_head: Vec<String>,
    pub file_head: String,
    pub body: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(level: LogLevel, tag_head: TagHead, body: String, timestamp: DateTime<Local>) -> Self {
        Self {
            level,
            tag: tag_head.tag,
            console_head: tag_head.console_head,
            file_head: tag_head.file_head,
            body,
            timestamp,
        }
    }

    /// Text after `{level}/{tag}` in a file entry
    pub fn file_content(&self) -> String {
        format!("{}{}", self.file_head, self.body)
    }
}
