//! Call-site resolution
//!
//! Turns the current call stack into a tag and a short header such as
//! `main, my_app::net::Client.connect(client.rs:42)`.
//!
//! Stack capture is abstracted behind [`CallStackProvider`] so hosts without
//! debug symbols can hand in an explicit frame, which is what the logging
//! macros do.

use super::config::is_blank;
use regex::Regex;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::LazyLock;

/// Extension appended to file names synthesized from a class path
const SOURCE_EXTENSION: &str = ".rs";

/// Frame line of a rendered backtrace, e.g. `  12: my_app::main`
static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("valid symbol pattern"));

static LOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at\s+(.+?):(\d+)(?::\d+)?\s*$").expect("valid location pattern")
});

/// File-header prefix used whenever no call-site header is rendered
pub const PLAIN_FILE_HEAD: &str = ": ";

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Path of the enclosing type or module, e.g. `my_app::net::Client`
    pub class_name: String,
    pub method_name: String,
    /// Source file name without directories, when debug info has one
    pub file_name: Option<String>,
    pub line_number: u32,
}

impl StackFrame {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        file_name: Option<String>,
        line_number: u32,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name,
            line_number,
        }
    }

    /// Build a frame from a fully qualified function path and a source location
    ///
    /// Trailing `{{closure}}` segments are dropped, the last remaining segment
    /// becomes the method and everything before it the class.
    ///
    /// ```
    /// use rust_log_utils::core::StackFrame;
    ///
    /// let frame = StackFrame::from_function_path("app::net::Client::connect", "src/net/client.rs", 42);
    /// assert_eq!(frame.class_name, "app::net::Client");
    /// assert_eq!(frame.method_name, "connect");
    /// assert_eq!(frame.file_name.as_deref(), Some("client.rs"));
    /// ```
    pub fn from_function_path(path: &str, file: &str, line: u32) -> Self {
        let mut path = path;
        while let Some(stripped) = path.strip_suffix("::{{closure}}") {
            path = stripped;
        }

        let (class_name, method_name) = match path.rsplit_once("::") {
            Some((class, method)) => (class, method),
            None => (path, path),
        };

        let file_name = file
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self::new(class_name, method_name, file_name, line)
    }

    /// File name of the frame, synthesized from the class path when debug info lacks one
    ///
    /// Takes the last `::` or `.` segment of the class path, cuts it at the first
    /// `$`, `<` or `{` and appends `.rs`.
    pub fn resolved_file_name(&self) -> String {
        if let Some(name) = &self.file_name {
            return name.clone();
        }

        let last = self
            .class_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.class_name);
        let mut class = last.rsplit('.').next().unwrap_or(last);
        if let Some(index) = class.find(['$', '<', '{']) {
            class = &class[..index];
        }
        format!("{}{}", class, SOURCE_EXTENSION)
    }

    /// `class.method(file:line)`
    pub fn location(&self) -> String {
        format!(
            "{}.{}({}:{})",
            self.class_name,
            self.method_name,
            self.resolved_file_name(),
            self.line_number
        )
    }
}

/// Capability returning the stack of the current log call
///
/// Frames are ordered innermost first. Frame 0 is the caller of the logging
/// entry point; the logger's own frames are already skipped.
pub trait CallStackProvider: Send + Sync {
    fn frames(&self) -> Vec<StackFrame>;
}

/// Stack provider backed by [`std::backtrace::Backtrace`]
///
/// Needs debug info to resolve symbols. Everything up to and including the
/// last frame that belongs to the logger is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeStackProvider;

impl NativeStackProvider {
    fn is_internal(symbol: &str) -> bool {
        const LOGGER: &str = concat!(env!("CARGO_CRATE_NAME"), "::core::logger::Logger");
        const PROVIDER: &str = concat!(env!("CARGO_CRATE_NAME"), "::core::call_site::NativeStackProvider");
        symbol.contains(LOGGER) || symbol.contains(PROVIDER) || symbol.starts_with("std::backtrace")
    }

    /// Parse the text form of a captured backtrace into `(symbol, file, line)` triples
    fn parse(text: &str) -> Vec<(String, Option<String>, u32)> {
        let mut symbols: Vec<(String, Option<String>, u32)> = Vec::new();
        for line in text.lines() {
            if let Some(caps) = LOCATION_REGEX.captures(line) {
                if let Some(last) = symbols.last_mut() {
                    last.1 = Some(caps[1].to_string());
                    last.2 = caps[2].parse().unwrap_or(0);
                }
            } else if let Some(caps) = SYMBOL_REGEX.captures(line) {
                symbols.push((caps[1].to_string(), None, 0));
            }
        }
        symbols
    }

    fn frames_from_text(text: &str) -> Vec<StackFrame> {
        let symbols = Self::parse(text);
        let start = symbols
            .iter()
            .rposition(|(symbol, _, _)| Self::is_internal(symbol))
            .map_or(0, |index| index + 1);

        symbols[start..]
            .iter()
            .map(|(symbol, file, line)| {
                StackFrame::from_function_path(symbol, file.as_deref().unwrap_or(""), *line)
            })
            .collect()
    }
}

impl CallStackProvider for NativeStackProvider {
    fn frames(&self) -> Vec<StackFrame> {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return Vec::new();
        }
        Self::frames_from_text(&backtrace.to_string())
    }
}

/// Stack provider returning a fixed list of frames
#[derive(Debug, Default, Clone)]
pub struct FixedStackProvider {
    frames: Vec<StackFrame>,
}

impl FixedStackProvider {
    pub fn new(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    pub fn single(frame: StackFrame) -> Self {
        Self::new(vec![frame])
    }
}

impl CallStackProvider for FixedStackProvider {
    fn frames(&self) -> Vec<StackFrame> {
        self.frames.clone()
    }
}

/// Tag and call-site header of one log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHead {
    pub tag: String,
    /// Lines printed above the body on the console, possibly empty
    pub console_head: Vec<String>,
    /// Inserted between the tag and the body in file entries
    pub file_head: String,
}

impl TagHead {
    fn plain(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            console_head: Vec::new(),
            file_head: PLAIN_FILE_HEAD.to_string(),
        }
    }
}

/// Derives [`TagHead`]s from the call stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSiteResolver {
    /// Tags are derived from the call site only while the global tag is blank
    pub global_tag_is_blank: bool,
    pub log_head: bool,
    pub stack_deep: usize,
    pub stack_offset: usize,
}

impl CallSiteResolver {
    /// Resolve the tag and header for a call tagged `tag` on thread `thread_name`
    ///
    /// The provider is not consulted when the global tag is set and headers
    /// are disabled.
    pub fn resolve(&self, tag: &str, stack: &dyn CallStackProvider, thread_name: &str) -> TagHead {
        if !self.global_tag_is_blank && !self.log_head {
            return TagHead::plain(tag);
        }

        let frames = stack.frames();
        let derive_tag = |frame: &StackFrame| -> String {
            if self.global_tag_is_blank && is_blank(tag) {
                let file_name = frame.resolved_file_name();
                match file_name.split_once('.') {
                    Some((stem, _)) => stem.to_string(),
                    None => file_name,
                }
            } else {
                tag.to_string()
            }
        };

        let index = self.stack_offset;
        let Some(target) = frames.get(index) else {
            return match frames.first() {
                Some(frame) => TagHead::plain(derive_tag(frame)),
                None => TagHead::plain(tag),
            };
        };

        let tag = derive_tag(target);
        if !self.log_head {
            return TagHead::plain(tag);
        }

        let head = format!("{}, {}", thread_name, target.location());
        let file_head = format!(" [{}]: ", head);

        if self.stack_deep <= 1 {
            return TagHead {
                tag,
                console_head: vec![head],
                file_head,
            };
        }

        let depth = self.stack_deep.min(frames.len() - index);
        let indent = " ".repeat(thread_name.chars().count() + 2);
        let mut console_head = Vec::with_capacity(depth);
        console_head.push(head);
        for frame in &frames[index + 1..index + depth] {
            console_head.push(format!("{}{}", indent, frame.location()));
        }

        TagHead {
            tag,
            console_head,
            file_head,
        }
    }
}
