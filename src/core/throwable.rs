//! Chained error traces
//!
//! [`Throwable`] is an error description with optional stack frames and an
//! optional cause. Its full trace prints the root cause first; every wrapping
//! error follows under a ` Caused by: ` line, with the frames it shares with
//! the next segment removed.

use super::call_site::{CallStackProvider, StackFrame};
use super::line_wrapper::LINE_SEP;
use std::error::Error;
use std::fmt;

const CAUSED_BY: &str = " Caused by: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throwable {
    description: String,
    frames: Vec<String>,
    cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            frames: Vec::new(),
            cause: None,
        }
    }

    /// Capture the current stack from `provider` as this error's frames
    pub fn capture(description: impl Into<String>, provider: &dyn CallStackProvider) -> Self {
        Self::new(description).with_frames(provider.frames())
    }

    /// Convert an error and its `source()` chain
    ///
    /// The outermost description is prefixed with the error's type name.
    pub fn from_error<E: Error>(error: &E) -> Self {
        let mut descriptions = vec![format!("{}: {}", std::any::type_name::<E>(), error)];
        let mut source = error.source();
        while let Some(err) = source {
            descriptions.push(err.to_string());
            source = err.source();
        }

        descriptions
            .into_iter()
            .rev()
            .fold(None, |cause: Option<Throwable>, description| {
                let mut throwable = Throwable::new(description);
                throwable.cause = cause.map(Box::new);
                Some(throwable)
            })
            .unwrap_or_else(|| Throwable::new(std::any::type_name::<E>()))
    }

    #[must_use]
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames
            .iter()
            .map(|frame| format!("\tat {}", frame.location()))
            .collect();
        self
    }

    /// Use preformatted trace lines as frames
    #[must_use]
    pub fn with_frame_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames = lines.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn cause(&self) -> Option<&Throwable> {
        self.cause.as_deref()
    }

    /// Outermost first
    fn chain(&self) -> Vec<&Throwable> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(cause) = current.cause() {
            chain.push(cause);
            current = cause;
        }
        chain
    }

    /// Full trace, root cause first
    pub fn full_stack_trace(&self) -> String {
        let chain = self.chain();
        let size = chain.len();
        let mut lines: Vec<String> = Vec::new();
        let mut next_trace = chain[size - 1].frames.clone();

        for i in (0..size).rev() {
            let mut trace = std::mem::take(&mut next_trace);
            if i != 0 {
                next_trace = chain[i - 1].frames.clone();
                remove_common_frames(&mut trace, &next_trace);
            }
            if i == size - 1 {
                lines.push(chain[i].description.clone());
            } else {
                lines.push(format!("{}{}", CAUSED_BY, chain[i].description));
            }
            lines.extend(trace);
        }

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push_str(LINE_SEP);
        }
        out
    }
}

/// Drop frames of `cause` that equal the frame at the same distance from the end of `wrapper`
fn remove_common_frames(cause: &mut Vec<String>, wrapper: &[String]) {
    let mut cause_index = cause.len();
    let mut wrapper_index = wrapper.len();
    while cause_index > 0 && wrapper_index > 0 {
        cause_index -= 1;
        wrapper_index -= 1;
        if cause[cause_index] == wrapper[wrapper_index] {
            cause.remove(cause_index);
        }
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
