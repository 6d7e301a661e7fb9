//! Console framing and chunking
//!
//! A rendered message is framed with box-drawing borders and split into
//! console units. [`MAX_LEN`] bounds the window of message text a unit
//! carries. In multi-call mode every border, header line and body window is
//! its own unit. In single-tag mode the whole frame is composed into one
//! string first and then cut into windows, each re-opened with a top border
//! and closed with a bottom border so that every unit reads as a framed
//! block. Those borders sit outside the window, so a bordered single-tag
//! unit may run up to [`MAX_LEN`] plus the frame it is wrapped in.

/// Line separator used in all composed output
pub const LINE_SEP: &str = "\n";

/// Maximum number of message characters per console window
pub const MAX_LEN: usize = 1100;

/// First line of a single-tag unit, keeps the frame off the tag column
pub const PLACEHOLDER: &str = " ";

pub const TOP_CORNER: &str = "┌";
pub const MIDDLE_CORNER: &str = "├";
pub const LEFT_BORDER: &str = "│ ";
pub const BOTTOM_CORNER: &str = "└";

macro_rules! side_divider {
    () => {
        "────────────────────────────────────────────────────────"
    };
}

macro_rules! middle_divider {
    () => {
        "┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄"
    };
}

pub const SIDE_DIVIDER: &str = side_divider!();
pub const MIDDLE_DIVIDER: &str = middle_divider!();

pub const TOP_BORDER: &str = concat!("┌", side_divider!(), side_divider!());
pub const MIDDLE_BORDER: &str = concat!("├", middle_divider!(), middle_divider!());
pub const BOTTOM_BORDER: &str = concat!("└", side_divider!(), side_divider!());

/// Splits framed console output into units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrapper {
    border: bool,
    single_tag: bool,
    max_len: usize,
}

impl LineWrapper {
    pub fn new(border: bool, single_tag: bool) -> Self {
        Self {
            border,
            single_tag,
            max_len: MAX_LEN,
        }
    }

    /// Override the unit length, mostly useful in tests
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.max(1);
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Produce the console units for one message
    pub fn wrap(&self, head: &[String], body: &str) -> Vec<String> {
        if self.single_tag {
            let composed = self.compose_single(head, body);
            self.split_single(&composed)
        } else {
            self.wrap_multi(head, body)
        }
    }

    fn wrap_multi(&self, head: &[String], body: &str) -> Vec<String> {
        let mut units = Vec::new();

        if self.border {
            units.push(TOP_BORDER.to_string());
        }
        if !head.is_empty() {
            for line in head {
                if self.border {
                    units.push(format!("{}{}", LEFT_BORDER, line));
                } else {
                    units.push(line.clone());
                }
            }
            if self.border {
                units.push(MIDDLE_BORDER.to_string());
            }
        }

        let offsets = char_offsets(body);
        let len = offsets.len() - 1;
        let mut start = 0;
        loop {
            let end = (start + self.max_len).min(len);
            let window = &body[offsets[start]..offsets[end]];
            if self.border {
                for line in body_lines(window) {
                    units.push(format!("{}{}", LEFT_BORDER, line));
                }
            } else {
                units.push(window.to_string());
            }
            start = end;
            if start >= len {
                break;
            }
        }

        if self.border {
            units.push(BOTTOM_BORDER.to_string());
        }
        units
    }

    /// Build the complete single-tag frame
    pub fn compose_single(&self, head: &[String], body: &str) -> String {
        let mut out = String::new();
        if self.border {
            out.push_str(PLACEHOLDER);
            out.push_str(LINE_SEP);
            out.push_str(TOP_BORDER);
            out.push_str(LINE_SEP);
            if !head.is_empty() {
                for line in head {
                    out.push_str(LEFT_BORDER);
                    out.push_str(line);
                    out.push_str(LINE_SEP);
                }
                out.push_str(MIDDLE_BORDER);
                out.push_str(LINE_SEP);
            }
            for line in body_lines(body) {
                out.push_str(LEFT_BORDER);
                out.push_str(line);
                out.push_str(LINE_SEP);
            }
            out.push_str(BOTTOM_BORDER);
        } else {
            if !head.is_empty() {
                out.push_str(PLACEHOLDER);
                out.push_str(LINE_SEP);
                for line in head {
                    out.push_str(line);
                    out.push_str(LINE_SEP);
                }
            }
            out.push_str(body);
        }
        out
    }

    /// Cut a composed single-tag frame into units
    ///
    /// With borders on, the trailing bottom border is reserved so it is never
    /// split, and every unit but the last is closed with its own bottom border.
    pub fn split_single(&self, msg: &str) -> Vec<String> {
        let offsets = char_offsets(msg);
        let len = offsets.len() - 1;
        let slice = |from: usize, to: usize| &msg[offsets[from]..offsets[to]];
        let max = self.max_len;
        let bottom_len = BOTTOM_BORDER.chars().count();

        let count = if self.border {
            len.saturating_sub(bottom_len) / max
        } else {
            len / max
        };
        if count == 0 {
            return vec![msg.to_string()];
        }

        let mut units = Vec::with_capacity(count + 1);
        let mut index = max;
        if self.border {
            units.push(format!("{}{}{}", slice(0, max), LINE_SEP, BOTTOM_BORDER));
            for _ in 1..count {
                units.push(format!(
                    "{}{}{}{}{}{}{}{}",
                    PLACEHOLDER,
                    LINE_SEP,
                    TOP_BORDER,
                    LINE_SEP,
                    LEFT_BORDER,
                    slice(index, index + max),
                    LINE_SEP,
                    BOTTOM_BORDER
                ));
                index += max;
            }
            if index != len - bottom_len {
                units.push(format!(
                    "{}{}{}{}{}{}",
                    PLACEHOLDER,
                    LINE_SEP,
                    TOP_BORDER,
                    LINE_SEP,
                    LEFT_BORDER,
                    slice(index, len)
                ));
            }
        } else {
            units.push(slice(0, max).to_string());
            for _ in 1..count {
                units.push(format!("{}{}{}", PLACEHOLDER, LINE_SEP, slice(index, index + max)));
                index += max;
            }
            if index != len {
                units.push(format!("{}{}{}", PLACEHOLDER, LINE_SEP, slice(index, len)));
            }
        }
        units
    }
}

/// Byte offset of every char boundary, including the end of the string
fn char_offsets(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect()
}

/// Split on the line separator, dropping trailing empty lines
fn body_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split(LINE_SEP).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}
