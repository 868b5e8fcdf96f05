//! Display lines
//!
//! A `Line` is an immutable piece of text clipped to the display width.

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Maximum display width of a single line, in terminal columns
pub const MAX_LINE_WIDTH: usize = 120;

/// A single scrollback line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line(String);

impl Line {
    /// Create a line, truncating anything past `MAX_LINE_WIDTH` columns.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(truncate_to_width(text.as_ref(), MAX_LINE_WIDTH))
    }

    /// An empty spacer line
    pub fn blank() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display width in terminal columns
    pub fn width(&self) -> usize {
        self.0.width()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Clip `text` so its display width does not exceed `max_width`.
///
/// A wide character that would straddle the limit is dropped rather than split.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
