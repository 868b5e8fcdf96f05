//! Scrollback buffer
//!
//! Holds the display history shown above the prompt. The buffer is bounded:
//! once `MAX_LINES` is reached, every append evicts the oldest line.

use std::collections::VecDeque;

use super::line::Line;

/// Maximum number of scrollback lines
pub const MAX_LINES: usize = 100;

/// Ordered, capacity-bounded line history (oldest first)
#[derive(Debug)]
pub struct Scrollback {
    /// Lines in display order (newest last)
    lines: VecDeque<Line>,
    /// Maximum lines kept
    capacity: usize,
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollback {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINES)
    }

    /// Create a buffer with a custom bound (at least one line)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one if the buffer is full
    pub fn append(&mut self, line: impl Into<Line>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Append several lines in order
    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = Line>,
    {
        for line in lines {
            self.append(line);
        }
    }

    /// Remove every line
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in display order. Each call starts a fresh pass.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &Line> + ExactSizeIterator + Clone + '_ {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
