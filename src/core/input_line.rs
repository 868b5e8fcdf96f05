//! Input line editor
//!
//! Accumulates typed text for the prompt. Fragments that would not fit are
//! dropped whole; this silent-drop policy is intentional and never reported.

/// Bound on the input line, in characters (content stays strictly below it)
pub const MAX_INPUT_LENGTH: usize = 256;

/// The line currently being typed
#[derive(Debug, Default, Clone)]
pub struct InputLine {
    buffer: String,
    /// Length in characters, kept in sync with `buffer`
    len: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment. Returns false if it was dropped.
    ///
    /// Fragments carrying control characters are dropped too; they would
    /// reach the terminal verbatim once echoed.
    pub fn append(&mut self, fragment: &str) -> bool {
        let frag_len = fragment.chars().count();
        if frag_len == 0 || self.len + frag_len >= MAX_INPUT_LENGTH {
            return false;
        }
        if fragment.chars().any(char::is_control) {
            return false;
        }
        self.buffer.push_str(fragment);
        self.len += frag_len;
        true
    }

    /// Remove the last character, if any
    pub fn delete_last(&mut self) {
        if self.buffer.pop().is_some() {
            self.len -= 1;
        }
    }

    /// Empty the line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.len = 0;
    }

    /// Current content, for display or execution
    pub fn snapshot(&self) -> &str {
        &self.buffer
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_snapshot() {
        let mut input = InputLine::new();
        assert!(input.append("p"));
        assert!(input.append("wd"));
        assert_eq!(input.snapshot(), "pwd");
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_multibyte_fragment() {
        let mut input = InputLine::new();
        input.append("é日");
        assert_eq!(input.len(), 2);
        input.delete_last();
        assert_eq!(input.snapshot(), "é");
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn test_overflow_dropped_whole() {
        let mut input = InputLine::new();
        let fill = "a".repeat(MAX_INPUT_LENGTH - 2);
        assert!(input.append(&fill));

        // Two more would reach the bound: rejected entirely
        assert!(!input.append("bc"));
        assert_eq!(input.len(), MAX_INPUT_LENGTH - 2);

        assert!(input.append("b"));
        assert_eq!(input.len(), MAX_INPUT_LENGTH - 1);
        assert!(!input.append("c"));
        assert_eq!(input.snapshot().chars().count(), input.len());
    }

    #[test]
    fn test_control_fragment_dropped() {
        let mut input = InputLine::new();
        input.append("ls");
        for frag in ["\t", "a\nb", "\x1b[2J", "\0", "\x7f"] {
            assert!(!input.append(frag));
        }
        assert_eq!(input.snapshot(), "ls");
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_delete_on_empty() {
        let mut input = InputLine::new();
        input.delete_last();
        assert!(input.is_empty());
        assert_eq!(input.len(), 0);
    }

    #[test]
    fn test_reset() {
        let mut input = InputLine::new();
        input.append("echo hi");
        input.reset();
        assert_eq!(input.snapshot(), "");
        assert!(input.is_empty());
    }

    #[test]
    fn test_length_tracks_content() {
        let mut input = InputLine::new();
        let ops = ["ab", "", "日本語", "x"];
        for (i, frag) in ops.iter().enumerate() {
            input.append(frag);
            if i % 2 == 1 {
                input.delete_last();
            }
            assert_eq!(input.len(), input.snapshot().chars().count());
            assert!(input.len() < MAX_INPUT_LENGTH);
        }
    }
}
