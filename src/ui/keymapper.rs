//! Key mapping for terminal input
//!
//! Converts crossterm events to session input events.

use bitflags::bitflags;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::InputEvent;

/// Spaces a Tab key expands to
const TAB_WIDTH: usize = 4;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Key mapper for converting platform events to session events
pub struct KeyMapper;

impl KeyMapper {
    /// Map any crossterm event. Returns None for events the session ignores.
    pub fn map(event: &Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => Self::map_key(key),
            Event::Paste(text) => Self::map_paste(text),
            Event::Resize(cols, rows) => Some(InputEvent::Resize {
                cols: *cols,
                rows: *rows,
            }),
            _ => None,
        }
    }

    /// Map a key event
    pub fn map_key(event: &KeyEvent) -> Option<InputEvent> {
        // Only presses; releases and repeats from enhanced keyboards are dropped
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let mods = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Char(ch) if mods.contains(Modifiers::CTRL) => {
                match ch.to_ascii_lowercase() {
                    'c' => Some(InputEvent::Interrupt),
                    'q' => Some(InputEvent::ForceQuit),
                    'd' => Some(InputEvent::Quit),
                    _ => None,
                }
            }
            KeyCode::Char(_) if mods.contains(Modifiers::ALT) => None,
            KeyCode::Char(ch) => Some(InputEvent::Text(ch.to_string())),
            KeyCode::Enter => Some(InputEvent::Submit),
            KeyCode::Backspace => Some(InputEvent::Backspace),
            KeyCode::Tab => Some(InputEvent::Text(" ".repeat(TAB_WIDTH))),
            _ => None,
        }
    }

    /// Pasted text with line breaks and tabs turned into spaces and any
    /// other control character dropped
    fn map_paste(text: &str) -> Option<InputEvent> {
        let clean: String = text
            .chars()
            .filter_map(|ch| match ch {
                '\t' | '\n' | '\r' => Some(' '),
                ch if ch.is_control() => None,
                ch => Some(ch),
            })
            .collect();
        if clean.is_empty() {
            None
        } else {
            Some(InputEvent::Text(clean))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_modifiers_from_crossterm() {
        let mods = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Text("a".into())));

        // Shifted characters arrive already decoded
        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Text("A".into())));

        let event = key_event(KeyCode::Char('é'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Text("é".into())));

        // Alt combos are not text
        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(KeyMapper::map_key(&event), None);
    }

    #[test]
    fn test_control_keys() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Interrupt));

        let event = key_event(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::ForceQuit));

        let event = key_event(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Quit));

        let event = key_event(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map_key(&event), None);
    }

    #[test]
    fn test_editing_keys() {
        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Submit));

        let event = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Backspace));

        let event = key_event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), None);

        let event = key_event(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map_key(&event), Some(InputEvent::Text("    ".into())));
    }

    #[test]
    fn test_paste_sanitized() {
        let paste = Event::Paste("echo \x1b[2J\nboom\r\n\tx\0".to_string());
        assert_eq!(
            KeyMapper::map(&paste),
            Some(InputEvent::Text("echo [2J boom   x".into()))
        );

        // Nothing printable left
        let paste = Event::Paste("\x1b\x07".to_string());
        assert_eq!(KeyMapper::map(&paste), None);
    }

    #[test]
    fn test_release_ignored() {
        let event = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(KeyMapper::map_key(&event), None);
    }

    #[test]
    fn test_other_events() {
        assert_eq!(
            KeyMapper::map(&Event::Resize(100, 30)),
            Some(InputEvent::Resize { cols: 100, rows: 30 })
        );
        assert_eq!(
            KeyMapper::map(&Event::Paste("ls -la".to_string())),
            Some(InputEvent::Text("ls -la".into()))
        );
        assert_eq!(KeyMapper::map(&Event::FocusGained), None);
    }
}
