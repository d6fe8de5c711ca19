//! Terminal input handling.
//!
//! Converts raw crossterm events into [`InputEvent`]s once, at the terminal
//! boundary, so every mode handler matches a closed enum instead of raw key
//! identifiers.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A terminal input event after boundary translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character, including letters bound as commands in View
    /// mode and free text in the input modes.
    Char(char),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Backspace key.
    Backspace,
    /// Enter key.
    Enter,
    /// Escape key.
    Escape,
    /// Ctrl-C - forced exit, handled by the event loop itself.
    ForceQuit,
    /// Terminal was resized; bypasses mode dispatch entirely.
    Resize { width: u16, height: u16 },
}

/// Convert a crossterm event to an [`InputEvent`].
///
/// Returns `None` for events the controller does not consume (key releases,
/// mouse events, unmapped keys).
#[must_use]
pub fn translate(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Resize(width, height) => Some(InputEvent::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<InputEvent> {
    // Only process key press events
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(InputEvent::ForceQuit),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputEvent::Char(c)),
        KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Down => Some(InputEvent::Down),
        KeyCode::Home => Some(InputEvent::Home),
        KeyCode::End => Some(InputEvent::End),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Enter => Some(InputEvent::Enter),
        KeyCode::Esc => Some(InputEvent::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(
            translate(&press(KeyCode::Char('d'), KeyModifiers::NONE)),
            Some(InputEvent::Char('d'))
        );
        // Shifted characters pass through unchanged
        assert_eq!(
            translate(&press(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(InputEvent::Char('G'))
        );
    }

    #[test]
    fn test_ctrl_c_is_force_quit() {
        assert_eq!(
            translate(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::ForceQuit)
        );
    }

    #[test]
    fn test_other_ctrl_chords_ignored() {
        assert_eq!(
            translate(&press(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            translate(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(InputEvent::Up)
        );
        assert_eq!(
            translate(&press(KeyCode::End, KeyModifiers::NONE)),
            Some(InputEvent::End)
        );
        assert_eq!(
            translate(&press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(InputEvent::Backspace)
        );
        assert_eq!(
            translate(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputEvent::Escape)
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(translate(&Event::Key(key)), None);
    }

    #[test]
    fn test_unmapped_key_ignored() {
        assert_eq!(translate(&press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(&Event::Resize(80, 24)),
            Some(InputEvent::Resize {
                width: 80,
                height: 24
            })
        );
    }
}
