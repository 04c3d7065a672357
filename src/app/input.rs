use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::{Direction, EditorBuffer};

/// The key event a typed character arrives as.
pub fn key_for_char(ch: char) -> KeyEvent {
    match ch {
        '\n' => KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        '\t' => KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
        ch => KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
    }
}

/// Default handling for a key nobody intercepted.
///
/// Returns `true` if the key did anything.
pub(super) fn apply_default_key(buffer: &mut EditorBuffer, key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            false
        }
        KeyCode::Char(ch) => {
            buffer.insert_char(ch);
            true
        }
        KeyCode::Enter => {
            buffer.insert_char('\n');
            true
        }
        KeyCode::Tab => {
            buffer.insert_char('\t');
            true
        }
        KeyCode::Backspace => buffer.delete_back(),
        KeyCode::Left => {
            buffer.move_cursor(Direction::Left);
            true
        }
        KeyCode::Right => {
            buffer.move_cursor(Direction::Right);
            true
        }
        _ => false,
    }
}
