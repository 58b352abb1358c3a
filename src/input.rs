use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::game::InputEvent;

/// Maps a terminal key press to a game input. Releases and auto-repeats are
/// dropped so a held key yields one event.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let input = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => InputEvent::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') => InputEvent::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Reset,
        KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::ToggleSound,
        KeyCode::Left => InputEvent::MoveLeft,
        KeyCode::Right => InputEvent::MoveRight,
        KeyCode::Down => InputEvent::SoftDrop,
        KeyCode::Up => InputEvent::Rotate,
        _ => return None,
    };
    Some(input)
}
