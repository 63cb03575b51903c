//! Input events
//!
//! Terminal events reduced to what the handlers care about, plus the key
//! tables shared by every handler.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::ecs::Position;

/// A single input delivered to the active handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Pointer moved over a map tile
    MouseMotion(Position),
    MouseDown { button: MouseButton, tile: Position },
    /// The window asked to close
    Quit,
}

impl InputEvent {
    /// Translate a crossterm event. `map_origin` is the screen cell where map
    /// tile (0, 0) is drawn. Key releases and repeats are dropped.
    pub fn from_terminal(event: &Event, map_origin: Position) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(InputEvent::Key(*key)),
            Event::Mouse(mouse) => {
                let tile = Position::new(
                    mouse.column as i32 - map_origin.x,
                    mouse.row as i32 - map_origin.y,
                );
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        Some(InputEvent::MouseMotion(tile))
                    }
                    MouseEventKind::Down(button) => Some(InputEvent::MouseDown { button, tile }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn key(code: KeyCode) -> Self {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }
}

/// Movement direction for a key: arrows, vi-keys, the numpad digits and the
/// Home/End/PageUp/PageDown diagonals
pub fn direction_for(key: &KeyEvent) -> Option<(i32, i32)> {
    let dir = match key.code {
        KeyCode::Up => (0, -1),
        KeyCode::Down => (0, 1),
        KeyCode::Left => (-1, 0),
        KeyCode::Right => (1, 0),
        KeyCode::Home => (-1, -1),
        KeyCode::End => (-1, 1),
        KeyCode::PageUp => (1, -1),
        KeyCode::PageDown => (1, 1),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' | '8' => (0, -1),
            'j' | '2' => (0, 1),
            'h' | '4' => (-1, 0),
            'l' | '6' => (1, 0),
            'y' | '7' => (-1, -1),
            'u' | '9' => (1, -1),
            'b' | '1' => (-1, 1),
            'n' | '3' => (1, 1),
            _ => return None,
        },
        _ => return None,
    };
    Some(dir)
}

/// Wait in place: `.` or numpad 5
pub fn is_wait(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('.') | KeyCode::Char('5'))
}

/// Cursor step multiplier: Shift x5, Ctrl x10, Alt x20, multiplied together
pub fn step_multiplier(modifiers: KeyModifiers) -> i32 {
    let mut multiplier = 1;
    if modifiers.contains(KeyModifiers::SHIFT) {
        multiplier *= 5;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        multiplier *= 10;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        multiplier *= 20;
    }
    multiplier
}

pub fn is_confirm(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

/// A key press that is only a modifier (Shift, Ctrl, ...) on its own
pub fn is_modifier_only(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Modifier(_))
}
