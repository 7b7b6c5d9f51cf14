//! Key bindings

use macroquad::prelude::KeyCode;

/// One-shot intents fired on key-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Jump,
    Dash,
    Pause,
}

/// A key edge observed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(KeyCode),
    Up(KeyCode),
}

/// Keys the game listens to
pub const BOUND_KEYS: [KeyCode; 5] = [
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Up,
    KeyCode::X,
    KeyCode::Escape,
];

pub fn command_for(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Up => Some(Command::Jump),
        KeyCode::X => Some(Command::Dash),
        KeyCode::Escape => Some(Command::Pause),
        _ => None,
    }
}
