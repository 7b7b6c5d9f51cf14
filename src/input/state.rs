//! Movement flags and per-frame commands

use macroquad::prelude::{is_key_pressed, is_key_released, KeyCode};

use super::{command_for, Command, KeyEvent, BOUND_KEYS};

#[derive(Debug, Default, Clone)]
pub struct InputState {
    left: bool,
    right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply key edges in order, returning the commands they trigger
    pub fn apply(&mut self, events: &[KeyEvent]) -> Vec<Command> {
        let mut commands = Vec::new();
        for &event in events {
            match event {
                KeyEvent::Down(KeyCode::Left) => self.left = true,
                KeyEvent::Down(KeyCode::Right) => self.right = true,
                KeyEvent::Up(KeyCode::Left) => self.left = false,
                KeyEvent::Up(KeyCode::Right) => self.right = false,
                KeyEvent::Down(key) => commands.extend(command_for(key)),
                KeyEvent::Up(_) => {}
            }
        }
        commands
    }

    /// Collect this frame's key edges from macroquad and apply them
    pub fn poll(&mut self) -> Vec<Command> {
        let mut events = Vec::new();
        for key in BOUND_KEYS {
            if is_key_pressed(key) {
                events.push(KeyEvent::Down(key));
            }
            if is_key_released(key) {
                events.push(KeyEvent::Up(key));
            }
        }
        self.apply(&events)
    }

    /// Drop held movement, e.g. when leaving a run
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Horizontal intent: -1, 0 or 1
    pub fn movement(&self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }
}
