//! Keyboard input
//!
//! Key events are turned into a movement intent (level-triggered) and
//! one-shot commands (edge-triggered). The mapping itself is pure so it can
//! be driven without a window; macroquad is only queried in `poll`.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
