//! World module - tile-based side-scrolling levels
//!
//! - Grid tiles (collision + rendering) and off-grid decorations
//! - Spawner extraction for the player start and enemies
//! - Level files in RON, indexed 0..N in the maps directory

mod level;
mod rect;
mod tilemap;

pub use level::*;
pub use rect::*;
pub use tilemap::*;
