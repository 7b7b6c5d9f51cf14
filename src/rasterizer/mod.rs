//! Software framebuffer for 2D sprite compositing
//!
//! The scene is drawn on the CPU into small RGBA buffers and uploaded to a
//! macroquad texture once per frame, then scaled up to the window.
//!
//! # Module Organization
//!
//! - `types` - Color and Sprite
//! - `render` - Framebuffer with blit, polygon, silhouette and mask operations
//! - `font` - Built-in 5x7 bitmap font for HUD text
//! - `constants` - Buffer and display resolution

pub mod constants;
pub mod font;
pub mod render;
pub mod types;

pub use constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, HEIGHT, WIDTH};
pub use render::Framebuffer;
pub use types::{Color, Sprite};
