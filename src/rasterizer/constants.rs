//! Rasterizer constants
//!
//! Resolution of the low-res composition buffers and the presented display.

/// Low-res buffer width (scene is composed at this size)
pub const WIDTH: usize = 320;

/// Low-res buffer height
pub const HEIGHT: usize = 240;

/// Default display width (low-res buffer is upscaled 4x)
pub const DISPLAY_WIDTH: u32 = 1280;

/// Default display height (low-res buffer is upscaled 3x)
pub const DISPLAY_HEIGHT: u32 = 720;
