//! Core types for the rasterizer

use std::path::Path;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    /// Transparent color (will not be rendered)
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }

    /// Source-over compositing of `self` onto `back`
    ///
    /// Works for both opaque and translucent destinations, so the same
    /// operator serves the alpha buffer and the opaque background buffer.
    pub fn over(self, back: Color) -> Color {
        match self.a {
            0 => return back,
            255 => return self,
            _ => {}
        }
        let sa = self.a as u32;
        let da = back.a as u32;
        let inv = 255 - sa;
        // out_a scaled by 255 to keep integer precision
        let out_a255 = sa * 255 + da * inv;
        if out_a255 == 0 {
            return Color::TRANSPARENT;
        }
        let mix = |s: u8, d: u8| {
            ((s as u32 * sa * 255 + d as u32 * da * inv) / out_a255) as u8
        };
        Color {
            r: mix(self.r, back.r),
            g: mix(self.g, back.g),
            b: mix(self.b, back.b),
            a: ((out_a255 + 127) / 255) as u8,
        }
    }
}

/// An RGBA image used for tiles, entities and effects
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    /// RGBA, 4 bytes per pixel
    pub pixels: Vec<u8>,
}

impl Sprite {
    /// Create a sprite filled with one color
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        let bytes = color.to_bytes();
        let pixels = bytes.iter().copied().cycle().take(width * height * 4).collect();
        Self { width, height, pixels }
    }

    /// Load a sprite from a PNG file
    /// Pure black is treated as the color key and becomes transparent
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let mut rgba = img.to_rgba8().into_raw();
        apply_color_key(&mut rgba);

        Ok(Self { width: width as usize, height: height as usize, pixels: rgba })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        Color::from_bytes([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Nearest-neighbour rescale (used for the menu button artwork)
    pub fn scaled(&self, width: usize, height: usize) -> Sprite {
        if self.width == 0 || self.height == 0 || width == 0 || height == 0 {
            return Sprite { width, height, pixels: vec![0; width * height * 4] };
        }
        let mut pixels = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let sy = y * self.height / height;
            for x in 0..width {
                let sx = x * self.width / width;
                pixels.extend_from_slice(&self.get(sx, sy).to_bytes());
            }
        }
        Sprite { width, height, pixels }
    }
}

/// Black pixels become fully transparent
fn apply_color_key(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        if px[0] == 0 && px[1] == 0 && px[2] == 0 {
            px[3] = 0;
        }
    }
}
