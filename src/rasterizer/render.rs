//! Framebuffer and 2D drawing operations

use super::types::{Color, Sprite};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Clear framebuffer with transparent black (for alpha compositing)
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(0);
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        Color::from_bytes([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Composite `color` onto the existing pixel (source-over)
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let back = self.get_pixel(x, y);
        self.set_pixel(x, y, color.over(back));
    }

    /// Draw a sprite with its top-left corner at (x, y), optionally mirrored
    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32, flip_x: bool) {
        // Clip the sprite rect against the framebuffer once
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + sprite.width as i32).min(self.width as i32);
        let y1 = (y + sprite.height as i32).min(self.height as i32);

        for py in y0..y1 {
            let sy = (py - y) as usize;
            for px in x0..x1 {
                let mut sx = (px - x) as usize;
                if flip_x {
                    sx = sprite.width - 1 - sx;
                }
                let color = sprite.get(sx, sy);
                if !color.is_transparent() {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Fill a convex polygon using scanlines sampled at pixel centers
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let y_start = (min_y.floor() as i32).max(0);
        let y_end = (max_y.ceil() as i32).min(self.height as i32 - 1);

        for y in y_start..=y_end {
            let sample_y = y as f32 + 0.5;
            let mut left = f32::INFINITY;
            let mut right = f32::NEG_INFINITY;

            for i in 0..points.len() {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % points.len()];
                let (lo, hi) = if ay < by { (ay, by) } else { (by, ay) };
                if sample_y < lo || sample_y >= hi || lo == hi {
                    continue;
                }
                let t = (sample_y - ay) / (by - ay);
                let ix = ax + (bx - ax) * t;
                left = left.min(ix);
                right = right.max(ix);
            }

            if left > right {
                continue;
            }
            let x_start = (left.round() as i32).max(0);
            let x_end = (right.round() as i32).min(self.width as i32);
            for x in x_start..x_end {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Paint every pixel outside the circle with `color`
    ///
    /// Equivalent to blitting a full-screen `color` surface with a color-keyed
    /// hole punched out. A radius <= 0 covers the whole buffer.
    pub fn mask_outside_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = if radius > 0 { radius * radius } else { -1 };
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as i32 - cx;
                let dy = y as i32 - cy;
                if dx * dx + dy * dy > r_sq {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Build a silhouette of everything drawn so far
    ///
    /// Pixels with alpha above 127 become `fill`; the rest are transparent.
    pub fn silhouette(&self, fill: Color) -> Framebuffer {
        let mut out = Framebuffer::new(self.width, self.height);
        let fill = fill.to_bytes();
        for (dst, src) in out.pixels.chunks_exact_mut(4).zip(self.pixels.chunks_exact(4)) {
            if src[3] > 127 {
                dst.copy_from_slice(&fill);
            }
        }
        out
    }

    /// Composite another buffer of the same kind onto this one at an offset
    pub fn composite(&mut self, src: &Framebuffer, dx: i32, dy: i32) {
        for sy in 0..src.height {
            let ty = sy as i32 + dy;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let tx = sx as i32 + dx;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let color = src.get_pixel(sx, sy);
                if !color.is_transparent() {
                    self.blend_pixel(tx, ty, color);
                }
            }
        }
    }

    /// Draw a filled rectangle from (x0, y0) to (x1, y1) inclusive
    pub fn draw_filled_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (min_x, max_x) = if x0 < x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 < y1 { (y0, y1) } else { (y1, y0) };

        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Count pixels that are not fully transparent
    #[cfg(test)]
    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}
