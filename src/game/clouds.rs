//! Parallax cloud layer

use macroquad::math::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::rasterizer::{Framebuffer, Sprite};

pub const CLOUD_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    /// Index into the cloud images
    pub image: usize,
    pub speed: f32,
    /// Parallax factor: 0 is pinned to the screen, 1 moves with the world
    pub depth: f32,
}

impl Cloud {
    /// Top-left draw position, wrapped so the cloud keeps re-entering the view
    pub fn screen_pos(&self, offset: (i32, i32), img_size: (usize, usize), view: (usize, usize)) -> (i32, i32) {
        let rx = self.pos.x - offset.0 as f32 * self.depth;
        let ry = self.pos.y - offset.1 as f32 * self.depth;
        let span_x = (view.0 + img_size.0) as f32;
        let span_y = (view.1 + img_size.1) as f32;
        (
            rx.rem_euclid(span_x) as i32 - img_size.0 as i32,
            ry.rem_euclid(span_y) as i32 - img_size.1 as i32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Clouds {
    /// Sorted far to near
    clouds: Vec<Cloud>,
}

impl Clouds {
    pub fn new(rng: &mut StdRng, image_count: usize, count: usize) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.gen::<f32>() * 99999.0, rng.gen::<f32>() * 99999.0),
                image: if image_count > 0 { rng.gen_range(0..image_count) } else { 0 },
                speed: rng.gen::<f32>() * 0.05 + 0.05,
                depth: rng.gen::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.pos.x += cloud.speed;
        }
    }

    pub fn render(&self, fb: &mut Framebuffer, images: &[Sprite], offset: (i32, i32)) {
        let view = (fb.width, fb.height);
        for cloud in &self.clouds {
            let Some(img) = images.get(cloud.image) else { continue };
            let (x, y) = cloud.screen_pos(offset, (img.width, img.height), view);
            fb.blit(img, x, y, false);
        }
    }
}
