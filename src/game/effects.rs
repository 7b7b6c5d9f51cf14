//! Visual effects: sparks, dust and falling leaves
//!
//! Sparks are drawn procedurally as small diamonds. Particles play a short
//! non-looping sprite animation and are removed once it finishes.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use macroquad::math::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::rasterizer::{Color, Framebuffer, Sprite};
use crate::world::Rect;

/// Leaf spawn chance scale: a region of area A spawns with probability A / 59999
pub const LEAF_SPAWN_SCALE: f32 = 59999.0;

/// Frame counter for a sprite animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    /// Elapsed ticks
    pub tick: u32,
    pub frame_duration: u32,
    pub frame_count: u32,
    pub looping: bool,
}

impl AnimationClock {
    pub fn new(frame_count: u32, frame_duration: u32, looping: bool) -> Self {
        Self {
            tick: 0,
            frame_duration: frame_duration.max(1),
            frame_count: frame_count.max(1),
            looping,
        }
    }

    fn total_ticks(&self) -> u32 {
        self.frame_duration * self.frame_count
    }

    pub fn update(&mut self) {
        if self.looping {
            self.tick = (self.tick + 1) % self.total_ticks();
        } else {
            self.tick = (self.tick + 1).min(self.total_ticks() - 1);
        }
    }

    /// A non-looping clock has reached its last tick
    pub fn done(&self) -> bool {
        !self.looping && self.tick >= self.total_ticks() - 1
    }

    /// Index of the image to show
    pub fn frame(&self) -> usize {
        (self.tick / self.frame_duration) as usize
    }
}

/// A short-lived streak flying away from an impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Advance one frame; returns true once the spark has stopped
    pub fn update(&mut self) -> bool {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed;
        self.speed = (self.speed - 0.1).max(0.0);
        self.speed == 0.0
    }

    /// Diamond long along the flight direction, thin across it
    pub fn polygon(&self, offset: (i32, i32)) -> [(f32, f32); 4] {
        let origin = self.pos - Vec2::new(offset.0 as f32, offset.1 as f32);
        let point = |angle: f32, len: f32| {
            let p = origin + Vec2::new(angle.cos(), angle.sin()) * len;
            (p.x, p.y)
        };
        [
            point(self.angle, self.speed * 3.0),
            point(self.angle + FRAC_PI_2, self.speed * 0.5),
            point(self.angle + PI, self.speed * 3.0),
            point(self.angle - FRAC_PI_2, self.speed * 0.5),
        ]
    }

    pub fn render(&self, fb: &mut Framebuffer, offset: (i32, i32)) {
        fb.fill_polygon(&self.polygon(offset), Color::WHITE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Falls from trees and sways sideways
    Leaf,
    /// Puffs from dashes and hits
    Dust,
}

impl ParticleKind {
    /// Images in `particles/leaf`
    pub const LEAF_FRAMES: u32 = 18;
    /// Images in `particles/particle`
    pub const DUST_FRAMES: u32 = 4;

    pub fn clock(self) -> AnimationClock {
        match self {
            ParticleKind::Leaf => AnimationClock::new(Self::LEAF_FRAMES, 20, false),
            ParticleKind::Dust => AnimationClock::new(Self::DUST_FRAMES, 6, false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: AnimationClock,
}

impl Particle {
    /// `frame` is the starting tick of the animation
    pub fn new(kind: ParticleKind, pos: Vec2, velocity: Vec2, frame: u32) -> Self {
        let mut animation = kind.clock();
        animation.tick = frame.min(animation.frame_duration * animation.frame_count - 1);
        Self { kind, pos, velocity, animation }
    }

    /// Advance one frame; returns true if the animation had already finished
    pub fn update(&mut self) -> bool {
        let finished = self.animation.done();
        self.pos += self.velocity;
        self.animation.update();
        if self.kind == ParticleKind::Leaf {
            self.pos.x += (self.animation.tick as f32 * 0.035).sin() * 0.3;
        }
        finished
    }

    /// Draw the current image centered on the particle
    pub fn render(&self, fb: &mut Framebuffer, images: &[Sprite], offset: (i32, i32)) {
        let Some(img) = images.get(self.animation.frame()) else { return };
        let x = self.pos.x - img.width as f32 / 2.0 - offset.0 as f32;
        let y = self.pos.y - img.height as f32 / 2.0 - offset.1 as f32;
        fb.blit(img, x as i32, y as i32, false);
    }
}

/// Spawn a leaf in each region with probability proportional to its area
pub fn emit_leaves(spawners: &[Rect], rng: &mut StdRng, particles: &mut Vec<Particle>) {
    for rect in spawners {
        if rng.gen::<f32>() * LEAF_SPAWN_SCALE < rect.area() {
            let pos = Vec2::new(
                rect.x + rng.gen::<f32>() * rect.w,
                rect.y + rng.gen::<f32>() * rect.h,
            );
            let frame = rng.gen_range(0..=20);
            particles.push(Particle::new(ParticleKind::Leaf, pos, Vec2::new(-0.1, 0.3), frame));
        }
    }
}

/// Radial burst of sparks and dust used for hits and kills
pub fn burst(
    center: Vec2,
    count: usize,
    rng: &mut StdRng,
    sparks: &mut Vec<Spark>,
    particles: &mut Vec<Particle>,
) {
    for _ in 0..count {
        let angle = rng.gen::<f32>() * TAU;
        let speed = rng.gen::<f32>() * 5.0;
        sparks.push(Spark::new(center, angle, 2.0 + rng.gen::<f32>()));
        let velocity = Vec2::new((angle + PI).cos(), (angle + PI).sin()) * speed * 0.5;
        particles.push(Particle::new(ParticleKind::Dust, center, velocity, rng.gen_range(0..=7)));
    }
}
