//! Physics body shared by the player and enemies
//!
//! Movement is resolved one axis at a time against the solid tiles around
//! the body: X first, then Y. Each axis snaps the body flush against any
//! tile it ends up overlapping and records which side was hit.

use std::collections::HashMap;

use macroquad::math::Vec2;

use crate::rasterizer::{Framebuffer, Sprite};
use crate::world::{Rect, Tilemap};

/// Terminal fall speed
pub const MAX_FALL_SPEED: f32 = 5.0;
pub const GRAVITY: f32 = 0.1;
/// Sprites are drawn this far up-left of the hitbox
pub const ANIM_OFFSET: (i32, i32) = (-3, -3);

/// Animation an actor is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Idle,
    Run,
    Jump,
    Slide,
    WallSlide,
}

impl Action {
    pub const ALL: [Action; 5] = [Action::Idle, Action::Run, Action::Jump, Action::Slide, Action::WallSlide];

    /// Folder name under `entities/<actor>/`
    pub fn asset_dir(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Run => "run",
            Action::Jump => "jump",
            Action::Slide => "slide",
            Action::WallSlide => "wall_slide",
        }
    }

    /// Ticks each image is held for
    pub fn frame_duration(self) -> u32 {
        match self {
            Action::Idle => 6,
            Action::Run => 4,
            _ => 5,
        }
    }
}

/// Animation images for one actor type
pub type ActorSprites = HashMap<Action, Vec<Sprite>>;

/// Which sides touched a tile during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: Collisions,
    /// Facing left
    pub flip: bool,
    pub last_movement: Vec2,
    pub action: Action,
    /// Ticks since `action` started
    pub anim_tick: u32,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
            flip: false,
            last_movement: Vec2::ZERO,
            action: Action::Idle,
            anim_tick: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Switch animation, restarting it only when the action changes
    pub fn set_action(&mut self, action: Action) {
        if action != self.action {
            self.action = action;
            self.anim_tick = 0;
        }
    }

    /// Apply movement plus velocity, collide with tiles, then apply gravity
    pub fn update(&mut self, tilemap: &Tilemap, movement: Vec2) {
        self.collisions = Collisions::default();
        let frame_movement = movement + self.velocity;

        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_around(self.pos) {
            if rect.overlaps(&tile) {
                if frame_movement.x > 0.0 {
                    rect.x = tile.x - rect.w;
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.x = tile.right();
                    self.collisions.left = true;
                }
                self.pos.x = rect.x;
            }
        }

        self.pos.y += frame_movement.y;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_around(self.pos) {
            if rect.overlaps(&tile) {
                if frame_movement.y > 0.0 {
                    rect.y = tile.y - rect.h;
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.y = tile.bottom();
                    self.collisions.up = true;
                }
                self.pos.y = rect.y;
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }
        self.last_movement = movement;

        self.velocity.y = (self.velocity.y + GRAVITY).min(MAX_FALL_SPEED);
        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }

        self.anim_tick = self.anim_tick.wrapping_add(1);
    }

    /// Draw the current animation image at the body's position
    pub fn render(&self, fb: &mut Framebuffer, sprites: &ActorSprites, offset: (i32, i32)) {
        let Some(images) = sprites.get(&self.action).filter(|v| !v.is_empty()) else { return };
        let index = (self.anim_tick / self.action.frame_duration()) as usize % images.len();
        let x = self.pos.x as i32 - offset.0 + ANIM_OFFSET.0;
        let y = self.pos.y as i32 - offset.1 + ANIM_OFFSET.1;
        fb.blit(&images[index], x, y, self.flip);
    }
}
