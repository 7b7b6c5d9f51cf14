//! The player ninja: running, jumping, wall sliding and dashing

use std::f32::consts::TAU;

use macroquad::math::Vec2;
use rand::Rng;

use super::context::FrameContext;
use super::effects::{Particle, ParticleKind};
use super::entity::{Action, ActorSprites, PhysicsBody};
use super::event::{SoundCue, SoundCues};
use crate::rasterizer::Framebuffer;
use crate::world::Rect;

pub const PLAYER_SIZE: Vec2 = Vec2::new(8.0, 15.0);
/// Frames of falling before the player counts as lost
pub const FALL_DEATH_AIR_TIME: u32 = 120;
/// Dash counter set by a new dash
pub const DASH_FRAMES: i32 = 60;
/// Above this |dashing| the player moves at dash speed and is invulnerable
pub const DASH_ACTIVE: i32 = 50;
const DASH_SPEED: f32 = 8.0;
const FRICTION: f32 = 0.1;
const JUMP_VELOCITY: f32 = -3.0;
const WALL_JUMP: Vec2 = Vec2::new(3.5, -2.5);
const WALL_SLIDE_SPEED: f32 = 0.5;
/// Air frames before wall sliding and the jump pose kick in
const AIRBORNE_THRESHOLD: u32 = 4;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Signed dash counter, sign is the dash direction
    pub dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: PhysicsBody::new(pos, PLAYER_SIZE),
            air_time: 0,
            jumps: 1,
            wall_slide: false,
            dashing: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Mid-dash the player is drawn hidden and cannot be shot
    pub fn is_dash_active(&self) -> bool {
        self.dashing.abs() > DASH_ACTIVE
    }

    /// Move the player to a spawn point
    pub fn respawn_at(&mut self, pos: Vec2) {
        self.body.pos = pos;
        self.air_time = 0;
    }

    /// Advance one frame; returns true when the player has fallen out of the world
    pub fn update(&mut self, ctx: &mut FrameContext, movement: f32) -> bool {
        self.body.update(ctx.tilemap, Vec2::new(movement, 0.0));

        self.air_time += 1;
        let fell = self.air_time > FALL_DEATH_AIR_TIME;

        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        self.wall_slide = false;
        if self.body.collisions.horizontal() && self.air_time > AIRBORNE_THRESHOLD {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_SPEED);
            self.body.flip = !self.body.collisions.right;
            self.body.set_action(Action::WallSlide);
        }

        if !self.wall_slide {
            if self.air_time > AIRBORNE_THRESHOLD {
                self.body.set_action(Action::Jump);
            } else if movement != 0.0 {
                self.body.set_action(Action::Run);
            } else {
                self.body.set_action(Action::Idle);
            }
        }

        let center = self.rect().center();
        if self.dashing.abs() == DASH_FRAMES || self.dashing.abs() == DASH_ACTIVE {
            for _ in 0..20 {
                let angle = ctx.rng.gen::<f32>() * TAU;
                let speed = ctx.rng.gen::<f32>() * 0.5 + 0.5;
                let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
                let frame = ctx.rng.gen_range(0..=7);
                ctx.particles.push(Particle::new(ParticleKind::Dust, center, velocity, frame));
            }
        }

        self.dashing -= self.dashing.signum();

        if self.is_dash_active() {
            let direction = self.dashing.signum() as f32;
            self.body.velocity.x = direction * DASH_SPEED;
            if self.dashing.abs() == DASH_ACTIVE + 1 {
                self.body.velocity.x *= 0.1;
            }
            let trail = Vec2::new(direction * ctx.rng.gen::<f32>() * 3.0, 0.0);
            let frame = ctx.rng.gen_range(0..=7);
            ctx.particles.push(Particle::new(ParticleKind::Dust, center, trail, frame));
        }

        if self.body.velocity.x > 0.0 {
            self.body.velocity.x = (self.body.velocity.x - FRICTION).max(0.0);
        } else {
            self.body.velocity.x = (self.body.velocity.x + FRICTION).min(0.0);
        }

        fell
    }

    /// Jump, wall jump, or do nothing; returns whether a jump happened
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            let away = if self.body.flip && self.body.last_movement.x < 0.0 {
                1.0
            } else if !self.body.flip && self.body.last_movement.x > 0.0 {
                -1.0
            } else {
                return false;
            };
            self.body.velocity = Vec2::new(WALL_JUMP.x * away, WALL_JUMP.y);
            self.air_time = 5;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }

        if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = 5;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction unless one is running
    pub fn dash(&mut self, cues: &mut SoundCues) {
        if self.dashing == 0 {
            cues.send(SoundCue::Dash);
            self.dashing = if self.body.flip { -DASH_FRAMES } else { DASH_FRAMES };
        }
    }

    /// Hidden while the dash is at full speed
    pub fn render(&self, fb: &mut Framebuffer, sprites: &ActorSprites, offset: (i32, i32)) {
        if !self.is_dash_active() {
            self.body.render(fb, sprites, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::context::TestFrame;
    use crate::world::{GridTile, TileKind, Tilemap};

    fn step(world: &mut TestFrame, player: &mut Player, movement: f32) -> bool {
        player.update(&mut world.ctx(), movement)
    }

    fn floor() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in -5..20 {
            map.insert(GridTile { kind: TileKind::Grass, variant: 0, pos: (x, 4) });
        }
        map
    }

    #[test]
    fn test_falls_to_death_without_ground() {
        let mut world = TestFrame::new(Tilemap::new(16));
        let mut player = Player::new(Vec2::ZERO);
        for _ in 0..FALL_DEATH_AIR_TIME {
            assert!(!step(&mut world, &mut player, 0.0));
        }
        assert!(step(&mut world, &mut player, 0.0));
    }

    #[test]
    fn test_single_air_jump_resets_on_landing() {
        let mut world = TestFrame::new(floor());
        let mut player = Player::new(Vec2::new(24.0, 49.0));
        for _ in 0..3 {
            step(&mut world, &mut player, 0.0);
        }
        assert_eq!(player.jumps, 1);
        assert!(player.jump());
        assert_eq!(player.body.velocity.y, JUMP_VELOCITY);
        assert!(!player.jump());

        for _ in 0..200 {
            step(&mut world, &mut player, 0.0);
        }
        assert_eq!(player.jumps, 1);
        assert_eq!(player.body.pos.y, 49.0);
    }

    #[test]
    fn test_dash_moves_and_bursts() {
        let mut world = TestFrame::new(floor());
        let mut player = Player::new(Vec2::new(24.0, 49.0));
        player.dash(&mut world.cues);
        assert_eq!(player.dashing, DASH_FRAMES);
        assert_eq!(world.cues.len(), 1);

        // A second dash request while dashing is ignored
        player.dash(&mut world.cues);
        assert_eq!(world.cues.len(), 1);

        step(&mut world, &mut player, 0.0);
        // 20 burst particles plus one trail particle
        assert_eq!(world.particles.len(), 21);
        assert_eq!(player.dashing, DASH_FRAMES - 1);
        assert!(player.body.velocity.x > 7.0);

        for _ in 0..DASH_FRAMES {
            step(&mut world, &mut player, 0.0);
        }
        assert_eq!(player.dashing, 0);
        assert!(player.body.pos.x > 80.0);
    }

    #[test]
    fn test_dash_left_when_facing_left() {
        let mut world = TestFrame::new(floor());
        let mut player = Player::new(Vec2::new(100.0, 49.0));
        step(&mut world, &mut player, -1.0);
        player.dash(&mut world.cues);
        assert_eq!(player.dashing, -DASH_FRAMES);
    }

    #[test]
    fn test_wall_slide_and_wall_jump() {
        let mut map = floor();
        for y in -4..4 {
            map.insert(GridTile { kind: TileKind::Stone, variant: 0, pos: (5, y) });
        }
        let mut world = TestFrame::new(map);
        let mut player = Player::new(Vec2::new(70.0, 0.0));
        for _ in 0..10 {
            step(&mut world, &mut player, 1.0);
        }
        assert!(player.wall_slide);
        assert!(player.body.velocity.y <= WALL_SLIDE_SPEED);
        assert!(!player.body.flip);

        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::new(-3.5, -2.5));
    }

    #[test]
    fn test_friction_brings_velocity_to_rest() {
        let mut world = TestFrame::new(floor());
        let mut player = Player::new(Vec2::new(24.0, 49.0));
        player.body.velocity.x = 1.0;
        for _ in 0..20 {
            step(&mut world, &mut player, 0.0);
        }
        assert_eq!(player.body.velocity.x, 0.0);
    }
}
