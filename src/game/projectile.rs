//! Enemy bullets and their collisions

use std::f32::consts::PI;

use macroquad::math::Vec2;
use rand::Rng;

use super::context::FrameContext;
use super::effects::{burst, Spark};
use super::event::SoundCue;
use crate::world::Rect;

/// Frames a bullet survives without hitting anything
pub const MAX_AGE: u32 = 360;
/// Shake applied when the player is hit
pub const HIT_SHAKE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Horizontal speed, sign gives direction
    pub velocity: f32,
    /// Frames since firing
    pub age: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, velocity: f32) -> Self {
        Self { pos, velocity, age: 0 }
    }
}

/// How a projectile left play this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Wall,
    Expired,
    Player,
}

/// Advance a single projectile and report whether it was destroyed
///
/// The three outcomes are checked in order and only the first applies.
pub fn step_projectile(p: &mut Projectile, ctx: &mut FrameContext, target: Option<Rect>) -> Option<Impact> {
    p.pos.x += p.velocity;
    p.age += 1;

    if ctx.tilemap.solid_check(p.pos) {
        let back = if p.velocity > 0.0 { PI } else { 0.0 };
        for _ in 0..4 {
            let angle = ctx.rng.gen::<f32>() - 0.5 + back;
            let speed = 2.0 + ctx.rng.gen::<f32>();
            ctx.sparks.push(Spark::new(p.pos, angle, speed));
        }
        return Some(Impact::Wall);
    }

    if p.age > MAX_AGE {
        return Some(Impact::Expired);
    }

    match target {
        Some(rect) if rect.contains_point(p.pos) => {
            ctx.cues.send(SoundCue::Hit);
            ctx.shake.raise(HIT_SHAKE);
            burst(rect.center(), 30, ctx.rng, ctx.sparks, ctx.particles);
            Some(Impact::Player)
        }
        _ => None,
    }
}

/// Update every live projectile in firing order; returns the number of player hits
///
/// `target` is the player's hitbox, or None while the player cannot be hit.
pub fn update_projectiles(ctx: &mut FrameContext, target: Option<Rect>) -> u32 {
    let mut projectiles = std::mem::take(ctx.projectiles);
    let mut hits = 0;
    projectiles.retain_mut(|p| match step_projectile(p, ctx, target) {
        Some(Impact::Player) => {
            hits += 1;
            false
        }
        Some(_) => false,
        None => true,
    });
    // Anything fired during the update lands after the survivors
    projectiles.append(ctx.projectiles);
    *ctx.projectiles = projectiles;
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::context::TestFrame;
    use crate::world::{GridTile, TileKind, Tilemap};

    fn frame() -> TestFrame {
        let mut tilemap = Tilemap::new(16);
        tilemap.insert(GridTile { kind: TileKind::Stone, variant: 0, pos: (10, 0) });
        TestFrame::new(tilemap)
    }

    fn run(h: &mut TestFrame, target: Option<Rect>) -> u32 {
        update_projectiles(&mut h.ctx(), target)
    }

    #[test]
    fn test_expired_projectile_leaves_no_effect() {
        let mut h = frame();
        h.projectiles.push(Projectile { pos: Vec2::new(20.0, 8.0), velocity: 0.0, age: 360 });
        assert_eq!(run(&mut h, None), 0);
        assert!(h.projectiles.is_empty());
        assert!(h.sparks.is_empty());
        assert!(h.particles.is_empty());
    }

    #[test]
    fn test_wall_hit_spawns_four_sparks_at_position() {
        let mut h = frame();
        h.projectiles.push(Projectile::new(Vec2::new(159.0, 8.0), 1.5));
        run(&mut h, None);
        assert!(h.projectiles.is_empty());
        assert_eq!(h.sparks.len(), 4);
        for spark in &h.sparks {
            assert_eq!(spark.pos, Vec2::new(160.5, 8.0));
            // Moving right, so sparks fly back to the left
            assert!((spark.angle - PI).abs() <= 0.5);
            assert!((2.0..3.0).contains(&spark.speed));
        }
    }

    #[test]
    fn test_wall_check_wins_over_player_hit() {
        let mut h = frame();
        h.projectiles.push(Projectile::new(Vec2::new(159.0, 8.0), 1.5));
        let player = Rect::new(150.0, 0.0, 20.0, 20.0);
        assert_eq!(run(&mut h, Some(player)), 0);
        assert_eq!(h.sparks.len(), 4);
        assert!(h.cues.is_empty());
    }

    #[test]
    fn test_player_hit() {
        let mut h = frame();
        h.projectiles.push(Projectile::new(Vec2::new(48.0, 8.0), -1.5));
        h.projectiles.push(Projectile::new(Vec2::new(300.0, 8.0), -1.5));
        let player = Rect::new(40.0, 0.0, 8.0, 15.0);

        assert_eq!(run(&mut h, Some(player)), 1);
        assert_eq!(h.projectiles.len(), 1);
        assert_eq!(h.projectiles[0].age, 1);
        assert_eq!(h.sparks.len(), 30);
        assert_eq!(h.particles.len(), 30);
        assert_eq!(h.shake.magnitude(), HIT_SHAKE);
        assert_eq!(h.cues.iter().copied().collect::<Vec<_>>(), vec![SoundCue::Hit]);
    }

    #[test]
    fn test_no_target_means_no_player_hit() {
        let mut h = frame();
        h.projectiles.push(Projectile::new(Vec2::new(48.0, 8.0), -1.5));
        assert_eq!(run(&mut h, None), 0);
        assert_eq!(h.projectiles.len(), 1);
        assert!(h.sparks.is_empty());
    }

    #[test]
    fn test_lifetime_runs_out_after_max_age() {
        let mut h = frame();
        h.projectiles.push(Projectile::new(Vec2::new(100.0, 100.0), 0.0));
        for _ in 0..MAX_AGE {
            run(&mut h, None);
        }
        assert_eq!(h.projectiles.len(), 1);
        run(&mut h, None);
        assert!(h.projectiles.is_empty());
    }
}
