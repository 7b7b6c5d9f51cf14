//! Patrolling gunmen

use std::f32::consts::PI;

use macroquad::math::Vec2;
use rand::Rng;

use super::context::FrameContext;
use super::effects::{burst, Spark};
use super::entity::{Action, ActorSprites, PhysicsBody};
use super::event::SoundCue;
use super::player::{Player, DASH_ACTIVE};
use super::projectile::{Projectile, HIT_SHAKE};
use crate::rasterizer::{Framebuffer, Sprite};
use crate::world::Rect;

pub const ENEMY_SIZE: Vec2 = Vec2::new(8.0, 15.0);
const WALK_SPEED: f32 = 0.5;
const WALK_CHANCE: f32 = 0.01;
const BULLET_SPEED: f32 = 1.5;
/// Horizontal distance from center to the muzzle and ledge probe
const REACH: f32 = 7.0;
/// Vertical tolerance for spotting the player
const SIGHT_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: PhysicsBody,
    /// Frames of walking left, 0 while standing
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self { body: PhysicsBody::new(pos, ENEMY_SIZE), walking: 0 }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advance one frame; returns true when the dashing player killed this enemy
    pub fn update(&mut self, ctx: &mut FrameContext, player: &Player) -> bool {
        let mut movement = 0.0;

        if self.walking > 0 {
            let rect = self.rect();
            let probe_x = rect.center_x() + if self.body.flip { -REACH } else { REACH };
            if ctx.tilemap.solid_check(Vec2::new(probe_x, self.body.pos.y + 23.0)) {
                if self.body.collisions.horizontal() {
                    self.body.flip = !self.body.flip;
                } else {
                    movement = if self.body.flip { -WALK_SPEED } else { WALK_SPEED };
                }
            } else {
                self.body.flip = !self.body.flip;
            }

            self.walking -= 1;
            if self.walking == 0 {
                self.try_shoot(ctx, player);
            }
        } else if ctx.rng.gen::<f32>() < WALK_CHANCE {
            self.walking = ctx.rng.gen_range(30..=120);
        }

        self.body.update(ctx.tilemap, Vec2::new(movement, 0.0));
        self.body.set_action(if movement != 0.0 { Action::Run } else { Action::Idle });

        if player.dashing.abs() >= DASH_ACTIVE && self.rect().overlaps(&player.rect()) {
            ctx.shake.raise(HIT_SHAKE);
            ctx.cues.send(SoundCue::Hit);
            let center = self.rect().center();
            burst(center, 30, ctx.rng, ctx.sparks, ctx.particles);
            ctx.sparks.push(Spark::new(center, 0.0, 5.0 + ctx.rng.gen::<f32>()));
            ctx.sparks.push(Spark::new(center, PI, 5.0 + ctx.rng.gen::<f32>()));
            return true;
        }
        false
    }

    /// Fire toward the player if they stand level with us on the facing side
    fn try_shoot(&mut self, ctx: &mut FrameContext, player: &Player) {
        let dis = player.body.pos - self.body.pos;
        if dis.y.abs() >= SIGHT_HEIGHT {
            return;
        }
        let rect = self.rect();
        let (muzzle_x, velocity, back) = match (self.body.flip, dis.x) {
            (true, dx) if dx < 0.0 => (rect.center_x() - REACH, -BULLET_SPEED, PI),
            (false, dx) if dx > 0.0 => (rect.center_x() + REACH, BULLET_SPEED, 0.0),
            _ => return,
        };

        ctx.cues.send(SoundCue::Shoot);
        let muzzle = Vec2::new(muzzle_x, rect.center_y());
        ctx.projectiles.push(Projectile::new(muzzle, velocity));
        for _ in 0..4 {
            let angle = ctx.rng.gen::<f32>() - 0.5 + back;
            ctx.sparks.push(Spark::new(muzzle, angle, 2.0 + ctx.rng.gen::<f32>()));
        }
    }

    /// Body animation plus the gun held on the facing side
    pub fn render(&self, fb: &mut Framebuffer, sprites: &ActorSprites, gun: &Sprite, offset: (i32, i32)) {
        self.body.render(fb, sprites, offset);

        let rect = self.rect();
        let y = rect.center_y() as i32 - offset.1;
        if self.body.flip {
            let x = rect.center_x() as i32 - 4 - gun.width as i32 - offset.0;
            fb.blit(gun, x, y, true);
        } else {
            let x = rect.center_x() as i32 + 4 - offset.0;
            fb.blit(gun, x, y, false);
        }
    }
}
