//! One run of the game: level progression, death and respawn, scoring
//!
//! `Session::step` advances everything by exactly one frame. Rendering reads
//! the session afterwards and never mutates it.

use macroquad::math::Vec2;
use rand::rngs::StdRng;

use super::camera::{Camera, Screenshake};
use super::clouds::{Clouds, CLOUD_COUNT};
use super::context::FrameContext;
use super::effects::{emit_leaves, Particle, Spark};
use super::enemy::Enemy;
use super::event::{SoundCue, SoundCues};
use super::player::{Player, DASH_ACTIVE};
use super::projectile::{update_projectiles, Projectile, HIT_SHAKE};
use crate::rasterizer::{HEIGHT, WIDTH};
use crate::world::{LevelSet, Rect, TileKind, Tilemap};

/// Transition value right after a level loads (fully closed)
pub const TRANSITION_START: i32 = -30;
/// Frames with no enemies before the next level loads
pub const ADVANCE_AFTER: i32 = 30;
/// Dead frames before the screen starts closing
pub const DEATH_FADE_AT: u32 = 10;
/// Dead frames before the level restarts
pub const RELOAD_AFTER: u32 = 40;
pub const LEVEL_BONUS: u32 = 300;
pub const KILL_SCORE: u32 = 10;
pub const DEATH_PENALTY: u32 = 100;

/// Leaf spawner hitbox relative to a tree tile
const TREE_CANOPY: Rect = Rect::new(4.0, 4.0, 23.0, 13.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// The last level was cleared
    GameComplete,
}

pub struct Session {
    levels: LevelSet,
    level: usize,
    score: u32,
    /// 0 while alive, otherwise frames since death
    dead: u32,
    /// Circle mask state: negative while opening after a load, positive while closing
    transition: i32,
    camera: Camera,
    shake: Screenshake,
    tilemap: Tilemap,
    leaf_spawners: Vec<Rect>,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    sparks: Vec<Spark>,
    particles: Vec<Particle>,
    clouds: Clouds,
    rng: StdRng,
    cues: SoundCues,
}

impl Session {
    /// Start a fresh run on the first level
    pub fn new(levels: LevelSet, mut rng: StdRng, cloud_images: usize) -> Self {
        let clouds = Clouds::new(&mut rng, cloud_images, CLOUD_COUNT);
        let mut session = Self {
            levels,
            level: 0,
            score: 0,
            dead: 0,
            transition: TRANSITION_START,
            camera: Camera::new(),
            shake: Screenshake::new(),
            tilemap: Tilemap::new(16),
            leaf_spawners: Vec::new(),
            player: Player::new(Vec2::new(50.0, 50.0)),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            sparks: Vec::new(),
            particles: Vec::new(),
            clouds,
            rng,
            cues: SoundCues::new(),
        };
        // LevelSet is never empty
        session.load_level(0);
        session
    }

    /// Replace the world with level `index`; false if there is no such level
    ///
    /// Score and camera carry over.
    pub fn load_level(&mut self, index: usize) -> bool {
        let Some(map) = self.levels.get(index) else {
            return false;
        };
        let mut tilemap = Tilemap::from_data(map);

        self.leaf_spawners = tilemap
            .extract(&[(TileKind::LargeDecor, 2)], true)
            .iter()
            .map(|tree| {
                Rect::new(
                    tree.pos.x + TREE_CANOPY.x,
                    tree.pos.y + TREE_CANOPY.y,
                    TREE_CANOPY.w,
                    TREE_CANOPY.h,
                )
            })
            .collect();

        self.enemies.clear();
        for spawner in tilemap.extract(&[(TileKind::Spawners, 0), (TileKind::Spawners, 1)], false) {
            if spawner.variant == 0 {
                self.player.respawn_at(spawner.pos);
            } else {
                self.enemies.push(Enemy::new(spawner.pos));
            }
        }

        self.tilemap = tilemap;
        self.projectiles.clear();
        self.particles.clear();
        self.sparks.clear();
        self.dead = 0;
        self.transition = TRANSITION_START;
        log::info!(
            "loaded level {} with {} tiles and {} enemies",
            index,
            self.tilemap.tile_count(),
            self.enemies.len()
        );
        true
    }

    /// Advance one frame with the given horizontal movement intent (-1, 0 or 1)
    pub fn step(&mut self, movement: f32) -> StepOutcome {
        self.shake.decay();

        if self.enemies.is_empty() {
            self.transition += 1;
            if self.transition > ADVANCE_AFTER {
                self.level += 1;
                self.score += LEVEL_BONUS;
                if !self.load_level(self.level) {
                    log::info!("all {} levels cleared, final score {}", self.levels.len(), self.score);
                    return StepOutcome::GameComplete;
                }
            }
        }
        if self.transition < 0 {
            self.transition += 1;
        }

        if self.dead > 0 {
            self.dead += 1;
            if self.dead >= DEATH_FADE_AT {
                let cap = self.levels.len() as i32 - 1;
                self.transition = (self.transition + 1).min(cap);
            }
            if self.dead > RELOAD_AFTER {
                self.load_level(self.level);
                if self.score >= DEATH_PENALTY {
                    self.score -= DEATH_PENALTY;
                }
            }
        }

        self.camera.follow(self.player.rect().center(), Vec2::new(WIDTH as f32, HEIGHT as f32));
        emit_leaves(&self.leaf_spawners, &mut self.rng, &mut self.particles);
        self.clouds.update();

        let mut ctx = FrameContext {
            tilemap: &self.tilemap,
            rng: &mut self.rng,
            sparks: &mut self.sparks,
            particles: &mut self.particles,
            projectiles: &mut self.projectiles,
            shake: &mut self.shake,
            cues: &mut self.cues,
        };

        let player = &self.player;
        let mut kills = 0;
        self.enemies.retain_mut(|enemy| {
            let killed = enemy.update(&mut ctx, player);
            kills += killed as u32;
            !killed
        });
        self.score += kills * KILL_SCORE;

        if self.dead == 0 && self.player.update(&mut ctx, movement) {
            log::debug!("player fell out of level {}", self.level);
            self.dead += 1;
            ctx.shake.raise(HIT_SHAKE);
        }

        let target = (self.dead == 0 && self.player.dashing.abs() < DASH_ACTIVE).then(|| self.player.rect());
        let hits = update_projectiles(&mut ctx, target);
        if hits > 0 {
            log::debug!("player shot on level {}", self.level);
            self.dead += hits;
        }

        self.sparks.retain_mut(|spark| !spark.update());
        self.particles.retain_mut(|particle| !particle.update());

        StepOutcome::Continue
    }

    /// Jump request; the jump sound plays even if no jump is possible
    pub fn jump(&mut self) {
        self.cues.send(SoundCue::Jump);
        self.player.jump();
    }

    pub fn dash(&mut self) {
        self.player.dash(&mut self.cues);
    }

    /// Sounds requested since the last drain
    pub fn drain_cues(&mut self) -> impl Iterator<Item = SoundCue> + '_ {
        self.cues.drain()
    }

    /// Random jitter for presenting this frame
    pub fn shake_offset(&mut self) -> Vec2 {
        self.shake.offset(&mut self.rng)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn dead(&self) -> u32 {
        self.dead
    }

    pub fn transition(&self) -> i32 {
        self.transition
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clouds(&self) -> &Clouds {
        &self.clouds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridTile, MapData, OffgridTile};
    use proptest::prelude::*;
    use rand::SeedableRng;

    const GROUND_ROW: i32 = 10;

    /// A flat floor with the player standing at cell (2, 8)
    fn map_with_enemies(enemies: &[(i32, i32)]) -> MapData {
        let mut tiles: Vec<GridTile> = (0..40)
            .map(|x| GridTile { kind: TileKind::Grass, variant: 0, pos: (x, GROUND_ROW) })
            .collect();
        tiles.push(GridTile { kind: TileKind::Spawners, variant: 0, pos: (2, 8) });
        for &pos in enemies {
            tiles.push(GridTile { kind: TileKind::Spawners, variant: 1, pos });
            // A ledge well above the player so the enemy never has a shot
            tiles.push(GridTile { kind: TileKind::Stone, variant: 0, pos: (pos.0, pos.1 + 2) });
        }
        MapData { tile_size: 16, tiles, offgrid: Vec::new() }
    }

    fn session(maps: Vec<MapData>) -> Session {
        let levels = LevelSet::from_maps(maps).unwrap();
        Session::new(levels, StdRng::seed_from_u64(11), 1)
    }

    fn guarded() -> MapData {
        map_with_enemies(&[(30, 2)])
    }

    #[test]
    fn test_load_level_places_actors() {
        let mut map = guarded();
        map.offgrid.push(OffgridTile { kind: TileKind::LargeDecor, variant: 2, pos: (100.0, 96.0) });
        let s = session(vec![map]);

        assert_eq!(s.player().body.pos, Vec2::new(32.0, 128.0));
        assert_eq!(s.enemies().len(), 1);
        assert_eq!(s.enemies()[0].body.pos, Vec2::new(480.0, 32.0));
        assert_eq!(s.leaf_spawners, [Rect::new(104.0, 100.0, 23.0, 13.0)]);
        // Spawn markers are consumed, trees are kept
        assert!(s.tilemap().clone().extract(&[(TileKind::Spawners, 0)], true).is_empty());
        assert_eq!(s.tilemap().clone().extract(&[(TileKind::LargeDecor, 2)], true).len(), 1);
        assert_eq!(s.transition(), TRANSITION_START);
        assert_eq!(s.dead(), 0);
    }

    #[test]
    fn test_transition_opens_after_load() {
        let mut s = session(vec![guarded()]);
        for _ in 0..30 {
            s.step(0.0);
        }
        assert_eq!(s.transition(), 0);
        s.step(0.0);
        assert_eq!(s.transition(), 0);
    }

    #[test]
    fn test_reload_penalty_applied_at_100_or_more() {
        let mut s = session(vec![guarded()]);
        s.score = 250;
        s.dead = 40;
        s.step(0.0);
        assert_eq!(s.score(), 150);
        assert_eq!(s.dead(), 0);
        assert_eq!(s.level(), 0);
        assert_eq!(s.transition(), TRANSITION_START);
        assert_eq!(s.player().body.pos.x, 32.0);
    }

    #[test]
    fn test_reload_penalty_skipped_below_100() {
        let mut s = session(vec![guarded()]);
        s.score = 50;
        s.dead = 40;
        s.step(0.0);
        assert_eq!(s.score(), 50);
        assert_eq!(s.dead(), 0);
    }

    #[test]
    fn test_level_advances_after_31_clear_frames() {
        let mut s = session(vec![map_with_enemies(&[]), guarded()]);
        s.transition = 0;
        for _ in 0..30 {
            assert_eq!(s.step(0.0), StepOutcome::Continue);
        }
        assert_eq!(s.level(), 0);
        assert_eq!(s.transition(), 30);

        s.step(0.0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.score(), LEVEL_BONUS);
        assert_eq!(s.enemies().len(), 1);
        // Loaded mid-frame, then the opening transition already ticked once
        assert_eq!(s.transition(), TRANSITION_START + 1);
    }

    #[test]
    fn test_advance_fires_once_per_clear_streak() {
        let mut s = session(vec![map_with_enemies(&[]), guarded()]);
        for _ in 0..200 {
            s.step(0.0);
        }
        assert_eq!(s.level(), 1);
        assert_eq!(s.score(), LEVEL_BONUS);
    }

    #[test]
    fn test_last_level_completes_game() {
        let mut s = session(vec![map_with_enemies(&[])]);
        s.transition = 0;
        for _ in 0..30 {
            assert_eq!(s.step(0.0), StepOutcome::Continue);
        }
        assert_eq!(s.step(0.0), StepOutcome::GameComplete);
        assert_eq!(s.level(), 1);
    }

    #[test]
    fn test_death_transition_capped_by_level_count() {
        let mut s = session(vec![guarded(), guarded()]);
        s.transition = 0;
        s.dead = 9;
        for _ in 0..5 {
            s.step(0.0);
        }
        assert_eq!(s.transition(), 1);
        assert_eq!(s.dead(), 14);
    }

    #[test]
    fn test_falling_player_dies_and_shakes() {
        let mut map = guarded();
        map.tiles.retain(|t| t.kind != TileKind::Grass);
        let mut s = session(vec![map]);
        for _ in 0..120 {
            s.step(0.0);
        }
        assert_eq!(s.dead(), 0);
        s.step(0.0);
        assert_eq!(s.dead(), 1);
        assert_eq!(s.shake.magnitude(), HIT_SHAKE);
        s.step(0.0);
        assert_eq!(s.shake.magnitude(), HIT_SHAKE - 1.0);
    }

    #[test]
    fn test_dead_player_is_frozen_and_cannot_be_hit() {
        let mut s = session(vec![guarded()]);
        for _ in 0..10 {
            s.step(0.0);
        }
        let frozen = s.player().body.pos;
        s.dead = 1;
        let center = s.player().rect().center();
        s.projectiles.push(Projectile::new(center, 0.0));

        s.step(0.0);
        assert_eq!(s.dead(), 2);
        assert_eq!(s.player().body.pos, frozen);
        assert_eq!(s.projectiles().len(), 1);
    }

    #[test]
    fn test_projectile_kills_vulnerable_player() {
        let mut s = session(vec![guarded()]);
        for _ in 0..10 {
            s.step(0.0);
        }
        let center = s.player().rect().center();
        s.projectiles.push(Projectile::new(center, 0.0));
        s.step(0.0);
        assert_eq!(s.dead(), 1);
        assert!(s.projectiles().is_empty());
        assert!(s.drain_cues().any(|c| c == SoundCue::Hit));
    }

    #[test]
    fn test_dashing_player_dodges_projectiles() {
        let mut s = session(vec![guarded()]);
        for _ in 0..10 {
            s.step(0.0);
        }
        s.player.dashing = DASH_ACTIVE + 5;
        let center = s.player().rect().center();
        s.projectiles.push(Projectile::new(center, 0.0));
        s.step(0.0);
        assert_eq!(s.dead(), 0);
    }

    #[test]
    fn test_dash_kill_scores_and_removes_enemy() {
        let mut s = session(vec![map_with_enemies(&[(30, 2), (20, 2)])]);
        s.player.body.pos = s.enemies()[0].body.pos;
        s.player.dashing = 55;
        s.step(0.0);
        assert_eq!(s.enemies().len(), 1);
        assert_eq!(s.score(), KILL_SCORE);
        assert_eq!(s.shake.magnitude(), HIT_SHAKE);
    }

    #[test]
    fn test_jump_always_cues_sound() {
        let mut s = session(vec![guarded()]);
        s.jump();
        s.jump();
        let cues: Vec<_> = s.drain_cues().collect();
        assert_eq!(cues, vec![SoundCue::Jump, SoundCue::Jump]);
        assert!(s.drain_cues().next().is_none());
    }

    #[test]
    fn test_camera_follows_player() {
        let mut s = session(vec![guarded()]);
        let before = s.camera().scroll;
        s.step(0.0);
        let target = s.player().rect().center() - Vec2::new(WIDTH as f32, HEIGHT as f32) / 2.0;
        assert!((s.camera().scroll - before).length() > 0.0);
        assert!((s.camera().scroll - target).length() < (before - target).length());
    }

    proptest! {
        #[test]
        fn prop_reload_penalty_never_underflows(score in 0u32..1000) {
            let mut s = session(vec![guarded()]);
            s.score = score;
            s.dead = RELOAD_AFTER;
            s.step(0.0);
            let expected = if score >= DEATH_PENALTY { score - DEATH_PENALTY } else { score };
            prop_assert_eq!(s.score(), expected);
        }
    }
}
