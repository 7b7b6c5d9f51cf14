//! Mutable frame state shared with actor updates

use rand::rngs::StdRng;

use super::camera::Screenshake;
use super::effects::{Particle, Spark};
use super::event::SoundCues;
use super::projectile::Projectile;
use crate::world::Tilemap;

/// Borrowed view of the session that actors may read or spawn into
///
/// Each field borrows a distinct part of the session, so the session can
/// lend this out while it iterates its own actor lists.
pub struct FrameContext<'a> {
    pub tilemap: &'a Tilemap,
    pub rng: &'a mut StdRng,
    pub sparks: &'a mut Vec<Spark>,
    pub particles: &'a mut Vec<Particle>,
    pub projectiles: &'a mut Vec<Projectile>,
    pub shake: &'a mut Screenshake,
    pub cues: &'a mut SoundCues,
}

/// Owned frame state for driving actors in unit tests
#[cfg(test)]
pub(crate) struct TestFrame {
    pub tilemap: Tilemap,
    pub rng: StdRng,
    pub sparks: Vec<Spark>,
    pub particles: Vec<Particle>,
    pub projectiles: Vec<Projectile>,
    pub shake: Screenshake,
    pub cues: SoundCues,
}

#[cfg(test)]
impl TestFrame {
    pub fn new(tilemap: Tilemap) -> Self {
        use rand::SeedableRng;
        Self {
            tilemap,
            rng: StdRng::seed_from_u64(42),
            sparks: Vec::new(),
            particles: Vec::new(),
            projectiles: Vec::new(),
            shake: Screenshake::new(),
            cues: SoundCues::new(),
        }
    }

    pub fn ctx(&mut self) -> FrameContext<'_> {
        FrameContext {
            tilemap: &self.tilemap,
            rng: &mut self.rng,
            sparks: &mut self.sparks,
            particles: &mut self.particles,
            projectiles: &mut self.projectiles,
            shake: &mut self.shake,
            cues: &mut self.cues,
        }
    }
}
