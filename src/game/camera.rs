//! Camera follow and screenshake

use macroquad::math::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

/// Per-axis smoothing: the camera closes 1/30 of the gap each frame
pub const FOLLOW_DIVISOR: f32 = 30.0;

/// Scroll position of the low-res view
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub scroll: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move toward the point that would center `focus` in a view of `view_size`
    pub fn follow(&mut self, focus: Vec2, view_size: Vec2) {
        let target = focus - view_size / 2.0;
        self.scroll += (target - self.scroll) / FOLLOW_DIVISOR;
    }

    /// Integer offset used for drawing, truncated toward zero
    pub fn render_offset(&self) -> (i32, i32) {
        (self.scroll.x as i32, self.scroll.y as i32)
    }
}

/// Decaying screen shake magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Screenshake {
    magnitude: f32,
}

impl Screenshake {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// One frame of decay, floored at zero
    pub fn decay(&mut self) {
        self.magnitude = (self.magnitude - 1.0).max(0.0);
    }

    /// Raise to at least `minimum`; never lowers the current value
    pub fn raise(&mut self, minimum: f32) {
        self.magnitude = self.magnitude.max(minimum);
    }

    /// Jitter for the presented frame, each axis in [-s/2, s/2)
    pub fn offset(&self, rng: &mut StdRng) -> Vec2 {
        let s = self.magnitude;
        Vec2::new(rng.gen::<f32>() * s - s / 2.0, rng.gen::<f32>() * s - s / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_follow_converges() {
        let mut camera = Camera::new();
        let view = Vec2::new(320.0, 240.0);
        let focus = Vec2::new(500.0, 300.0);

        camera.follow(focus, view);
        assert!((camera.scroll.x - 340.0 / 30.0).abs() < 1e-4);
        assert!((camera.scroll.y - 180.0 / 30.0).abs() < 1e-4);

        for _ in 0..1000 {
            camera.follow(focus, view);
        }
        assert!((camera.scroll - Vec2::new(340.0, 180.0)).length() < 0.01);
    }

    #[test]
    fn test_render_offset_truncates() {
        let camera = Camera { scroll: Vec2::new(10.9, -3.7) };
        assert_eq!(camera.render_offset(), (10, -3));
    }

    #[test]
    fn test_shake_offset_zero_when_still() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(Screenshake::new().offset(&mut rng), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_decay_never_increases(start in 0.0f32..100.0, frames in 0usize..200) {
            let mut shake = Screenshake::new();
            shake.raise(start);
            let mut last = shake.magnitude();
            for _ in 0..frames {
                shake.decay();
                prop_assert!(shake.magnitude() <= last);
                prop_assert!(shake.magnitude() >= 0.0);
                last = shake.magnitude();
            }
        }

        #[test]
        fn prop_raise_is_max(current in 0.0f32..50.0, minimum in 0.0f32..50.0) {
            let mut shake = Screenshake::new();
            shake.raise(current);
            shake.raise(minimum);
            prop_assert_eq!(shake.magnitude(), current.max(minimum));
        }

        #[test]
        fn prop_offset_within_half_magnitude(m in 0.0f32..64.0, seed in any::<u64>()) {
            let mut shake = Screenshake::new();
            shake.raise(m);
            let mut rng = StdRng::seed_from_u64(seed);
            let o = shake.offset(&mut rng);
            prop_assert!(o.x >= -m / 2.0 - 1e-4 && o.x <= m / 2.0 + 1e-4);
            prop_assert!(o.y >= -m / 2.0 - 1e-4 && o.y <= m / 2.0 + 1e-4);
        }
    }
}
