//! Frame composition
//!
//! Two low-res layers are drawn on the CPU every frame:
//! - `backdrop`: opaque, holds the background, clouds and the outline glow
//! - `world`: transparent, holds tiles, actors, effects, HUD and the
//!   transition mask
//!
//! The world layer is composited over the backdrop, the result is uploaded
//! as a texture and stretched to the window at the shake offset.

use macroquad::prelude::*;

use super::effects::ParticleKind;
use super::session::Session;
use crate::asset::Assets;
use crate::rasterizer::{font, Color as Rgba, Framebuffer, HEIGHT, WIDTH};

/// Fill of the outline drawn around everything in the world layer
pub const SILHOUETTE: Rgba = Rgba::with_alpha(0, 0, 0, 180);
const SILHOUETTE_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// Pixels of mask radius per transition step
const TRANSITION_SCALE: i32 = 8;

pub struct SceneLayers {
    pub world: Framebuffer,
    pub backdrop: Framebuffer,
}

impl SceneLayers {
    pub fn new() -> Self {
        Self {
            world: Framebuffer::new(WIDTH, HEIGHT),
            backdrop: Framebuffer::new(WIDTH, HEIGHT),
        }
    }
}

impl Default for SceneLayers {
    fn default() -> Self {
        Self::new()
    }
}

/// Radius of the visible circle for a transition value
pub fn transition_radius(transition: i32) -> i32 {
    (30 - transition.abs()) * TRANSITION_SCALE
}

/// Draw the whole session into `layers.backdrop`
pub fn compose_frame(layers: &mut SceneLayers, session: &Session, assets: &Assets) {
    let offset = session.camera().render_offset();
    let SceneLayers { world, backdrop } = layers;

    world.clear_transparent();
    backdrop.clear(Rgba::BLACK);
    backdrop.blit(&assets.background, 0, 0, false);
    session.clouds().render(backdrop, &assets.clouds, offset);

    session.tilemap().render(world, &assets.tiles, offset);

    font::draw_text(world, &format!("Score: {}", session.score()), 10, 10, Rgba::WHITE);
    font::draw_text(world, &format!("Level: {}", session.level() + 1), 230, 10, Rgba::WHITE);

    for enemy in session.enemies() {
        enemy.render(world, &assets.enemy, &assets.gun, offset);
    }

    if session.dead() == 0 {
        session.player().render(world, &assets.player, offset);
    }

    let bullet = &assets.projectile;
    for p in session.projectiles() {
        let x = p.pos.x - bullet.width as f32 / 2.0 - offset.0 as f32;
        let y = p.pos.y - bullet.height as f32 / 2.0 - offset.1 as f32;
        world.blit(bullet, x as i32, y as i32, false);
    }

    for spark in session.sparks() {
        spark.render(world, offset);
    }

    let outline = world.silhouette(SILHOUETTE);
    for (dx, dy) in SILHOUETTE_OFFSETS {
        backdrop.composite(&outline, dx, dy);
    }

    for particle in session.particles() {
        let images = match particle.kind {
            ParticleKind::Leaf => &assets.leaf,
            ParticleKind::Dust => &assets.dust,
        };
        particle.render(world, images, offset);
    }

    if session.transition() != 0 {
        let (cx, cy) = (WIDTH as i32 / 2, HEIGHT as i32 / 2);
        world.mask_outside_circle(cx, cy, transition_radius(session.transition()), Rgba::BLACK);
    }

    backdrop.composite(world, 0, 0);
}

/// Darken the frame and label it while the game is paused
pub fn draw_pause_overlay(fb: &mut Framebuffer) {
    fb.draw_filled_rect(0, 0, fb.width as i32 - 1, fb.height as i32 - 1, Rgba::with_alpha(0, 0, 0, 140));
    let label = "PAUSED";
    let x = (fb.width as i32 - font::text_width(label)) / 2;
    let y = (fb.height as i32 - font::GLYPH_HEIGHT) / 2;
    font::draw_text(fb, label, x, y, Rgba::WHITE);
}

/// Upload a low-res frame and stretch it over the window
pub fn present(fb: &Framebuffer, shake: Vec2) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);
    draw_texture_ex(
        &texture,
        shake.x,
        shake.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}
