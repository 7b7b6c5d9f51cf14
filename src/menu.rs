//! Title screen
//!
//! Background and drifting clouds go through the low-res buffer like the
//! game; logo and buttons are drawn at window resolution. Layout is given in
//! a 1280x720 reference space and scaled to the actual window.

use macroquad::prelude::*;
use ::rand::rngs::StdRng;

use crate::asset::Assets;
use crate::game::clouds::{Clouds, CLOUD_COUNT};
use crate::game::renderer;
use crate::rasterizer::{Color as Rgba, Framebuffer, Sprite, HEIGHT, WIDTH};

pub const REFERENCE_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
pub const LOGO_CENTER: Vec2 = Vec2::new(640.0, 180.0);
pub const BUTTON_SIZE: Vec2 = Vec2::new(300.0, 100.0);
const LABEL_SIZE: u16 = 100;
const LABEL_COLOR: Color = WHITE;
const LABEL_HOVER_COLOR: Color = Color::new(215.0 / 255.0, 252.0 / 255.0, 212.0 / 255.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub label: &'static str,
    pub center: Vec2,
    pub choice: MenuChoice,
}

impl Button {
    /// Bounds in reference space
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.center.x - BUTTON_SIZE.x / 2.0,
            self.center.y - BUTTON_SIZE.y / 2.0,
            BUTTON_SIZE.x,
            BUTTON_SIZE.y,
        )
    }

    pub fn hovered(&self, mouse: Vec2) -> bool {
        self.rect().contains(mouse)
    }
}

pub const BUTTONS: [Button; 2] = [
    Button { label: "PLAY", center: Vec2::new(640.0, 440.0), choice: MenuChoice::Play },
    Button { label: "QUIT", center: Vec2::new(640.0, 600.0), choice: MenuChoice::Quit },
];

/// Which button, if any, a click at `mouse` (reference space) lands on
pub fn hit_test(mouse: Vec2) -> Option<MenuChoice> {
    BUTTONS.iter().find(|b| b.hovered(mouse)).map(|b| b.choice)
}

/// Map a window-space point into reference space
pub fn to_reference(point: Vec2, window: Vec2) -> Vec2 {
    point * REFERENCE_SIZE / window
}

fn upload(sprite: &Sprite) -> Texture2D {
    let texture = Texture2D::from_rgba8(sprite.width as u16, sprite.height as u16, &sprite.pixels);
    texture.set_filter(FilterMode::Nearest);
    texture
}

pub struct Menu {
    clouds: Clouds,
    scroll: (i32, i32),
    layer: Framebuffer,
    logo: Texture2D,
    button: Texture2D,
}

impl Menu {
    pub fn new(assets: &Assets, rng: &mut StdRng) -> Self {
        Self {
            clouds: Clouds::new(rng, assets.clouds.len(), CLOUD_COUNT),
            scroll: (0, 0),
            layer: Framebuffer::new(WIDTH, HEIGHT),
            logo: upload(&assets.logo),
            button: upload(&assets.button.scaled(BUTTON_SIZE.x as usize, BUTTON_SIZE.y as usize)),
        }
    }

    /// Draw one menu frame and report a clicked button
    pub fn frame(&mut self, assets: &Assets) -> Option<MenuChoice> {
        self.clouds.update();

        self.layer.clear(Rgba::BLACK);
        self.layer.blit(&assets.background, 0, 0, false);
        self.clouds.render(&mut self.layer, &assets.clouds, self.scroll);
        renderer::present(&self.layer, Vec2::ZERO);

        let window = vec2(screen_width(), screen_height());
        let scale = window / REFERENCE_SIZE;
        let mouse = to_reference(Vec2::from(mouse_position()), window);

        let logo_size = self.logo.size() * scale;
        draw_texture_ex(
            &self.logo,
            LOGO_CENTER.x * scale.x - logo_size.x / 2.0,
            LOGO_CENTER.y * scale.y - logo_size.y / 2.0,
            WHITE,
            DrawTextureParams { dest_size: Some(logo_size), ..Default::default() },
        );

        for button in &BUTTONS {
            let r = button.rect();
            draw_texture_ex(
                &self.button,
                r.x * scale.x,
                r.y * scale.y,
                WHITE,
                DrawTextureParams { dest_size: Some(BUTTON_SIZE * scale), ..Default::default() },
            );

            let font_size = (LABEL_SIZE as f32 * scale.y).max(1.0) as u16;
            let dims = measure_text(button.label, None, font_size, 1.0);
            let color = if button.hovered(mouse) { LABEL_HOVER_COLOR } else { LABEL_COLOR };
            draw_text(
                button.label,
                button.center.x * scale.x - dims.width / 2.0,
                button.center.y * scale.y + dims.offset_y / 2.0,
                font_size as f32,
                color,
            );
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            hit_test(mouse)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_layout() {
        let play = BUTTONS[0].rect();
        assert_eq!((play.x, play.y, play.w, play.h), (490.0, 390.0, 300.0, 100.0));
        assert!(!play.overlaps(&BUTTONS[1].rect()));
    }

    #[test]
    fn test_hit_test() {
        assert_eq!(hit_test(vec2(640.0, 440.0)), Some(MenuChoice::Play));
        assert_eq!(hit_test(vec2(500.0, 640.0)), Some(MenuChoice::Quit));
        assert_eq!(hit_test(vec2(640.0, 520.0)), None);
        assert_eq!(hit_test(vec2(100.0, 440.0)), None);
    }

    #[test]
    fn test_to_reference_scales_with_window() {
        let half = vec2(640.0, 360.0);
        assert_eq!(to_reference(vec2(320.0, 220.0), half), vec2(640.0, 440.0));
        assert_eq!(to_reference(vec2(10.0, 10.0), REFERENCE_SIZE), vec2(10.0, 10.0));
    }
}
