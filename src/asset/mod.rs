//! Image assets
//!
//! Everything is decoded once at startup from the data directory:
//!
//! ```text
//! data/images/
//! ├── background.png, Ninja_Dash_logo.png, button_ninja.png
//! ├── gun.png, projectile.png
//! ├── clouds/                    # any number of cloud images
//! ├── tiles/{grass,stone,decor,large_decor}/
//! ├── entities/player/{idle,run,jump,slide,wall_slide}/
//! ├── entities/enemy/{idle,run}/
//! └── particles/{leaf,particle}/
//! ```
//!
//! Folders are loaded in file-name order, so `0.png, 1.png, ...` map to
//! variants and animation frames.

use std::path::{Path, PathBuf};

use crate::game::effects::ParticleKind;
use crate::game::entity::{Action, ActorSprites};
use crate::rasterizer::Sprite;
use crate::world::{TileKind, TileSprites};

#[derive(Debug)]
pub enum AssetError {
    /// File I/O error
    Io(String),
    /// Image could not be decoded
    Decode(String),
    /// A required folder has no images
    Missing(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io(msg) => write!(f, "I/O error: {}", msg),
            AssetError::Decode(msg) => write!(f, "Decode error: {}", msg),
            AssetError::Missing(msg) => write!(f, "Missing asset: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e.to_string())
    }
}

/// Load a single image
pub fn load_image(path: &Path) -> Result<Sprite, AssetError> {
    Sprite::from_file(path).map_err(AssetError::Decode)
}

/// Load every PNG in a folder, sorted by file name
pub fn load_images(dir: &Path) -> Result<Vec<Sprite>, AssetError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| AssetError::Io(format!("{}: {}", dir.display(), e)))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_ascii_lowercase() == "png")
                .unwrap_or(false)
        })
        .collect();

    // Sort by filename for consistent ordering
    entries.sort();

    if entries.is_empty() {
        return Err(AssetError::Missing(format!("no images in {}", dir.display())));
    }
    entries.iter().map(|p| load_image(p)).collect()
}

fn load_actor(dir: &Path, actions: &[Action]) -> Result<ActorSprites, AssetError> {
    let mut sprites = ActorSprites::new();
    for &action in actions {
        sprites.insert(action, load_images(&dir.join(action.asset_dir()))?);
    }
    Ok(sprites)
}

/// All images used by the menu and the game
pub struct Assets {
    pub background: Sprite,
    pub logo: Sprite,
    pub button: Sprite,
    pub clouds: Vec<Sprite>,
    pub tiles: TileSprites,
    pub player: ActorSprites,
    pub enemy: ActorSprites,
    pub leaf: Vec<Sprite>,
    pub dust: Vec<Sprite>,
    pub gun: Sprite,
    pub projectile: Sprite,
}

impl Assets {
    /// Load from `<data_dir>/images`
    pub fn load(data_dir: &Path) -> Result<Self, AssetError> {
        let root = data_dir.join("images");

        let mut tiles = TileSprites::new();
        for kind in TileKind::DRAWN {
            tiles.insert(kind, load_images(&root.join("tiles").join(kind.asset_dir()))?);
        }

        let entities = root.join("entities");
        let assets = Self {
            background: load_image(&root.join("background.png"))?,
            logo: load_image(&root.join("Ninja_Dash_logo.png"))?,
            button: load_image(&root.join("button_ninja.png"))?,
            clouds: load_images(&root.join("clouds"))?,
            tiles,
            player: load_actor(&entities.join("player"), &Action::ALL)?,
            enemy: load_actor(&entities.join("enemy"), &[Action::Idle, Action::Run])?,
            leaf: load_images(&root.join("particles").join("leaf"))?,
            dust: load_images(&root.join("particles").join("particle"))?,
            gun: load_image(&root.join("gun.png"))?,
            projectile: load_image(&root.join("projectile.png"))?,
        };

        check_frame_count("particles/leaf", assets.leaf.len(), ParticleKind::LEAF_FRAMES);
        check_frame_count("particles/particle", assets.dust.len(), ParticleKind::DUST_FRAMES);
        log::info!("loaded images from {}", root.display());
        Ok(assets)
    }

    /// Solid-colour stand-ins with the same layout as real assets
    #[cfg(test)]
    pub fn placeholder() -> Self {
        use crate::rasterizer::{Color, HEIGHT, WIDTH};

        let square = |n: usize, c: Color| Sprite::filled(n, n, c);
        let actor = |actions: &[Action]| -> ActorSprites {
            actions
                .iter()
                .map(|&a| (a, vec![Sprite::filled(14, 18, Color::new(200, 60, 60)); 2]))
                .collect()
        };
        let tiles = TileKind::DRAWN
            .iter()
            .map(|&k| (k, vec![square(16, Color::new(60, 160, 60)); 3]))
            .collect();

        Self {
            background: Sprite::filled(WIDTH, HEIGHT, Color::new(40, 80, 140)),
            logo: Sprite::filled(64, 32, Color::WHITE),
            button: Sprite::filled(30, 10, Color::new(90, 90, 90)),
            clouds: vec![Sprite::filled(24, 12, Color::new(230, 230, 240))],
            tiles,
            player: actor(&Action::ALL),
            enemy: actor(&[Action::Idle, Action::Run]),
            leaf: vec![square(3, Color::new(40, 200, 40)); ParticleKind::LEAF_FRAMES as usize],
            dust: vec![square(2, Color::WHITE); ParticleKind::DUST_FRAMES as usize],
            gun: Sprite::filled(6, 3, Color::new(120, 120, 120)),
            projectile: square(2, Color::WHITE),
        }
    }
}

fn check_frame_count(folder: &str, found: usize, expected: u32) {
    if found != expected as usize {
        log::warn!("{} has {} images, animation expects {}", folder, found, expected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_png(path: &Path, color: [u8; 4]) {
        RgbaImage::from_pixel(2, 2, Rgba(color)).save(path).unwrap();
    }

    #[test]
    fn test_load_images_sorted_and_png_only() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("1.png"), [0, 255, 0, 255]);
        write_png(&dir.path().join("0.png"), [255, 0, 0, 255]);
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let images = load_images(dir.path()).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].get(0, 0), Color::new(255, 0, 0));
        assert_eq!(images[1].get(0, 0), Color::new(0, 255, 0));
    }

    #[test]
    fn test_black_is_colour_keyed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.png");
        write_png(&path, [0, 0, 0, 255]);
        assert!(load_image(&path).unwrap().get(1, 1).is_transparent());
    }

    #[test]
    fn test_empty_folder_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(load_images(dir.path()), Err(AssetError::Missing(_))));
        assert!(matches!(load_images(&dir.path().join("nope")), Err(AssetError::Io(_))));
    }

    #[test]
    fn test_missing_data_dir_fails_to_load() {
        let dir = tempdir().unwrap();
        assert!(Assets::load(dir.path()).is_err());
    }
}
