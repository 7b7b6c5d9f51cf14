//! Runtime configuration
//!
//! Read from `ninja-dash.ron` in the working directory. A missing file means
//! defaults; a file that exists but does not parse is an error. Every field
//! is optional, e.g.
//!
//! ```text
//! (
//!     fps: 60,
//!     seed: Some(1234),
//!     volumes: (music: 0.0),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::event::SoundCue;
use crate::rasterizer::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

pub const CONFIG_FILE: &str = "ninja-dash.ron";

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Playback volume per sound, 0.0 to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volumes {
    pub jump: f32,
    pub dash: f32,
    pub hit: f32,
    pub shoot: f32,
    pub music: f32,
}

impl Default for Volumes {
    fn default() -> Self {
        Self { jump: 0.7, dash: 0.3, hit: 0.8, shoot: 0.4, music: 0.15 }
    }
}

impl Volumes {
    pub fn for_cue(&self, cue: SoundCue) -> f32 {
        match cue {
            SoundCue::Jump => self.jump,
            SoundCue::Dash => self.dash,
            SoundCue::Hit => self.hit,
            SoundCue::Shoot => self.shoot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    /// Root of `images/`, `sfx/` and `music/`
    pub data_dir: PathBuf,
    /// Folder holding `0.ron`, `1.ron`, ...
    pub maps_dir: PathBuf,
    /// Frame rate cap, 0 disables the limiter
    pub fps: u32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    pub volumes: Volumes,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Ninja Dash".to_string(),
            window_width: DISPLAY_WIDTH as i32,
            window_height: DISPLAY_HEIGHT as i32,
            data_dir: PathBuf::from("data"),
            maps_dir: PathBuf::from("data/maps"),
            fps: 60,
            seed: None,
            volumes: Volumes::default(),
        }
    }
}

impl GameConfig {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        let v = &self.volumes;
        for (name, value) in [("jump", v.jump), ("dash", v.dash), ("hit", v.hit), ("shoot", v.shoot), ("music", v.music)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!("volume {} out of range: {}", name, value)));
            }
        }
        Ok(())
    }

    /// Seconds per frame for the limiter, if one is set
    pub fn frame_time(&self) -> Option<f64> {
        (self.fps > 0).then(|| 1.0 / self.fps as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = GameConfig::load_or_default(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.volumes.for_cue(SoundCue::Hit), 0.8);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(fps: 30, seed: Some(7), volumes: (music: 0.0))").unwrap();

        let config = GameConfig::load_or_default(&path).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.volumes.music, 0.0);
        assert_eq!(config.volumes.jump, 0.7);
        assert_eq!(config.window_width, 1280);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(fps: \"fast\")").unwrap();
        assert!(matches!(GameConfig::load_or_default(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_out_of_range_volume_rejected() {
        let err = GameConfig::parse("(volumes: (hit: 2.0))").unwrap_err();
        assert!(err.to_string().contains("hit"));
    }

    #[test]
    fn test_frame_time() {
        assert_eq!(GameConfig::default().frame_time(), Some(1.0 / 60.0));
        let unlimited = GameConfig { fps: 0, ..Default::default() };
        assert_eq!(unlimited.frame_time(), None);
    }
}
