//! Level file loading and validation
//!
//! Levels live in a maps directory as `0.ron`, `1.ron`, ... and are indexed
//! contiguously from zero. The first missing index ends the set.

use std::fs;
use std::path::Path;

use super::tilemap::{MapData, TileKind};

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
    /// No `0.ron` in the maps directory
    NoLevels(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
            LevelError::NoLevels(dir) => write!(f, "no levels found in {}", dir),
        }
    }
}

impl std::error::Error for LevelError {}

/// Check that a parsed map can actually be played
pub fn validate_map(map: &MapData) -> Result<(), LevelError> {
    if map.tile_size == 0 {
        return Err(LevelError::ValidationError("tile_size must be positive".into()));
    }

    let player_spawns = map
        .tiles
        .iter()
        .filter(|t| t.kind == TileKind::Spawners && t.variant == 0)
        .count()
        + map
            .offgrid
            .iter()
            .filter(|t| t.kind == TileKind::Spawners && t.variant == 0)
            .count();
    if player_spawns == 0 {
        return Err(LevelError::ValidationError("map has no player spawner".into()));
    }

    for tile in &map.offgrid {
        if !tile.pos.0.is_finite() || !tile.pos.1.is_finite() {
            return Err(LevelError::ValidationError(format!(
                "off-grid {:?} tile has a non-finite position",
                tile.kind
            )));
        }
    }

    Ok(())
}

/// Parse and validate a map from RON text
pub fn parse_map(s: &str) -> Result<MapData, LevelError> {
    let map: MapData = ron::from_str(s)?;
    validate_map(&map)?;
    Ok(map)
}

/// Load a map from a RON file
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapData, LevelError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_map(&contents).map_err(|e| match e {
        LevelError::ValidationError(msg) => {
            LevelError::ValidationError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// All playable levels, loaded once at startup
#[derive(Debug, Clone)]
pub struct LevelSet {
    maps: Vec<MapData>,
}

impl LevelSet {
    /// Load `0.ron`, `1.ron`, ... until the first missing index
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LevelError> {
        let dir = dir.as_ref();
        let mut maps = Vec::new();
        loop {
            let path = dir.join(format!("{}.ron", maps.len()));
            if !path.is_file() {
                break;
            }
            maps.push(load_map(&path)?);
        }

        if maps.is_empty() {
            return Err(LevelError::NoLevels(dir.display().to_string()));
        }
        log::info!("loaded {} levels from {}", maps.len(), dir.display());
        Self::from_maps(maps)
    }

    /// Build a set from maps already in memory
    pub fn from_maps(maps: Vec<MapData>) -> Result<Self, LevelError> {
        if maps.is_empty() {
            return Err(LevelError::NoLevels("<memory>".into()));
        }
        for map in &maps {
            validate_map(map)?;
        }
        Ok(Self { maps })
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn get(&self, index: usize) -> Option<&MapData> {
        self.maps.get(index)
    }
}
