//! Tile world storage, collision queries and rendering

use std::collections::{BTreeMap, HashMap};

use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::rasterizer::{Framebuffer, Sprite};

pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Tile categories that appear in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    /// Spawn markers: variant 0 = player start, variant 1 = enemy
    Spawners,
}

impl TileKind {
    /// Kinds that have images; spawners are consumed at load and never drawn
    pub const DRAWN: [TileKind; 4] = [
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Decor,
        TileKind::LargeDecor,
    ];

    /// Tiles that block movement and projectiles
    pub fn is_physics(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Folder name under `images/tiles/`
    pub fn asset_dir(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Spawners => "spawners",
        }
    }
}

/// A tile snapped to the grid (position in cells)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: (i32, i32),
}

/// A decoration placed freely (position in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: (f32, f32),
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

/// Serialized form of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default)]
    pub tiles: Vec<GridTile>,
    #[serde(default)]
    pub offgrid: Vec<OffgridTile>,
}

impl Default for MapData {
    fn default() -> Self {
        Self { tile_size: DEFAULT_TILE_SIZE, tiles: Vec::new(), offgrid: Vec::new() }
    }
}

/// A tile returned by [`Tilemap::extract`], position in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMatch {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: Vec2,
}

/// Tile images by kind, indexed by variant
pub type TileSprites = HashMap<TileKind, Vec<Sprite>>;

/// The static world the actors move through
#[derive(Debug, Clone)]
pub struct Tilemap {
    tile_size: i32,
    grid: BTreeMap<(i32, i32), GridTile>,
    offgrid: Vec<OffgridTile>,
}

/// Cell offsets searched around an actor for collision candidates
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0), (0, 0), (-1, 1), (0, 1), (1, 1),
];

impl Tilemap {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1) as i32,
            grid: BTreeMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub fn from_data(data: &MapData) -> Self {
        let mut map = Self::new(data.tile_size);
        for tile in &data.tiles {
            map.grid.insert(tile.pos, *tile);
        }
        map.offgrid = data.offgrid.clone();
        map
    }

    pub fn insert(&mut self, tile: GridTile) {
        self.grid.insert(tile.pos, tile);
    }

    pub fn tile_count(&self) -> usize {
        self.grid.len() + self.offgrid.len()
    }

    /// Grid cell containing a pixel position (floor division)
    pub fn cell_at(&self, pos: Vec2) -> (i32, i32) {
        let ts = self.tile_size as f32;
        ((pos.x / ts).floor() as i32, (pos.y / ts).floor() as i32)
    }

    /// Is there a physics tile at this pixel position?
    pub fn solid_check(&self, pos: Vec2) -> bool {
        self.grid
            .get(&self.cell_at(pos))
            .is_some_and(|tile| tile.kind.is_physics())
    }

    /// Collect tiles matching any (kind, variant) pair
    ///
    /// With `keep == false` the matches are removed from the map, which is how
    /// spawn markers are consumed at level load.
    pub fn extract(&mut self, filters: &[(TileKind, usize)], keep: bool) -> Vec<TileMatch> {
        let wanted = |kind: TileKind, variant: usize| filters.contains(&(kind, variant));
        let mut matches = Vec::new();

        for tile in &self.offgrid {
            if wanted(tile.kind, tile.variant) {
                matches.push(TileMatch {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: Vec2::new(tile.pos.0, tile.pos.1),
                });
            }
        }
        if !keep {
            self.offgrid.retain(|tile| !wanted(tile.kind, tile.variant));
        }

        let ts = self.tile_size as f32;
        for tile in self.grid.values() {
            if wanted(tile.kind, tile.variant) {
                matches.push(TileMatch {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: Vec2::new(tile.pos.0 as f32 * ts, tile.pos.1 as f32 * ts),
                });
            }
        }
        if !keep {
            self.grid.retain(|_, tile| !wanted(tile.kind, tile.variant));
        }

        matches
    }

    /// Rects of physics tiles in the 3x3 cells around a pixel position
    pub fn physics_rects_around(&self, pos: Vec2) -> Vec<Rect> {
        let (cx, cy) = self.cell_at(pos);
        let ts = self.tile_size as f32;
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| self.grid.get(&(cx + dx, cy + dy)))
            .filter(|tile| tile.kind.is_physics())
            .map(|tile| Rect::new(tile.pos.0 as f32 * ts, tile.pos.1 as f32 * ts, ts, ts))
            .collect()
    }

    /// Draw off-grid decorations, then every grid tile inside the view
    pub fn render(&self, fb: &mut Framebuffer, sprites: &TileSprites, offset: (i32, i32)) {
        let sprite_for = |kind: TileKind, variant: usize| {
            sprites.get(&kind).and_then(|images| images.get(variant))
        };

        for tile in &self.offgrid {
            if let Some(sprite) = sprite_for(tile.kind, tile.variant) {
                let x = tile.pos.0 as i32 - offset.0;
                let y = tile.pos.1 as i32 - offset.1;
                fb.blit(sprite, x, y, false);
            }
        }

        let ts = self.tile_size;
        let x_range = offset.0.div_euclid(ts)..=(offset.0 + fb.width as i32).div_euclid(ts);
        let y_range = offset.1.div_euclid(ts)..=(offset.1 + fb.height as i32).div_euclid(ts);
        for x in x_range {
            for y in y_range.clone() {
                let Some(tile) = self.grid.get(&(x, y)) else { continue };
                if let Some(sprite) = sprite_for(tile.kind, tile.variant) {
                    fb.blit(sprite, x * ts - offset.0, y * ts - offset.1, false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_map() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in 0..5 {
            map.insert(GridTile { kind: TileKind::Grass, variant: 1, pos: (x, 3) });
        }
        map.insert(GridTile { kind: TileKind::Decor, variant: 0, pos: (2, 2) });
        map
    }

    #[test]
    fn test_solid_check_physics_tiles_only() {
        let map = floor_map();
        assert!(map.solid_check(Vec2::new(8.0, 50.0)));
        // Decor never blocks
        assert!(!map.solid_check(Vec2::new(40.0, 40.0)));
        assert!(!map.solid_check(Vec2::new(8.0, 47.9)));
    }

    #[test]
    fn test_solid_check_floors_negative_coordinates() {
        let mut map = Tilemap::new(16);
        map.insert(GridTile { kind: TileKind::Stone, variant: 0, pos: (-1, -1) });
        assert!(map.solid_check(Vec2::new(-0.5, -0.5)));
        assert!(!map.solid_check(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_extract_keep_leaves_tiles() {
        let mut map = Tilemap::from_data(&MapData {
            tile_size: 16,
            tiles: vec![],
            offgrid: vec![OffgridTile { kind: TileKind::LargeDecor, variant: 2, pos: (40.0, 8.0) }],
        });
        let trees = map.extract(&[(TileKind::LargeDecor, 2)], true);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].pos, Vec2::new(40.0, 8.0));
        assert_eq!(map.tile_count(), 1);
    }

    #[test]
    fn test_extract_removes_spawners() {
        let mut map = floor_map();
        map.insert(GridTile { kind: TileKind::Spawners, variant: 0, pos: (1, 1) });
        map.insert(GridTile { kind: TileKind::Spawners, variant: 1, pos: (4, 2) });
        let before = map.tile_count();

        let spawners = map.extract(&[(TileKind::Spawners, 0), (TileKind::Spawners, 1)], false);
        assert_eq!(spawners.len(), 2);
        assert!(spawners.iter().any(|s| s.variant == 0 && s.pos == Vec2::new(16.0, 16.0)));
        assert!(spawners.iter().any(|s| s.variant == 1 && s.pos == Vec2::new(64.0, 32.0)));
        assert_eq!(map.tile_count(), before - 2);
        assert!(map.extract(&[(TileKind::Spawners, 0)], true).is_empty());
    }

    #[test]
    fn test_physics_rects_around() {
        let map = floor_map();
        let rects = map.physics_rects_around(Vec2::new(20.0, 40.0));
        // Cell (1, 2): neighbours (0..=2, 3) are grass
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|r| r.y == 48.0 && r.w == 16.0));
    }

    #[test]
    fn test_render_draws_visible_tiles() {
        let map = floor_map();
        let mut sprites = TileSprites::new();
        sprites.insert(
            TileKind::Grass,
            vec![Sprite::filled(16, 16, crate::rasterizer::Color::WHITE); 2],
        );
        let mut fb = Framebuffer::new(64, 64);
        map.render(&mut fb, &sprites, (0, 0));
        // Four grass tiles fit in the 64px wide view, decor has no sprite
        assert_eq!(fb.coverage(), 4 * 16 * 16);

        let mut fb = Framebuffer::new(64, 64);
        map.render(&mut fb, &sprites, (0, 100));
        assert_eq!(fb.coverage(), 0);
    }

    #[test]
    fn test_map_data_parses_from_ron() {
        let text = r#"(
            tiles: [(kind: stone, variant: 0, pos: (0, 0))],
            offgrid: [(kind: large_decor, variant: 2, pos: (4.0, 4.0))],
        )"#;
        let data: MapData = ron::from_str(text).unwrap();
        assert_eq!(data.tile_size, 16);
        assert_eq!(data.tiles[0].kind, TileKind::Stone);
        assert_eq!(data.offgrid[0].kind, TileKind::LargeDecor);
    }
}
