//! Finite levels: a fixed rectangle of tiles plus the matching whole-level
//! sample window used for pathfinding.

use glam::DVec2;

use crate::error::TerrainError;
use crate::grid::HeightGrid;
use crate::noise_field::NoiseField;
use crate::tile::{Tile, TileCoord, TileGenerator, TileSize};

/// The footprint of a finite level: `width_tiles × depth_tiles` tiles
/// covering coordinates `[0, width_tiles) × [0, depth_tiles)`.
///
/// The whole-level sample grid lines up with the tiles, so cell `(x, z)`
/// has exactly the height of the tile sample at the same world point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelFootprint {
    width_tiles: u32,
    depth_tiles: u32,
    tile_size: TileSize,
}

impl LevelFootprint {
    /// Creates a footprint.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if either dimension is zero.
    pub fn new(
        width_tiles: u32,
        depth_tiles: u32,
        tile_size: TileSize,
    ) -> Result<Self, TerrainError> {
        if width_tiles == 0 || depth_tiles == 0 {
            return Err(TerrainError::invalid(
                "level_size",
                format!("dimensions must be positive, got {width_tiles}x{depth_tiles}"),
            ));
        }
        Ok(Self {
            width_tiles,
            depth_tiles,
            tile_size,
        })
    }

    /// Width in tiles.
    pub fn width_tiles(&self) -> u32 {
        self.width_tiles
    }

    /// Depth in tiles.
    pub fn depth_tiles(&self) -> u32 {
        self.depth_tiles
    }

    /// Tile dimensions.
    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Samples along X: `width_tiles * tile_width + 1`.
    pub fn sample_width(&self) -> usize {
        self.width_tiles as usize * self.tile_size.width() as usize + 1
    }

    /// Samples along Z: `depth_tiles * tile_depth + 1`.
    pub fn sample_depth(&self) -> usize {
        self.depth_tiles as usize * self.tile_size.depth() as usize + 1
    }

    /// Noise offset of the whole-level window: the negated world position
    /// of the far-corner tile.
    pub fn noise_offset(&self) -> DVec2 {
        -self.tile_size.world_position(TileCoord::new(
            self.width_tiles as i32 - 1,
            self.depth_tiles as i32 - 1,
        ))
    }

    /// World position (X, Z) of sample cell `(x, z)`.
    pub fn cell_world_position(&self, x: usize, z: usize) -> DVec2 {
        let offset = self.noise_offset();
        DVec2::new(-(x as f64 + offset.x), -(z as f64 + offset.y))
    }

    /// Every tile coordinate of the level, ordered by `x` then `z`.
    pub fn coords(&self) -> Vec<TileCoord> {
        (0..self.width_tiles as i32)
            .flat_map(|x| (0..self.depth_tiles as i32).map(move |z| TileCoord::new(x, z)))
            .collect()
    }

    /// Sample the whole level in one window.
    pub fn sample(&self, field: &NoiseField) -> HeightGrid {
        field.sample(self.sample_width(), self.sample_depth(), self.noise_offset())
    }
}

/// All tiles of a finite level.
#[derive(Debug)]
pub struct FiniteLevel {
    footprint: LevelFootprint,
    tiles: Vec<Tile>,
}

impl FiniteLevel {
    /// Generate every tile of `footprint` with `generator`, which should
    /// carry the level decoration policy.
    pub fn generate(generator: &TileGenerator, footprint: LevelFootprint, threads: usize) -> Self {
        let tiles = generator.generate_batch(&footprint.coords(), threads);
        let safe_zones = tiles.iter().filter(|tile| tile.has_safe_zone()).count();
        tracing::info!(
            width = footprint.width_tiles(),
            depth = footprint.depth_tiles(),
            safe_zones,
            "level generated"
        );
        Self { footprint, tiles }
    }

    /// The level footprint.
    pub fn footprint(&self) -> &LevelFootprint {
        &self.footprint
    }

    /// Tiles ordered by coordinate.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Looks up a tile.
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles
            .binary_search_by_key(&coord, Tile::coord)
            .ok()
            .map(|index| &self.tiles[index])
    }
}
