//! Tiles: fixed-size patches of terrain keyed by an integer grid coordinate.
//!
//! A tile's content is a pure function of its coordinate, the world seed and
//! the generator's parameters. Neighbouring tiles share their edge samples,
//! so independently generated tiles meet without seams.

use std::sync::Arc;

use glam::DVec2;

use crate::decoration::{Decoration, DecorationPolicy, TileSite};
use crate::error::TerrainError;
use crate::grid::HeightGrid;
use crate::noise_field::NoiseField;
use crate::seed::derive_tile_seed;
use crate::shape::TerrainShape;

/// Integer grid coordinate of a tile.
///
/// Ordered by `x`, then `z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column along world X.
    pub x: i32,
    /// Row along world Z.
    pub z: i32,
}

impl TileCoord {
    /// Creates a coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Tile dimensions in world units. Both are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSize {
    width: u32,
    depth: u32,
}

impl TileSize {
    /// Creates a tile size.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if either dimension is zero.
    pub fn new(width: u32, depth: u32) -> Result<Self, TerrainError> {
        if width == 0 || depth == 0 {
            return Err(TerrainError::invalid(
                "tile_size",
                format!("dimensions must be positive, got {width}x{depth}"),
            ));
        }
        Ok(Self { width, depth })
    }

    /// Width along X.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Depth along Z.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// `(width, depth)` as floats.
    pub fn extent(&self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.depth))
    }

    /// World position of the tile at `coord`: `(x * width, z * depth)`.
    pub fn world_position(&self, coord: TileCoord) -> DVec2 {
        DVec2::new(
            f64::from(coord.x) * f64::from(self.width),
            f64::from(coord.z) * f64::from(self.depth),
        )
    }
}

/// A generated tile and the decorations it owns.
///
/// Dropping a tile drops its decorations with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    coord: TileCoord,
    position: DVec2,
    heights: HeightGrid,
    avg_height_raw: f64,
    avg_height_scaled: f64,
    seed: u64,
    decorations: Vec<Decoration>,
}

impl Tile {
    /// Grid coordinate.
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// World position (X, Z) of the tile anchor.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// The `(width + 1) × (depth + 1)` normalized height samples.
    ///
    /// Sample `(x, z)` sits at world `(position.x - x, position.y - z)`.
    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    /// Mean of the raw samples.
    pub fn avg_height_raw(&self) -> f64 {
        self.avg_height_raw
    }

    /// Mean of the curved and scaled samples.
    pub fn avg_height_scaled(&self) -> f64 {
        self.avg_height_scaled
    }

    /// Tile-local decoration seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Entities owned by this tile.
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// `true` if this tile hosts a safe zone.
    pub fn has_safe_zone(&self) -> bool {
        self.decorations.iter().any(Decoration::is_safe_zone)
    }
}

/// Builds tiles from a shared noise field.
///
/// Cheap to clone; the noise field is shared.
#[derive(Clone, Debug)]
pub struct TileGenerator {
    field: Arc<NoiseField>,
    shape: TerrainShape,
    size: TileSize,
    policy: DecorationPolicy,
}

impl TileGenerator {
    /// Creates a generator.
    pub fn new(
        field: Arc<NoiseField>,
        shape: TerrainShape,
        size: TileSize,
        policy: DecorationPolicy,
    ) -> Self {
        Self {
            field,
            shape,
            size,
            policy,
        }
    }

    /// The same generator with a different decoration policy.
    pub fn with_policy(&self, policy: DecorationPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    /// The shared noise field.
    pub fn field(&self) -> &Arc<NoiseField> {
        &self.field
    }

    /// Height curve and scale.
    pub fn shape(&self) -> &TerrainShape {
        &self.shape
    }

    /// Tile dimensions.
    pub fn size(&self) -> TileSize {
        self.size
    }

    /// Generate the tile at `coord`.
    pub fn generate(&self, coord: TileCoord) -> Tile {
        let position = self.size.world_position(coord);
        let heights = self.field.sample(
            self.size.width as usize + 1,
            self.size.depth as usize + 1,
            -position,
        );
        let avg_height_raw = heights.mean();
        let avg_height_scaled = heights.mean_by(|h| self.shape.world_height(h));

        let world_seed = self.field.params().seed;
        let site = TileSite {
            coord,
            position,
            extent: self.size.extent(),
            avg_height_raw,
            avg_height_scaled,
        };
        let decorations = self.policy.decorate(world_seed, &site);
        tracing::trace!(%coord, avg_height_raw, decorations = decorations.len(), "tile generated");

        Tile {
            coord,
            position,
            heights,
            avg_height_raw,
            avg_height_scaled,
            seed: derive_tile_seed(world_seed, coord),
            decorations,
        }
    }
}
