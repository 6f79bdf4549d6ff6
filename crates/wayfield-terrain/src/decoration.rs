//! Seeded decoration decisions: safe zones and trees owned by a tile.
//!
//! Every draw comes from the tile-local RNG stream (see [`crate::seed`]), so a
//! tile decorates identically whenever it is regenerated.

use glam::{DVec2, DVec3};
use rand::Rng;
use wayfield_config::{Band, DecorationPolicyConfig};

use crate::error::TerrainError;
use crate::seed::tile_rng;
use crate::tile::TileCoord;

/// Height at which trees are planted, in world units.
pub const TREE_HEIGHT: f64 = 2.0;

/// An entity owned by a tile; released when the tile is dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoration {
    /// A safe-zone structure at the tile's anchor.
    SafeZone {
        /// World position.
        position: DVec3,
    },
    /// A tree somewhere on the tile.
    Tree {
        /// World position.
        position: DVec3,
        /// Uniform scale.
        scale: f64,
    },
}

impl Decoration {
    /// World position of the decoration.
    pub fn position(&self) -> DVec3 {
        match self {
            Decoration::SafeZone { position } | Decoration::Tree { position, .. } => *position,
        }
    }

    /// `true` for [`Decoration::SafeZone`].
    pub fn is_safe_zone(&self) -> bool {
        matches!(self, Decoration::SafeZone { .. })
    }
}

/// Closed interval `[min, max]` over an aggregate tile height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightRange {
    min: f64,
    max: f64,
}

impl HeightRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if either bound is
    /// non-finite or `min > max`.
    pub fn new(name: &'static str, min: f64, max: f64) -> Result<Self, TerrainError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(TerrainError::invalid(
                name,
                format!("expected finite min <= max, got [{min}, {max}]"),
            ));
        }
        Ok(Self { min, max })
    }

    fn from_band(name: &'static str, band: Band) -> Result<Self, TerrainError> {
        Self::new(name, band.min, band.max)
    }

    /// Inclusive test.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Value at fraction `t` of the way from `min` to `max`.
    fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }
}

/// The aggregate inputs to a decoration decision for one tile.
#[derive(Clone, Copy, Debug)]
pub struct TileSite {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Tile world position (X, Z).
    pub position: DVec2,
    /// Tile extent in world units (width, depth).
    pub extent: DVec2,
    /// Mean raw height.
    pub avg_height_raw: f64,
    /// Mean curved and scaled height.
    pub avg_height_scaled: f64,
}

/// Thresholds and probabilities for decorating one kind of tile.
///
/// Streamed tiles and level tiles each carry their own policy.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationPolicy {
    safe_zone_raw: HeightRange,
    safe_zone_scaled: HeightRange,
    safe_zone_chance: f64,
    tree_raw: HeightRange,
    tree_scaled: HeightRange,
    max_trees: u32,
    tree_scale: HeightRange,
}

impl DecorationPolicy {
    /// Builds a policy from its configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] for an inverted band or a
    /// chance outside `[0, 1]`.
    pub fn from_config(config: &DecorationPolicyConfig) -> Result<Self, TerrainError> {
        if !(0.0..=1.0).contains(&config.safe_zone_chance) {
            return Err(TerrainError::invalid(
                "safe_zone_chance",
                format!("must be within [0, 1], got {}", config.safe_zone_chance),
            ));
        }
        Ok(Self {
            safe_zone_raw: HeightRange::from_band("safe_zone_raw", config.safe_zone_raw)?,
            safe_zone_scaled: HeightRange::from_band("safe_zone_scaled", config.safe_zone_scaled)?,
            safe_zone_chance: config.safe_zone_chance,
            tree_raw: HeightRange::from_band("tree_raw", config.tree_raw)?,
            tree_scaled: HeightRange::from_band("tree_scaled", config.tree_scaled)?,
            max_trees: config.max_trees,
            tree_scale: HeightRange::from_band("tree_scale", config.tree_scale)?,
        })
    }

    /// A policy that never places anything.
    pub fn none() -> Self {
        let empty = HeightRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        Self {
            safe_zone_raw: empty,
            safe_zone_scaled: empty,
            safe_zone_chance: 0.0,
            tree_raw: empty,
            tree_scaled: empty,
            max_trees: 0,
            tree_scale: HeightRange { min: 1.0, max: 1.0 },
        }
    }

    /// Decide the decorations for a tile.
    ///
    /// A safe zone is tried first. Trees are only considered when no safe
    /// zone was placed, and draw from their own fresh stream of the same
    /// tile seed.
    pub fn decorate(&self, world_seed: u64, site: &TileSite) -> Vec<Decoration> {
        if let Some(safe_zone) = self.safe_zone(world_seed, site) {
            tracing::trace!(coord = ?site.coord, "safe zone placed");
            return vec![safe_zone];
        }
        let trees = self.trees(world_seed, site);
        if !trees.is_empty() {
            tracing::trace!(coord = ?site.coord, count = trees.len(), "trees placed");
        }
        trees
    }

    fn safe_zone(&self, world_seed: u64, site: &TileSite) -> Option<Decoration> {
        if !self.safe_zone_raw.contains(site.avg_height_raw)
            || !self.safe_zone_scaled.contains(site.avg_height_scaled)
        {
            return None;
        }
        let mut rng = tile_rng(world_seed, site.coord);
        if rng.random::<f64>() > self.safe_zone_chance {
            return None;
        }
        Some(Decoration::SafeZone {
            position: DVec3::new(site.position.x, site.avg_height_scaled, site.position.y),
        })
    }

    fn trees(&self, world_seed: u64, site: &TileSite) -> Vec<Decoration> {
        if self.max_trees == 0
            || !self.tree_raw.contains(site.avg_height_raw)
            || !self.tree_scaled.contains(site.avg_height_scaled)
        {
            return Vec::new();
        }
        let mut rng = tile_rng(world_seed, site.coord);
        let count = rng.random_range(0..self.max_trees);
        (0..count)
            .map(|_| {
                let dx = rng.random::<f64>() * site.extent.x - site.extent.x / 2.0;
                let dz = rng.random::<f64>() * site.extent.y - site.extent.y / 2.0;
                let scale = self.tree_scale.lerp(rng.random::<f64>());
                Decoration::Tree {
                    position: DVec3::new(site.position.x + dx, TREE_HEIGHT, site.position.y + dz),
                    scale,
                }
            })
            .collect()
    }
}
