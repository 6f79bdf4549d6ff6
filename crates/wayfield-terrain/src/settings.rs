//! Building terrain components from a loaded [`Config`].
//!
//! Configuration is read once here and passed down explicitly; nothing in
//! the crate looks settings up globally.

use std::sync::Arc;

use wayfield_config::{Config, NoiseConfig, PathConfig, TerrainConfig};

use crate::cache::{RefreshStrategy, TileCache};
use crate::classify::{HeightClassifier, TerrainBand, WalkableBand};
use crate::decoration::DecorationPolicy;
use crate::error::TerrainError;
use crate::level::{FiniteLevel, LevelFootprint};
use crate::noise_field::{NoiseField, NoiseParams};
use crate::shape::{KeyframeCurve, TerrainShape};
use crate::tile::{TileGenerator, TileSize};

impl From<&NoiseConfig> for NoiseParams {
    fn from(config: &NoiseConfig) -> Self {
        Self {
            seed: config.seed,
            scale: config.scale,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
        }
    }
}

impl TerrainShape {
    /// Keyframe curve and height scale from the terrain section.
    pub fn from_config(config: &TerrainConfig) -> Result<Self, TerrainError> {
        let curve = KeyframeCurve::new(config.height_curve.clone())?;
        Self::new(Arc::new(curve), config.height_scale)
    }
}

impl HeightClassifier {
    /// Cosmetic bands from the terrain section.
    pub fn from_config(config: &TerrainConfig) -> Result<Self, TerrainError> {
        Self::new(
            config
                .terrain_types
                .iter()
                .map(|t| TerrainBand::new(t.height, t.name.clone()))
                .collect(),
        )
    }
}

impl WalkableBand {
    /// Walkable band from the path section.
    pub fn from_config(config: &PathConfig) -> Result<Self, TerrainError> {
        Self::new(config.min_walkable, config.max_walkable)
    }
}

/// Everything needed to stream tiles and build a level, derived from one
/// [`Config`].
#[derive(Clone, Debug)]
pub struct TerrainSettings {
    /// Streaming tile generator (streaming decoration policy).
    pub streaming: TileGenerator,
    /// Level tile generator (level decoration policy).
    pub level: TileGenerator,
    /// Cosmetic terrain bands.
    pub classifier: HeightClassifier,
    /// Walkable height band for pathfinding.
    pub walkable: WalkableBand,
    /// Finite level footprint.
    pub footprint: LevelFootprint,
    /// Live window half-extent in tiles.
    pub render_distance: u32,
    /// Refresh strategy for the tile cache.
    pub strategy: RefreshStrategy,
    /// Tile generation workers (0 = one per CPU).
    pub worker_threads: usize,
}

impl TerrainSettings {
    /// Validate `config` and build the terrain components.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] for any value the noise,
    /// tile or classification math cannot use.
    pub fn from_config(config: &Config) -> Result<Self, TerrainError> {
        let field = Arc::new(NoiseField::new(NoiseParams::from(&config.noise))?);
        let shape = TerrainShape::from_config(&config.terrain)?;
        let size = TileSize::new(config.streaming.tile_width, config.streaming.tile_depth)?;

        let streaming = TileGenerator::new(
            field,
            shape,
            size,
            DecorationPolicy::from_config(&config.decoration.streaming)?,
        );
        let level = streaming.with_policy(DecorationPolicy::from_config(&config.decoration.level)?);

        let strategy = if config.streaming.incremental {
            RefreshStrategy::Incremental
        } else {
            RefreshStrategy::FullReplace
        };

        Ok(Self {
            streaming,
            level,
            classifier: HeightClassifier::from_config(&config.terrain)?,
            walkable: WalkableBand::from_config(&config.path)?,
            footprint: LevelFootprint::new(
                config.level.width_tiles,
                config.level.depth_tiles,
                size,
            )?,
            render_distance: config.streaming.render_distance,
            strategy,
            worker_threads: config.streaming.worker_threads,
        })
    }

    /// The shared noise field.
    pub fn field(&self) -> &NoiseField {
        self.streaming.field()
    }

    /// A fresh, empty tile cache.
    pub fn tile_cache(&self) -> TileCache {
        TileCache::new(self.streaming.clone(), self.render_distance, self.strategy)
            .with_worker_threads(self.worker_threads)
    }

    /// Generate every tile of the finite level.
    pub fn finite_level(&self) -> FiniteLevel {
        FiniteLevel::generate(&self.level, self.footprint, self.worker_threads)
    }
}
