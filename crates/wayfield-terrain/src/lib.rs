//! Procedural terrain: multi-octave noise, height classification, tile
//! streaming around a moving focal point, and finite levels.

mod cache;
mod classify;
mod decoration;
mod error;
mod generation;
mod grid;
mod level;
mod noise_field;
mod settings;
mod shape;
mod tile;
mod window;

pub mod seed;

pub use cache::{CacheStats, RefreshStrategy, TileCache, WindowUpdate};
pub use classify::{BandId, HeightClassifier, TerrainBand, WalkableBand};
pub use decoration::{Decoration, DecorationPolicy, HeightRange, TREE_HEIGHT, TileSite};
pub use error::TerrainError;
pub use generation::worker_count;
pub use grid::HeightGrid;
pub use level::{FiniteLevel, LevelFootprint};
pub use noise_field::{NoiseField, NoiseParams, OCTAVE_OFFSET_RANGE, OctaveOffsets};
pub use settings::TerrainSettings;
pub use shape::{HeightCurve, KeyframeCurve, LinearCurve, TerrainShape};
pub use tile::{Tile, TileCoord, TileGenerator, TileSize};
pub use window::TileWindow;
