//! Configuration system for Wayfield.
//!
//! Provides the level, noise, streaming, decoration and pathfinding settings
//! that persist to disk as RON files. Supports CLI overrides via clap,
//! hot-reload detection, range validation, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;
mod seed;

pub use cli::CliArgs;
pub use config::{
    Band, Config, DebugConfig, DecorationConfig, DecorationPolicyConfig, LevelConfig, NoiseConfig,
    PathConfig, StreamingConfig, TerrainConfig, TerrainTypeConfig,
};
pub use error::ConfigError;
pub use seed::parse_seed;

/// Default configuration directory (`<platform config dir>/wayfield`).
///
/// Falls back to `./wayfield` when the platform has no config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("wayfield"))
        .unwrap_or_else(|| std::path::PathBuf::from("wayfield"))
}
