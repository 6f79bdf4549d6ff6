//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level Wayfield configuration.
///
/// Noise and level settings are fixed for the lifetime of a level; a running
/// tile cache or path search never observes a change to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Noise field settings.
    pub noise: NoiseConfig,
    /// Height shaping and cosmetic terrain bands.
    pub terrain: TerrainConfig,
    /// Tile streaming settings.
    pub streaming: StreamingConfig,
    /// Finite level footprint.
    pub level: LevelConfig,
    /// Pathfinding settings.
    pub path: PathConfig,
    /// Decoration policies.
    pub decoration: DecorationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Multi-octave noise settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// World seed.
    pub seed: u64,
    /// Horizontal scale of the first octave, in world units.
    pub scale: f64,
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Amplitude decay per octave, in `[0, 1]`.
    pub persistence: f64,
    /// Frequency growth per octave, `>= 1`.
    pub lacunarity: f64,
}

/// One cosmetic terrain band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainTypeConfig {
    /// Display name (e.g. "grass").
    pub name: String,
    /// Upper height threshold of the band, in normalized height.
    pub height: f64,
}

/// Height shaping settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Multiplier applied after the height curve.
    pub height_scale: f64,
    /// Height curve keyframes `(input, output)`, sorted by input.
    pub height_curve: Vec<(f64, f64)>,
    /// Ordered cosmetic terrain bands, ascending by height.
    pub terrain_types: Vec<TerrainTypeConfig>,
}

/// Tile streaming settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Live window half-extent, in tiles.
    pub render_distance: u32,
    /// Tile width in world units.
    pub tile_width: u32,
    /// Tile depth in world units.
    pub tile_depth: u32,
    /// Diff old and new windows instead of replacing the whole window.
    pub incremental: bool,
    /// Tile generation worker threads (0 = one per CPU).
    pub worker_threads: usize,
}

/// Finite level footprint, in tiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    /// Level width in tiles.
    pub width_tiles: u32,
    /// Level depth in tiles.
    pub depth_tiles: u32,
}

/// Pathfinding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathConfig {
    /// Cells must be strictly above this normalized height to be walkable.
    pub min_walkable: f64,
    /// Cells must be strictly below this normalized height to be walkable.
    pub max_walkable: f64,
    /// Search steps performed per driver tick.
    pub steps_per_tick: u32,
}

/// An inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Band {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Band {
    /// Creates a band.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Decoration thresholds for one kind of tile producer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationPolicyConfig {
    /// Raw average height band a tile must fall in to host a safe zone.
    pub safe_zone_raw: Band,
    /// Scaled average height band a tile must fall in to host a safe zone.
    pub safe_zone_scaled: Band,
    /// Probability that a qualifying tile actually receives a safe zone.
    pub safe_zone_chance: f64,
    /// Raw average height band for trees.
    pub tree_raw: Band,
    /// Scaled average height band for trees.
    pub tree_scaled: Band,
    /// Exclusive upper bound on the tree count drawn per tile.
    pub max_trees: u32,
    /// Tree scale range.
    pub tree_scale: Band,
}

/// Decoration policies for streamed tiles and for the finite level.
///
/// The two are kept separate on purpose; their thresholds differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationConfig {
    /// Policy for tiles created by the streaming cache.
    pub streaming: DecorationPolicyConfig,
    /// Policy for tiles of the finite level.
    pub level: DecorationPolicyConfig,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            scale: 50.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let band = |name: &str, height: f64| TerrainTypeConfig {
            name: name.to_string(),
            height,
        };
        Self {
            height_scale: 5.0,
            height_curve: vec![(0.0, 0.0), (1.0, 1.0)],
            terrain_types: vec![
                band("water", 0.3),
                band("sand", 0.4),
                band("grass", 0.6),
                band("rock", 0.8),
                band("snow", 1.0),
            ],
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: 5,
            tile_width: 16,
            tile_depth: 16,
            incremental: false,
            worker_threads: 0,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width_tiles: 10,
            depth_tiles: 10,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            min_walkable: 0.4,
            max_walkable: 0.6,
            steps_per_tick: 1,
        }
    }
}

impl Default for DecorationPolicyConfig {
    fn default() -> Self {
        Self {
            safe_zone_raw: Band::new(0.5, 0.55),
            safe_zone_scaled: Band::new(2.0, 2.65),
            safe_zone_chance: 0.5,
            tree_raw: Band::new(0.45, 0.55),
            tree_scaled: Band::new(2.0, 2.7),
            max_trees: 3,
            tree_scale: Band::new(0.7, 1.0),
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            streaming: DecorationPolicyConfig::default(),
            level: DecorationPolicyConfig {
                safe_zone_raw: Band::new(0.5, 0.6),
                safe_zone_scaled: Band::new(2.0, 3.0),
                ..DecorationPolicyConfig::default()
            },
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_band(field: &'static str, band: Band) -> Result<(), ConfigError> {
    if !(band.min.is_finite() && band.max.is_finite()) || band.min > band.max {
        return Err(invalid(
            field,
            format!("expected finite min <= max, got [{}, {}]", band.min, band.max),
        ));
    }
    Ok(())
}

impl DecorationPolicyConfig {
    fn validate(&self, prefix: &'static [&'static str; 5]) -> Result<(), ConfigError> {
        check_band(prefix[0], self.safe_zone_raw)?;
        check_band(prefix[1], self.safe_zone_scaled)?;
        check_band(prefix[2], self.tree_raw)?;
        check_band(prefix[3], self.tree_scaled)?;
        check_band(prefix[4], self.tree_scale)?;
        if !(0.0..=1.0).contains(&self.safe_zone_chance) {
            return Err(invalid(
                "decoration.safe_zone_chance",
                format!("must be within [0, 1], got {}", self.safe_zone_chance),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Reject values that would otherwise leak into noise or grid math.
    ///
    /// Tiny positive noise scales are accepted here; the noise field clamps
    /// them to its minimum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let noise = &self.noise;
        if !noise.scale.is_finite() || noise.scale <= 0.0 {
            return Err(invalid(
                "noise.scale",
                format!("must be positive, got {}", noise.scale),
            ));
        }
        if !(0.0..=1.0).contains(&noise.persistence) {
            return Err(invalid(
                "noise.persistence",
                format!("must be within [0, 1], got {}", noise.persistence),
            ));
        }
        if !noise.lacunarity.is_finite() || noise.lacunarity < 1.0 {
            return Err(invalid(
                "noise.lacunarity",
                format!("must be >= 1, got {}", noise.lacunarity),
            ));
        }

        let terrain = &self.terrain;
        if !terrain.height_scale.is_finite() || terrain.height_scale <= 0.0 {
            return Err(invalid(
                "terrain.height_scale",
                format!("must be positive, got {}", terrain.height_scale),
            ));
        }
        if terrain.height_curve.is_empty() {
            return Err(invalid("terrain.height_curve", "needs at least one key"));
        }
        if terrain.terrain_types.is_empty() {
            return Err(invalid("terrain.terrain_types", "needs at least one band"));
        }

        let streaming = &self.streaming;
        if streaming.tile_width == 0 || streaming.tile_depth == 0 {
            return Err(invalid(
                "streaming.tile_width",
                format!(
                    "tile dimensions must be positive, got {}x{}",
                    streaming.tile_width, streaming.tile_depth
                ),
            ));
        }
        if self.level.width_tiles == 0 || self.level.depth_tiles == 0 {
            return Err(invalid(
                "level.width_tiles",
                format!(
                    "level dimensions must be positive, got {}x{}",
                    self.level.width_tiles, self.level.depth_tiles
                ),
            ));
        }

        let path = &self.path;
        if path.min_walkable >= path.max_walkable {
            return Err(invalid(
                "path.min_walkable",
                format!(
                    "walkable band ({}, {}) is empty",
                    path.min_walkable, path.max_walkable
                ),
            ));
        }
        if path.steps_per_tick == 0 {
            return Err(invalid("path.steps_per_tick", "must be at least 1"));
        }

        self.decoration.streaming.validate(&[
            "decoration.streaming.safe_zone_raw",
            "decoration.streaming.safe_zone_scaled",
            "decoration.streaming.tree_raw",
            "decoration.streaming.tree_scaled",
            "decoration.streaming.tree_scale",
        ])?;
        self.decoration.level.validate(&[
            "decoration.level.safe_zone_raw",
            "decoration.level.safe_zone_scaled",
            "decoration.level.tree_raw",
            "decoration.level.tree_scaled",
            "decoration.level.tree_scale",
        ])?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            tracing::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            tracing::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("octaves: 4"));
        assert!(ron_str.contains("render_distance: 5"));
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(noise: (seed: 7), streaming: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.path, PathConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_decoration_policies_differ_by_default() {
        let decoration = DecorationConfig::default();
        assert_ne!(
            decoration.streaming.safe_zone_raw, decoration.level.safe_zone_raw,
            "streaming and level safe-zone bands are configured independently"
        );
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut config = Config::default();
        config.noise.scale = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "noise.scale", .. }));
    }

    #[test]
    fn test_tiny_positive_scale_accepted() {
        let mut config = Config::default();
        config.noise.scale = 1e-9;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_persistence_out_of_range_rejected() {
        let mut config = Config::default();
        config.noise.persistence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let mut config = Config::default();
        config.streaming.tile_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_walkable_band_rejected() {
        let mut config = Config::default();
        config.path.min_walkable = 0.6;
        config.path.max_walkable = 0.6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_decoration_band_rejected() {
        let mut config = Config::default();
        config.decoration.level.tree_raw = Band::new(0.9, 0.1);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "decoration.level.tree_raw",
                ..
            }
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.noise.seed = 9001;
        config.streaming.render_distance = 3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.level.width_tiles = 20;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().level.width_tiles, 20);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
