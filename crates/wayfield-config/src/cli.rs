//! Command-line argument parsing for Wayfield.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, parse_seed};

/// Wayfield command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "wayfield", about = "Procedural terrain streaming and routing")]
pub struct CliArgs {
    /// World seed; integers are used as-is, any other text is hashed.
    #[arg(long)]
    pub seed: Option<String>,

    /// Render distance in tiles.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Noise scale in world units.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Level width in tiles.
    #[arg(long)]
    pub level_width: Option<u32>,

    /// Level depth in tiles.
    #[arg(long)]
    pub level_depth: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref text) = args.seed {
            self.noise.seed = parse_seed(text);
        }
        if let Some(rd) = args.render_distance {
            self.streaming.render_distance = rd;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(scale) = args.scale {
            self.noise.scale = scale;
        }
        if let Some(w) = args.level_width {
            self.level.width_tiles = w;
        }
        if let Some(d) = args.level_depth {
            self.level.depth_tiles = d;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("1234".to_string()),
            render_distance: Some(2),
            level_width: Some(4),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.noise.seed, 1234);
        assert_eq!(config.streaming.render_distance, 2);
        assert_eq!(config.level.width_tiles, 4);
        // Non-overridden fields retain defaults
        assert_eq!(config.level.depth_tiles, 10);
        assert_eq!(config.noise.octaves, 4);
    }

    #[test]
    fn test_cli_text_seed_is_hashed() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("river valley".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.noise.seed, parse_seed("river valley"));
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "wayfield",
            "--seed",
            "abc",
            "--octaves",
            "6",
            "--scale",
            "25.5",
        ])
        .unwrap();
        assert_eq!(args.seed.as_deref(), Some("abc"));
        assert_eq!(args.octaves, Some(6));
        assert_eq!(args.scale, Some(25.5));
    }
}
