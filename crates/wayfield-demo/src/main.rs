//! Headless driver: walks an observer across streamed terrain while the
//! level route is searched a few steps per tick.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p wayfield-demo -- --seed "river valley" --ticks 400`.

use std::process::ExitCode;

use clap::Parser;
use glam::DVec2;
use tracing::{info, warn};
use wayfield_config::{CliArgs, Config, ConfigError, default_config_dir};
use wayfield_path::{PathError, PathGrid, PathOutcome, PathSearch};
use wayfield_terrain::{TerrainError, TerrainSettings};

#[derive(Parser, Debug)]
#[command(name = "wayfield-demo", about = "Stream terrain around a walking observer")]
struct DemoArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Observer speed in world units per tick.
    #[arg(long, default_value_t = 3.0)]
    speed: f64,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Path(#[from] PathError),
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("wayfield-demo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &DemoArgs) -> Result<(), DemoError> {
    let config_dir = args.cli.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.cli);

    let log_dir = config_dir.join("logs");
    wayfield_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    config.validate()?;
    info!(seed = config.noise.seed, "terrain seed");

    let settings = TerrainSettings::from_config(&config)?;
    let level = settings.finite_level();
    let grid = PathGrid::from_footprint(
        settings.field(),
        level.footprint(),
        &settings.walkable,
        settings.level.shape(),
    )?;

    let mut search = match PathSearch::new(&grid) {
        Ok(search) => Some(search),
        Err(PathError::NoWalkableRegion) => {
            warn!("level has no walkable cells, skipping route");
            None
        }
        Err(e) => return Err(e.into()),
    };
    let mut outcome = None;

    let mut cache = settings.tile_cache();
    let heading = DVec2::new(1.0, 0.5).normalize();
    let mut observer = DVec2::ZERO;
    let steps_per_tick = config.path.steps_per_tick as usize;

    for tick in 0..args.ticks {
        let update = cache.observe(observer);
        if !update.is_empty() {
            let decorations: usize = update.destroyed.iter().map(|t| t.decorations().len()).sum();
            info!(
                tick,
                x = observer.x,
                z = observer.y,
                created = update.created.len(),
                destroyed = update.destroyed.len(),
                decorations_released = decorations,
                "window moved"
            );
        }

        if outcome.is_none() {
            if let Some(search) = search.as_mut() {
                outcome = search.run(steps_per_tick);
            }
        }

        observer += heading * args.speed;
    }

    let stats = cache.stats();
    info!(
        live = cache.len(),
        recomputes = stats.recomputes,
        created = stats.tiles_created,
        destroyed = stats.tiles_destroyed,
        "streaming summary"
    );

    match (outcome, search.as_ref()) {
        (Some(PathOutcome::Found(route)), _) => info!(
            steps = route.step_count(),
            cost = route.cost,
            start = %route.start(),
            goal = %route.goal(),
            "level route found"
        ),
        (Some(PathOutcome::NoPath), _) => warn!("no route between start and goal"),
        (Some(PathOutcome::Cancelled), _) => warn!("route search cancelled"),
        (None, Some(search)) => info!(
            expansions = search.expansions(),
            "route search still running after {} ticks",
            args.ticks
        ),
        (None, None) => info!("no route"),
    }
    Ok(())
}
