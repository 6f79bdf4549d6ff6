//! End-to-end: configured terrain, streamed tiles and a level route.

use wayfield_config::Config;
use wayfield_path::{GridPos, PathGrid, PathOutcome, PathSearch};
use wayfield_terrain::{TerrainSettings, TileCoord};

fn scenario_config() -> Config {
    let mut config = Config::default();
    config.noise.seed = 42;
    config.noise.octaves = 4;
    config.noise.persistence = 0.5;
    config.noise.lacunarity = 2.0;
    config.noise.scale = 50.0;
    config.level.width_tiles = 10;
    config.level.depth_tiles = 10;
    config.streaming.tile_width = 16;
    config.streaming.tile_depth = 16;
    config
}

#[test]
fn test_tile_regenerates_identically_across_independent_builds() {
    let coord = TileCoord::new(3, -2);
    let first = TerrainSettings::from_config(&scenario_config())
        .unwrap()
        .streaming
        .generate(coord);
    let second = TerrainSettings::from_config(&scenario_config())
        .unwrap()
        .streaming
        .generate(coord);

    let bits = |tile: &wayfield_terrain::Tile| -> Vec<u64> {
        tile.heights().values().iter().map(|h| h.to_bits()).collect()
    };
    assert_eq!(bits(&first), bits(&second));
    assert_eq!(first.avg_height_raw().to_bits(), second.avg_height_raw().to_bits());
    assert_eq!(
        first.avg_height_scaled().to_bits(),
        second.avg_height_scaled().to_bits()
    );
    assert_eq!(first.seed(), second.seed());
    assert_eq!(first.has_safe_zone(), second.has_safe_zone());
    assert_eq!(first.decorations(), second.decorations());
}

#[test]
fn test_streamed_tile_matches_after_wandering() {
    let settings = TerrainSettings::from_config(&scenario_config()).unwrap();
    let coord = TileCoord::new(3, -2);
    let direct = settings.streaming.generate(coord);

    let mut cache = settings.tile_cache();
    for step in 0..8 {
        cache.observe(glam::DVec2::new(f64::from(step) * 20.0, -f64::from(step) * 9.0));
    }
    cache.observe(glam::DVec2::new(48.0, -32.0));
    assert_eq!(cache.get(coord), Some(&direct));
}

#[test]
fn test_level_route_is_walkable_and_reproducible() {
    let settings = TerrainSettings::from_config(&scenario_config()).unwrap();
    let grid = PathGrid::from_footprint(
        settings.field(),
        &settings.footprint,
        &settings.walkable,
        settings.level.shape(),
    )
    .unwrap();
    assert_eq!(grid.width(), 161);
    assert_eq!(grid.height(), 161);
    assert_eq!(grid.walkable_count(), 13521);

    let first = PathSearch::new(&grid).unwrap().run_to_completion();
    let second = PathSearch::new(&grid).unwrap().run_to_completion();
    assert_eq!(first, second);

    let route = match first {
        PathOutcome::Found(route) => route,
        other => panic!("seed 42 level must be connected, got {other:?}"),
    };
    assert_eq!(grid.start_node().unwrap(), GridPos::new(154, 160));
    assert_eq!(grid.goal_node().unwrap(), GridPos::new(0, 0));
    assert_eq!(route.start(), GridPos::new(154, 160));
    assert_eq!(route.goal(), GridPos::new(0, 0));
    assert_eq!(route.step_count(), 164);
    assert_eq!(route.cost, 2240);
    for (cell, waypoint) in route.cells.iter().zip(&route.waypoints) {
        let node = grid.get(*cell).unwrap();
        assert!(node.walkable, "route crosses unwalkable cell {cell}");
        assert_eq!(node.world, *waypoint);
    }
    for pair in route.cells.windows(2) {
        assert!(pair[0].x.abs_diff(pair[1].x) <= 1);
        assert!(pair[0].y.abs_diff(pair[1].y) <= 1);
    }
}

#[test]
fn test_level_grid_heights_match_level_tiles() {
    let settings = TerrainSettings::from_config(&scenario_config()).unwrap();
    let grid = PathGrid::from_footprint(
        settings.field(),
        &settings.footprint,
        &settings.walkable,
        settings.level.shape(),
    )
    .unwrap();
    let level = settings.finite_level();
    assert_eq!(level.tiles().len(), 100);

    let tile = level.tile(TileCoord::new(4, 7)).unwrap();
    for z in 0..=16usize {
        for x in 0..=16usize {
            let world = tile.position() - glam::DVec2::new(x as f64, z as f64);
            let h = tile.heights().get(x, z);
            let cx = (144.0 - world.x) as usize;
            let cy = (144.0 - world.y) as usize;
            let node = grid.get(GridPos::new(cx, cy)).unwrap();
            assert_eq!(node.walkable, settings.walkable.contains(h));
            assert_eq!(node.world.x, world.x);
            assert_eq!(node.world.z, world.y);
        }
    }
}
