//! Tile streaming: keeps the live window of tiles around a moving focal point.
//!
//! The cache reacts to boundary crossings rather than to every position
//! update. When the focal point has moved at least one tile from where the
//! window was last computed, the window is recomputed and the live set is
//! brought in line with it, either by replacing everything or by diffing.
//! Both strategies leave the same tiles alive with the same contents.

use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::tile::{Tile, TileCoord, TileGenerator};
use crate::window::TileWindow;

/// How the live set is updated when the window changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// Destroy every live tile and build the whole new window.
    #[default]
    FullReplace,
    /// Destroy only tiles that left the window; build only tiles that entered.
    Incremental,
}

/// Changes made by one call to [`TileCache::observe`].
#[derive(Debug, Default)]
pub struct WindowUpdate {
    /// Coordinates of tiles built this call, sorted.
    pub created: Vec<TileCoord>,
    /// Tiles removed from the live set, sorted by coordinate.
    ///
    /// Dropping them releases their decorations.
    pub destroyed: Vec<Tile>,
}

impl WindowUpdate {
    /// `true` if the live set did not change.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Running totals for a cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Times the window was recomputed and found changed.
    pub recomputes: u64,
    /// Tiles built.
    pub tiles_created: u64,
    /// Tiles destroyed.
    pub tiles_destroyed: u64,
}

/// Live tiles around a focal point.
pub struct TileCache {
    generator: TileGenerator,
    render_distance: u32,
    strategy: RefreshStrategy,
    worker_threads: usize,
    tiles: FxHashMap<TileCoord, Tile>,
    window: Option<TileWindow>,
    anchor: Option<DVec2>,
    stats: CacheStats,
}

impl TileCache {
    /// Creates an empty cache. Nothing is generated until the first
    /// [`TileCache::observe`].
    pub fn new(generator: TileGenerator, render_distance: u32, strategy: RefreshStrategy) -> Self {
        Self {
            generator,
            render_distance,
            strategy,
            worker_threads: 1,
            tiles: FxHashMap::default(),
            window: None,
            anchor: None,
            stats: CacheStats::default(),
        }
    }

    /// Generate tiles on `threads` workers (0 = one per CPU).
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Feed the focal point's current world position (X, Z).
    ///
    /// The first call always builds the window. Later calls recompute only
    /// once the focal point is at least one tile width (or depth) away from
    /// the last anchor, and change nothing if the recomputed window is the
    /// same as the current one.
    pub fn observe(&mut self, focus: DVec2) -> WindowUpdate {
        let extent = self.generator.size().extent();
        if let Some(anchor) = self.anchor {
            let moved = (focus - anchor).abs();
            if moved.x < extent.x && moved.y < extent.y {
                return WindowUpdate::default();
            }
        }
        self.anchor = Some((focus / extent).floor() * extent);

        let window = TileWindow::from_focus(focus, self.render_distance, self.generator.size());
        if self.window == Some(window) {
            return WindowUpdate::default();
        }
        let update = match self.strategy {
            RefreshStrategy::FullReplace => self.replace(window),
            RefreshStrategy::Incremental => self.diff(window),
        };
        self.window = Some(window);

        self.stats.recomputes += 1;
        self.stats.tiles_created += update.created.len() as u64;
        self.stats.tiles_destroyed += update.destroyed.len() as u64;
        tracing::debug!(
            start = %window.start(),
            end = %window.end(),
            created = update.created.len(),
            destroyed = update.destroyed.len(),
            "tile window recomputed"
        );
        update
    }

    fn replace(&mut self, window: TileWindow) -> WindowUpdate {
        let coords: Vec<TileCoord> = window.iter().collect();
        // Build first so the live set swaps in one step.
        let fresh = self.generator.generate_batch(&coords, self.worker_threads);
        let mut destroyed: Vec<Tile> = self.tiles.drain().map(|(_, tile)| tile).collect();
        destroyed.sort_by_key(Tile::coord);
        self.tiles.extend(fresh.into_iter().map(|tile| (tile.coord(), tile)));
        WindowUpdate {
            created: coords,
            destroyed,
        }
    }

    fn diff(&mut self, window: TileWindow) -> WindowUpdate {
        let entering: Vec<TileCoord> = window
            .iter()
            .filter(|coord| !self.tiles.contains_key(coord))
            .collect();
        let fresh = self.generator.generate_batch(&entering, self.worker_threads);

        let mut leaving: Vec<TileCoord> = self
            .tiles
            .keys()
            .copied()
            .filter(|&coord| !window.contains(coord))
            .collect();
        leaving.sort();
        let destroyed = leaving
            .iter()
            .filter_map(|coord| self.tiles.remove(coord))
            .collect();

        self.tiles.extend(fresh.into_iter().map(|tile| (tile.coord(), tile)));
        WindowUpdate {
            created: entering,
            destroyed,
        }
    }

    /// Looks up a live tile.
    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Number of live tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// `true` before the first observation.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Live coordinates, sorted.
    pub fn live_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.tiles.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Current window, if any observation has been made.
    pub fn window(&self) -> Option<TileWindow> {
        self.window
    }

    /// Running totals.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Refresh strategy in use.
    pub fn strategy(&self) -> RefreshStrategy {
        self.strategy
    }

    /// The tile generator.
    pub fn generator(&self) -> &TileGenerator {
        &self.generator
    }
}
