//! Parallel tile generation over a small pool of scoped worker threads.
//!
//! Workers pull coordinates from a shared channel and send finished tiles
//! back. The batch is returned only once every tile is built, sorted by
//! coordinate, so the result is independent of thread scheduling.

use crossbeam_channel::unbounded;

use crate::tile::{Tile, TileCoord, TileGenerator};

/// Worker count for a requested thread count (0 = one per CPU), never more
/// than there are jobs.
pub fn worker_count(requested: usize, jobs: usize) -> usize {
    let threads = if requested == 0 {
        num_cpus::get()
    } else {
        requested
    };
    threads.clamp(1, jobs.max(1))
}

impl TileGenerator {
    /// Generate every tile in `coords` on up to `threads` workers.
    ///
    /// The returned tiles are sorted by coordinate and identical to what
    /// [`TileGenerator::generate`] would produce one at a time.
    pub fn generate_batch(&self, coords: &[TileCoord], threads: usize) -> Vec<Tile> {
        if coords.is_empty() {
            return Vec::new();
        }
        let workers = worker_count(threads, coords.len());
        let mut tiles = if workers == 1 {
            coords.iter().map(|&coord| self.generate(coord)).collect()
        } else {
            self.generate_parallel(coords, workers)
        };
        tiles.sort_by_key(Tile::coord);
        tiles
    }

    fn generate_parallel(&self, coords: &[TileCoord], workers: usize) -> Vec<Tile> {
        let (job_sender, job_receiver) = unbounded::<TileCoord>();
        let (tile_sender, tile_receiver) = unbounded::<Tile>();
        for &coord in coords {
            // The receiver is alive until the scope below ends.
            let _ = job_sender.send(coord);
        }
        drop(job_sender);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let jobs = job_receiver.clone();
                let results = tile_sender.clone();
                scope.spawn(move || {
                    while let Ok(coord) = jobs.recv() {
                        if results.send(self.generate(coord)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tile_sender);

        tile_receiver.into_iter().collect()
    }
}
