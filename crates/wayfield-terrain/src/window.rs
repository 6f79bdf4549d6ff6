//! The live window: the rectangle of tile coordinates around a focal point.

use glam::DVec2;

use crate::tile::{TileCoord, TileSize};

/// Inclusive rectangle `[start.x, end.x] × [start.z, end.z]` of tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileWindow {
    start: TileCoord,
    end: TileCoord,
}

impl TileWindow {
    /// The window of render distance `render_distance` (in tiles) around `focus`.
    ///
    /// Along X, `start = floor((focus.x - R * width) / width)` and
    /// `end = floor((focus.x + R * width) / width)`; Z is the same with depth.
    pub fn from_focus(focus: DVec2, render_distance: u32, size: TileSize) -> Self {
        let r = f64::from(render_distance);
        let extent = size.extent();
        let lo = ((focus - r * extent) / extent).floor();
        let hi = ((focus + r * extent) / extent).floor();
        Self {
            start: TileCoord::new(lo.x as i32, lo.y as i32),
            end: TileCoord::new(hi.x as i32, hi.y as i32),
        }
    }

    /// Lowest corner (inclusive).
    pub fn start(&self) -> TileCoord {
        self.start
    }

    /// Highest corner (inclusive).
    pub fn end(&self) -> TileCoord {
        self.end
    }

    /// `true` if `coord` lies inside the window.
    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.start.x..=self.end.x).contains(&coord.x)
            && (self.start.z..=self.end.z).contains(&coord.z)
    }

    /// Number of tiles in the window.
    pub fn len(&self) -> usize {
        let w = i64::from(self.end.x) - i64::from(self.start.x) + 1;
        let d = i64::from(self.end.z) - i64::from(self.start.z) + 1;
        (w.max(0) * d.max(0)) as usize
    }

    /// `true` if the window holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every coordinate in the window, ordered by `x` then `z`.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (start, end) = (self.start, self.end);
        (start.x..=end.x).flat_map(move |x| (start.z..=end.z).map(move |z| TileCoord::new(x, z)))
    }
}
