//! Pathfinding error types.

use wayfield_terrain::TerrainError;

use crate::grid::GridPos;

/// Errors that stop a path search from being set up.
///
/// Running out of open cells is not an error; it is the
/// [`PathOutcome::NoPath`](crate::PathOutcome::NoPath) outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The grid has no walkable cell to start or finish on.
    #[error("no walkable cell in the grid")]
    NoWalkableRegion,

    /// An explicit endpoint is outside the grid or not walkable.
    #[error("cell {0} is outside the grid or not walkable")]
    InvalidNode(GridPos),

    /// A grid needs at least one cell.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Building the terrain the grid is sampled from failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
