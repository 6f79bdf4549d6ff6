//! Grid A* pathfinding over generated terrain.
//!
//! [`PathGrid`] holds per-cell walkability and world positions, built either
//! from a level's noise footprint or by hand. [`PathSearch`] runs A* over it
//! one step at a time so the work can be spread across host ticks.

mod error;
mod grid;
mod search;

pub use error::PathError;
pub use grid::{AXIS_COST, DIAGONAL_COST, GridPos, NodeId, PathGrid, PathNode, grid_distance};
pub use search::{CancelToken, PathOutcome, PathSearch, PathState, PathStep, Route};
