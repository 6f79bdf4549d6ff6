//! The pathfinding grid: an arena of cells with fixed walkability.
//!
//! Cells are addressed by [`NodeId`], an index into the arena, so a search
//! can refer to parents and neighbours without holding references.

use glam::DVec3;
use wayfield_terrain::{LevelFootprint, NoiseField, TerrainShape, WalkableBand};

use crate::error::PathError;

/// Step cost between axis-aligned neighbours.
pub const AXIS_COST: u32 = 10;
/// Step cost between diagonal neighbours.
pub const DIAGONAL_COST: u32 = 14;

/// Column and row of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl GridPos {
    /// Creates a position.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Octile distance in fixed-point tenths: 14 per diagonal step, 10 per
/// straight step.
pub fn grid_distance(a: GridPos, b: GridPos) -> u32 {
    let dx = a.x.abs_diff(b.x) as u32;
    let dy = a.y.abs_diff(b.y) as u32;
    DIAGONAL_COST * dx.min(dy) + AXIS_COST * dx.abs_diff(dy)
}

/// Index of a cell in a [`PathGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct PathNode {
    /// Grid position.
    pub pos: GridPos,
    /// World position of the cell's surface.
    pub world: DVec3,
    /// Whether a route may pass through this cell.
    pub walkable: bool,
}

/// A rectangular grid of [`PathNode`]s, stored row-major.
#[derive(Clone, Debug)]
pub struct PathGrid {
    width: usize,
    height: usize,
    nodes: Vec<PathNode>,
}

impl PathGrid {
    /// Build a grid from a walkability predicate. World positions are
    /// `(x, 0, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyGrid`] if either dimension is zero.
    pub fn from_walkability(
        width: usize,
        height: usize,
        walkable: impl Fn(GridPos) -> bool,
    ) -> Result<Self, PathError> {
        Self::build(width, height, |pos| PathNode {
            pos,
            world: DVec3::new(pos.x as f64, 0.0, pos.y as f64),
            walkable: walkable(pos),
        })
    }

    /// Build the grid for a whole level from one noise sample spanning its
    /// footprint.
    ///
    /// A cell is walkable when its normalized height lies strictly inside
    /// `walkable`; its world height comes from `shape`.
    pub fn from_footprint(
        field: &NoiseField,
        footprint: &LevelFootprint,
        walkable: &WalkableBand,
        shape: &TerrainShape,
    ) -> Result<Self, PathError> {
        let heights = footprint.sample(field);
        let grid = Self::build(heights.width(), heights.depth(), |pos| {
            let h = heights.get(pos.x, pos.y);
            let world = footprint.cell_world_position(pos.x, pos.y);
            PathNode {
                pos,
                world: DVec3::new(world.x, shape.world_height(h), world.y),
                walkable: walkable.contains(h),
            }
        })?;
        tracing::debug!(
            width = grid.width,
            height = grid.height,
            walkable = grid.walkable_count(),
            "path grid built"
        );
        Ok(grid)
    }

    fn build(
        width: usize,
        height: usize,
        mut node: impl FnMut(GridPos) -> PathNode,
    ) -> Result<Self, PathError> {
        if width == 0 || height == 0 {
            return Err(PathError::EmptyGrid { width, height });
        }
        let mut nodes = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                nodes.push(node(GridPos::new(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            nodes,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; grids have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of `pos`, if it is inside the grid.
    pub fn id(&self, pos: GridPos) -> Option<NodeId> {
        (pos.x < self.width && pos.y < self.height).then(|| NodeId(pos.y * self.width + pos.x))
    }

    /// The cell with the given index.
    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0]
    }

    /// The cell at `pos`, if inside the grid.
    pub fn get(&self, pos: GridPos) -> Option<&PathNode> {
        self.id(pos).map(|id| self.node(id))
    }

    /// `true` if `pos` is inside the grid and walkable.
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|node| node.walkable)
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.walkable).count()
    }

    /// The in-bounds 8-connected neighbours of `id`, with their step cost.
    ///
    /// Ordered by column offset (-1, 0, 1), then row offset.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        let pos = self.node(id).pos;
        (-1isize..=1)
            .flat_map(|dx| (-1isize..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| {
                let x = pos.x.checked_add_signed(dx)?;
                let y = pos.y.checked_add_signed(dy)?;
                let neighbor = self.id(GridPos::new(x, y))?;
                let cost = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    AXIS_COST
                };
                Some((neighbor, cost))
            })
    }

    /// First walkable cell scanning from the last row and last column
    /// backwards: the corner the observer spawns near.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoWalkableRegion`] if no cell is walkable.
    pub fn start_node(&self) -> Result<GridPos, PathError> {
        (0..self.height)
            .rev()
            .flat_map(|y| (0..self.width).rev().map(move |x| GridPos::new(x, y)))
            .find(|&pos| self.is_walkable(pos))
            .ok_or(PathError::NoWalkableRegion)
    }

    /// First walkable cell scanning from row 0, column 0 forwards: the far
    /// corner of the level.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoWalkableRegion`] if no cell is walkable.
    pub fn goal_node(&self) -> Result<GridPos, PathError> {
        self.nodes
            .iter()
            .find(|node| node.walkable)
            .map(|node| node.pos)
            .ok_or(PathError::NoWalkableRegion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_distance() {
        assert_eq!(grid_distance(GridPos::new(0, 0), GridPos::new(0, 0)), 0);
        assert_eq!(grid_distance(GridPos::new(0, 0), GridPos::new(3, 0)), 30);
        assert_eq!(grid_distance(GridPos::new(0, 0), GridPos::new(2, 2)), 28);
        assert_eq!(grid_distance(GridPos::new(4, 1), GridPos::new(0, 3)), 48);
    }

    #[test]
    fn test_neighbors_corner_and_center() {
        let grid = PathGrid::from_walkability(3, 3, |_| true).unwrap();
        let corner = grid.id(GridPos::new(0, 0)).unwrap();
        assert_eq!(grid.neighbors(corner).count(), 3);

        let center = grid.id(GridPos::new(1, 1)).unwrap();
        let around: Vec<(GridPos, u32)> = grid
            .neighbors(center)
            .map(|(id, cost)| (grid.node(id).pos, cost))
            .collect();
        assert_eq!(
            around,
            vec![
                (GridPos::new(0, 0), 14),
                (GridPos::new(0, 1), 10),
                (GridPos::new(0, 2), 14),
                (GridPos::new(1, 0), 10),
                (GridPos::new(1, 2), 10),
                (GridPos::new(2, 0), 14),
                (GridPos::new(2, 1), 10),
                (GridPos::new(2, 2), 14),
            ]
        );
    }

    #[test]
    fn test_start_and_goal_scan_order() {
        let open = [GridPos::new(1, 0), GridPos::new(3, 0), GridPos::new(0, 2), GridPos::new(2, 2)];
        let grid = PathGrid::from_walkability(4, 3, |pos| open.contains(&pos)).unwrap();
        assert_eq!(grid.start_node().unwrap(), GridPos::new(2, 2));
        assert_eq!(grid.goal_node().unwrap(), GridPos::new(1, 0));
    }

    #[test]
    fn test_all_blocked_has_no_walkable_region() {
        let grid = PathGrid::from_walkability(4, 4, |_| false).unwrap();
        assert_eq!(grid.start_node(), Err(PathError::NoWalkableRegion));
        assert_eq!(grid.goal_node(), Err(PathError::NoWalkableRegion));
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(matches!(
            PathGrid::from_walkability(0, 3, |_| true),
            Err(PathError::EmptyGrid { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let grid = PathGrid::from_walkability(2, 2, |_| true).unwrap();
        assert!(grid.get(GridPos::new(2, 0)).is_none());
        assert!(!grid.is_walkable(GridPos::new(0, 5)));
    }
}
