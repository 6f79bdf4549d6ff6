//! Steppable, cancellable A* search over a [`PathGrid`].
//!
//! A search does one unit of work per [`PathSearch::step`]: one node
//! expansion while searching, or one retraced route cell once the goal has
//! been dequeued. The host's scheduler decides how many steps to run per
//! tick. All per-run bookkeeping lives in the search, so a fresh search on
//! the same grid never sees state left behind by an earlier one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::DVec3;

use crate::error::PathError;
use crate::grid::{GridPos, NodeId, PathGrid, grid_distance};

/// Shared flag that stops a search at its next step.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once [`CancelToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A finished route from start to goal.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Cells from start to goal, both included.
    pub cells: Vec<GridPos>,
    /// World positions of `cells`.
    pub waypoints: Vec<DVec3>,
    /// Total step cost (10 per straight step, 14 per diagonal).
    pub cost: u32,
}

impl Route {
    /// Number of moves: one less than the number of cells.
    pub fn step_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// First cell.
    pub fn start(&self) -> GridPos {
        self.cells[0]
    }

    /// Last cell.
    pub fn goal(&self) -> GridPos {
        self.cells[self.cells.len() - 1]
    }
}

/// Lifecycle of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathState {
    /// Created, not yet stepped.
    Idle,
    /// Expanding nodes.
    Searching,
    /// Goal reached; the route is being (or has been) retraced.
    Found,
    /// The open set ran dry without reaching the goal.
    Exhausted,
    /// Stopped through a [`CancelToken`].
    Cancelled,
}

/// What one call to [`PathSearch::step`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum PathStep {
    /// Expanded the node at this cell.
    Expanded(GridPos),
    /// Added this cell to the route, walking back from the goal.
    Retraced(GridPos),
    /// The route is complete. Returned again on every later step.
    Found(Route),
    /// No route exists. Returned again on every later step.
    Exhausted,
    /// The search was cancelled. Returned again on every later step.
    Cancelled,
}

/// Final result of a search.
#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
    /// A route was found.
    Found(Route),
    /// Start and goal are not connected.
    NoPath,
    /// The search was cancelled before finishing.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    g: u32,
    h: u32,
    parent: Option<NodeId>,
    open: bool,
    closed: bool,
}

impl SearchNode {
    const UNVISITED: Self = Self {
        g: 0,
        h: 0,
        parent: None,
        open: false,
        closed: false,
    };

    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// An A* run from a start cell to a goal cell.
pub struct PathSearch<'g> {
    grid: &'g PathGrid,
    start: NodeId,
    goal: NodeId,
    nodes: Vec<SearchNode>,
    open: Vec<NodeId>,
    state: PathState,
    retrace: Vec<NodeId>,
    cursor: Option<NodeId>,
    route: Option<Route>,
    cancel: CancelToken,
    expansions: usize,
}

impl<'g> PathSearch<'g> {
    /// Search between the grid's scan-selected endpoints:
    /// [`PathGrid::start_node`] and [`PathGrid::goal_node`].
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoWalkableRegion`] if the grid has no walkable cell.
    pub fn new(grid: &'g PathGrid) -> Result<Self, PathError> {
        let start = grid.start_node()?;
        let goal = grid.goal_node()?;
        Self::between(grid, start, goal)
    }

    /// Search between explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidNode`] if either endpoint is outside the
    /// grid or not walkable.
    pub fn between(grid: &'g PathGrid, start: GridPos, goal: GridPos) -> Result<Self, PathError> {
        let endpoint = |pos: GridPos| {
            grid.id(pos)
                .filter(|&id| grid.node(id).walkable)
                .ok_or(PathError::InvalidNode(pos))
        };
        let start_id = endpoint(start)?;
        let goal_id = endpoint(goal)?;

        let mut nodes = vec![SearchNode::UNVISITED; grid.len()];
        nodes[start_id.0] = SearchNode {
            h: grid_distance(start, goal),
            open: true,
            ..SearchNode::UNVISITED
        };

        Ok(Self {
            grid,
            start: start_id,
            goal: goal_id,
            nodes,
            open: vec![start_id],
            state: PathState::Idle,
            retrace: Vec::new(),
            cursor: None,
            route: None,
            cancel: CancelToken::new(),
            expansions: 0,
        })
    }

    /// Use `token` to cancel this search.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels this search.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PathState {
        self.state
    }

    /// Start cell.
    pub fn start(&self) -> GridPos {
        self.grid.node(self.start).pos
    }

    /// Goal cell.
    pub fn goal(&self) -> GridPos {
        self.grid.node(self.goal).pos
    }

    /// Nodes expanded so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Cells currently in the open set, in open-set order.
    pub fn open_cells(&self) -> Vec<GridPos> {
        self.open.iter().map(|&id| self.grid.node(id).pos).collect()
    }

    /// The completed route, once retracement has finished.
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Do one unit of work.
    pub fn step(&mut self) -> PathStep {
        match self.state {
            PathState::Exhausted => return PathStep::Exhausted,
            PathState::Cancelled => return PathStep::Cancelled,
            _ => {}
        }
        if let Some(route) = &self.route {
            return PathStep::Found(route.clone());
        }
        if self.cancel.is_cancelled() {
            self.abandon();
            return PathStep::Cancelled;
        }
        if self.state == PathState::Found {
            return self.retrace_step();
        }
        if self.state == PathState::Idle {
            self.state = PathState::Searching;
            tracing::debug!(start = %self.start(), goal = %self.goal(), "path search started");
        }
        self.expand_step()
    }

    /// Run at most `max_steps` steps. Returns the outcome if the search
    /// finished within them.
    pub fn run(&mut self, max_steps: usize) -> Option<PathOutcome> {
        for _ in 0..max_steps {
            if let Some(outcome) = Self::outcome_of(self.step()) {
                return Some(outcome);
            }
        }
        None
    }

    /// Step until the search finishes.
    pub fn run_to_completion(&mut self) -> PathOutcome {
        loop {
            if let Some(outcome) = Self::outcome_of(self.step()) {
                return outcome;
            }
        }
    }

    fn outcome_of(step: PathStep) -> Option<PathOutcome> {
        match step {
            PathStep::Found(route) => Some(PathOutcome::Found(route)),
            PathStep::Exhausted => Some(PathOutcome::NoPath),
            PathStep::Cancelled => Some(PathOutcome::Cancelled),
            PathStep::Expanded(_) | PathStep::Retraced(_) => None,
        }
    }

    /// Index into `open` of the best node: lowest f, then lowest h, then
    /// earliest in the open set.
    fn best_open(&self) -> Option<usize> {
        let mut best: Option<(usize, &SearchNode)> = None;
        for (index, id) in self.open.iter().enumerate() {
            let node = &self.nodes[id.0];
            let better = match best {
                None => true,
                Some((_, current)) => {
                    node.f() < current.f() || (node.f() == current.f() && node.h < current.h)
                }
            };
            if better {
                best = Some((index, node));
            }
        }
        best.map(|(index, _)| index)
    }

    fn expand_step(&mut self) -> PathStep {
        let Some(index) = self.best_open() else {
            self.state = PathState::Exhausted;
            self.open.clear();
            tracing::debug!(expansions = self.expansions, "path search exhausted");
            return PathStep::Exhausted;
        };
        let current = self.open.remove(index);
        {
            let node = &mut self.nodes[current.0];
            node.open = false;
            node.closed = true;
        }
        let pos = self.grid.node(current).pos;

        if current == self.goal {
            self.state = PathState::Found;
            self.open.clear();
            tracing::debug!(
                expansions = self.expansions,
                cost = self.nodes[current.0].g,
                "path goal reached"
            );
            self.cursor = Some(current);
            return self.retrace_step();
        }

        self.expansions += 1;
        let grid = self.grid;
        let goal_pos = self.goal();
        let current_g = self.nodes[current.0].g;
        for (neighbor, cost) in grid.neighbors(current) {
            let cell = grid.node(neighbor);
            let entry = &mut self.nodes[neighbor.0];
            if !cell.walkable || entry.closed {
                continue;
            }
            let tentative = current_g + cost;
            if tentative < entry.g || !entry.open {
                entry.g = tentative;
                entry.h = grid_distance(cell.pos, goal_pos);
                entry.parent = Some(current);
                if !entry.open {
                    entry.open = true;
                    self.open.push(neighbor);
                }
            }
        }
        PathStep::Expanded(pos)
    }

    fn retrace_step(&mut self) -> PathStep {
        match self.cursor {
            Some(id) => {
                self.retrace.push(id);
                self.cursor = if id == self.start {
                    None
                } else {
                    self.nodes[id.0].parent
                };
                PathStep::Retraced(self.grid.node(id).pos)
            }
            None => {
                let route = self.finish_route();
                self.route = Some(route.clone());
                PathStep::Found(route)
            }
        }
    }

    fn finish_route(&mut self) -> Route {
        let ids: Vec<NodeId> = self.retrace.drain(..).rev().collect();
        let cost = self.nodes[self.goal.0].g;
        let cells: Vec<GridPos> = ids.iter().map(|&id| self.grid.node(id).pos).collect();
        let waypoints = ids.iter().map(|&id| self.grid.node(id).world).collect();
        tracing::debug!(cells = cells.len(), cost, "path route retraced");
        Route {
            cells,
            waypoints,
            cost,
        }
    }

    fn abandon(&mut self) {
        self.state = PathState::Cancelled;
        self.open.clear();
        self.retrace.clear();
        self.cursor = None;
        tracing::debug!(expansions = self.expansions, "path search cancelled");
    }
}
