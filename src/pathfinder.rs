//! A* search over a [Grid] with octile costs.
//!
//! All scratch state of a search (open queue, closed set and the arena of discovered cells) is
//! created per call, so one [Grid] can be searched any number of times, also from several
//! threads at once.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, warn};
use thiserror::Error;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::point::Point;
use crate::priority_queue::PriorityQueue;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Default bound on the number of cells a single search may expand.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0} is outside the grid or not navigable")]
    InvalidEndpoint(Point),
    #[error("{goal} is not reachable from {start}")]
    Unreachable { start: Point, goal: Point },
    #[error("search gave up after {0} expansions")]
    ExpansionLimit(usize),
    #[error("predecessor chain broke at {0}")]
    BrokenChain(Point),
}

/// Finds shortest 8-directional paths, costing C per straight and D per diagonal step.
#[derive(Clone, Debug)]
pub struct PathFinder {
    /// Fails the search once more cells than this have been expanded. [None] disables the bound.
    pub max_expansions: Option<usize>,
    /// Rejects start/goal pairs on different connected components before searching.
    pub check_components: bool,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder::new()
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
            check_components: true,
        }
    }

    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> PathFinder {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_component_check(mut self, check_components: bool) -> PathFinder {
        self.check_components = check_components;
        self
    }

    /// Computes a shortest path from `start` to `goal`, both included. An unreachable goal (or any
    /// other failure, see [try_search](Self::try_search)) gives an empty path.
    pub fn search(
        &self,
        grid: &Grid,
        start: impl Into<Point>,
        goal: impl Into<Point>,
    ) -> Vec<Cell> {
        match self.try_search(grid, start, goal) {
            Ok(path) => path,
            Err(err) => {
                info!("No path found: {}", err);
                Vec::new()
            }
        }
    }

    /// Like [search](Self::search) but reports why no path was found.
    pub fn try_search(
        &self,
        grid: &Grid,
        start: impl Into<Point>,
        goal: impl Into<Point>,
    ) -> Result<Vec<Cell>, SearchError> {
        let (start, goal) = (start.into(), goal.into());
        for endpoint in [start, goal] {
            if !grid.is_navigable(endpoint) {
                return Err(SearchError::InvalidEndpoint(endpoint));
            }
        }
        let mut origin = Cell::new(start, true);
        origin.g_cost = 0;
        origin.h_cost = 0;
        if start == goal {
            return Ok(vec![origin]);
        }
        if self.check_components && !grid.reachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return Err(SearchError::Unreachable { start, goal });
        }
        info!("Computing path from {} to {}", start, goal);

        let mut open =
            PriorityQueue::with_capacity(grid.width() + grid.height(), Cell::lower_f_cost);
        let mut closed: FxHashSet<Point> = FxHashSet::default();
        let mut arena: FxIndexMap<Point, Cell> = FxIndexMap::default();
        arena.insert(start, origin);
        open.insert(origin);

        let mut expansions = 0;
        while let Ok(current) = open.extract_min() {
            // A cell may be queued several times if a cheaper route to it turned up later; only
            // the first (cheapest) copy gets expanded.
            if !closed.insert(current.position) {
                continue;
            }
            expansions += 1;
            if let Some(limit) = self.max_expansions {
                if expansions > limit {
                    warn!(
                        "Search from {} to {} exceeded {} expansions",
                        start, goal, limit
                    );
                    return Err(SearchError::ExpansionLimit(limit));
                }
            }
            for mut successor in grid.neighbors(current.position) {
                if closed.contains(&successor.position) {
                    continue;
                }
                successor.g_cost =
                    current.g_cost + current.position.octile_distance(&successor.position);
                successor.h_cost = successor.position.octile_distance(&goal);
                if open.contains_with_priority_at_most(&successor, Cell::f_cost) {
                    continue;
                }
                successor.predecessor = Some(current.position);
                arena.insert(successor.position, successor);
                // The heuristic is exact between neighbours, so the first time the goal is
                // generated its cost is already optimal.
                if successor.position == goal {
                    debug!("Reached {} after {} expansions", goal, expansions);
                    return reverse_path(&arena, start, goal);
                }
                open.insert(successor);
            }
        }
        if self.check_components {
            warn!(
                "Reachable goal {} could not be pathed to from {}, are the components correct?",
                goal, start
            );
        }
        Err(SearchError::Unreachable { start, goal })
    }

    /// Total cost of walking `path` step by step.
    pub fn path_cost(&self, path: &[Cell]) -> i32 {
        path.iter()
            .tuple_windows()
            .map(|(a, b)| a.position.octile_distance(&b.position))
            .sum()
    }
}

/// Follows predecessors from `goal` back to `start` and returns the cells in walking order.
fn reverse_path(
    arena: &FxIndexMap<Point, Cell>,
    start: Point,
    goal: Point,
) -> Result<Vec<Cell>, SearchError> {
    let mut path = Vec::new();
    let mut next = Some(goal);
    while let Some(position) = next {
        let cell = *arena
            .get(&position)
            .ok_or(SearchError::BrokenChain(position))?;
        path.push(cell);
        if position == start {
            path.reverse();
            return Ok(path);
        }
        // A chain longer than the arena must contain a cycle.
        if path.len() > arena.len() {
            return Err(SearchError::BrokenChain(position));
        }
        next = cell.predecessor;
    }
    Err(SearchError::BrokenChain(
        path.last().map_or(goal, |cell| cell.position),
    ))
}
