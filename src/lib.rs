//! # treasure_path
//!
//! Shortest paths for a boat hunting treasure on a grid of sea (`.`) and islands (`+`). Paths are
//! found with [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over the 8-neighbourhood,
//! where straight steps cost [C] and diagonal steps cost [D], guided by the
//! [octile distance](Point::octile_distance). Connected components are pre-computed when a
//! [Grid] is loaded to avoid flood-filling behaviour if no path exists.
//!
//! ```
//! use treasure_path::{Grid, PathFinder};
//!
//! let grid = Grid::load(&["B.++", ".+..", "...T"]).unwrap();
//! let path = PathFinder::new().search(&grid, grid.boat(), grid.treasure());
//! assert_eq!(grid.render(Some(&path)), "B*++\n.+*.\n...T");
//! ```
pub mod cell;
pub mod grid;
pub mod pathfinder;
pub mod point;
pub mod priority_queue;

pub use cell::Cell;
pub use grid::{Grid, MalformedGridError, MoveOutcome};
pub use pathfinder::{PathFinder, SearchError, DEFAULT_MAX_EXPANSIONS};
pub use point::{Direction, ParseDirectionError, Point};
pub use priority_queue::{EmptyQueueError, PriorityQueue};

/// Cost of a cardinal (straight) move.
pub const C: i32 = 10;
/// Cost of a diagonal move, approximating C times the square root of two.
pub const D: i32 = 14;
/// Extra cost of two straight moves over one diagonal.
pub const E: i32 = 2 * C - D;
/// Cost of a cell no route has reached yet.
pub const UNREACHABLE: i32 = i32::MAX;

pub(crate) const N_SMALLVEC_SIZE: usize = 8;

/// Converts the integer cost to an approximate floating point equivalent where cardinal directions
/// have cost 1.0.
pub fn convert_cost_to_unit_cost_float(cost: i32) -> f64 {
    (cost as f64) / (C as f64)
}
