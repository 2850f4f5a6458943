use core::fmt;
use std::hash::{Hash, Hasher};

use crate::point::Point;
use crate::UNREACHABLE;

/// A grid position together with the scratch values of one search episode.
///
/// Identity is the position alone: two cells compare equal when their coordinates match, whatever
/// their costs. The predecessor is only a back-reference by coordinate; the search resolves it
/// through its own cell arena when retracing a path.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub position: Point,
    pub navigable: bool,
    /// Cost of the cheapest known route from the start.
    pub g_cost: i32,
    /// Heuristic estimate of the remaining cost to the goal.
    pub h_cost: i32,
    pub predecessor: Option<Point>,
}

impl Cell {
    pub fn new(position: Point, navigable: bool) -> Cell {
        Cell {
            position,
            navigable,
            g_cost: UNREACHABLE,
            h_cost: UNREACHABLE,
            predecessor: None,
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Saturates at [UNREACHABLE] so unvisited cells never overflow.
    pub fn f_cost(&self) -> i32 {
        self.g_cost.saturating_add(self.h_cost)
    }

    /// Ordering used for the open set: a lower f-cost is expanded first.
    pub fn lower_f_cost(a: &Cell, b: &Cell) -> bool {
        a.f_cost() < b.f_cost()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

impl From<Cell> for Point {
    fn from(cell: Cell) -> Point {
        cell.position
    }
}

impl From<&Cell> for Point {
    fn from(cell: &Cell) -> Point {
        cell.position
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(if self.navigable { "." } else { "+" })
    }
}
