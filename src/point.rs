use core::fmt;
use std::ops::Add;
use std::str::FromStr;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{C, D, E, N_SMALLVEC_SIZE};

/// A position on the grid. `x` counts columns left to right, `y` counts rows top to bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// The 8 surrounding positions in [Direction] order. Bounds are not checked.
    pub fn moore_neighborhood(&self) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        Direction::ALL.iter().map(|&dir| *self + dir).collect()
    }

    /// Number of king moves between two points
    /// ([Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance)).
    pub fn move_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.move_distance(other) == 1
    }

    /// Uses C as cost for cardinal (straight) moves and D for diagonal moves. For adjacent points
    /// this is exactly the cost of the single step between them.
    pub fn octile_distance(&self, other: &Point) -> i32 {
        let delta_x = (self.x - other.x).abs();
        let delta_y = (self.y - other.y).abs();
        // Formula from https://github.com/riscy/a_star_on_grids
        // to efficiently compute the cost of a path taking the maximal amount
        // of diagonal steps before going straight
        (E * (delta_x - delta_y).abs() + D * (delta_x + delta_y)) / 2
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, dir: Direction) -> Point {
        let (dx, dy) = dir.offset();
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the 8 compass directions, numbered clockwise from north. Odd numbers are diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn num(&self) -> i32 {
        *self as i32
    }

    pub fn diagonal(&self) -> bool {
        self.num() % 2 == 1
    }

    /// Grid offset of a single step. North points towards row 0.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Cost of a single step in this direction.
    pub fn cost(&self) -> i32 {
        if self.diagonal() {
            D
        } else {
            C
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?}, expected one of N, NE, E, SE, S, SW, W, NW")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Direction, ParseDirectionError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Direction::North),
            "NE" | "NORTHEAST" => Ok(Direction::NorthEast),
            "E" | "EAST" => Ok(Direction::East),
            "SE" | "SOUTHEAST" => Ok(Direction::SouthEast),
            "S" | "SOUTH" => Ok(Direction::South),
            "SW" | "SOUTHWEST" => Ok(Direction::SouthWest),
            "W" | "WEST" => Ok(Direction::West),
            "NW" | "NORTHWEST" => Ok(Direction::NorthWest),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}
