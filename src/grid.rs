use core::fmt;
use std::str::FromStr;

use fxhash::FxHashSet;
use itertools::Itertools;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cell::Cell;
use crate::point::{Direction, Point};
use crate::N_SMALLVEC_SIZE;

pub const NAVIGABLE: char = '.';
pub const OBSTACLE: char = '+';
pub const BOAT: char = 'B';
pub const TREASURE: char = 'T';
pub const PATH: char = '*';

/// Reasons a character map cannot be turned into a [Grid].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedGridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
    #[error("expected exactly one boat, found {0}")]
    BoatCount(usize),
    #[error("expected exactly one treasure, found {0}")]
    TreasureCount(usize),
}

/// Result of trying to move the boat a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Point),
    /// The boat moved onto the treasure.
    FoundTreasure(Point),
    /// Out of bounds or an obstacle; the boat stays put.
    Blocked,
}

/// The map searched by [PathFinder](crate::PathFinder): a rectangle of navigable sea and obstacle
/// islands holding a boat and a treasure. Navigability is fixed once loaded, so connected
/// components are computed up front with a [UnionFind] and never go stale.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    navigable: Vec<bool>,
    boat: Point,
    treasure: Point,
    components: UnionFind<usize>,
}

impl Grid {
    /// Parses a rectangular character map, one string per row. See the module constants for the
    /// symbols.
    pub fn load<S: AsRef<str>>(rows: &[S]) -> Result<Grid, MalformedGridError> {
        let first = rows.first().ok_or(MalformedGridError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MalformedGridError::Empty);
        }
        let height = rows.len();
        let mut navigable = Vec::with_capacity(width * height);
        let mut boats = Vec::new();
        let mut treasures = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MalformedGridError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let point = Point::new(x as i32, y as i32);
                let open = match symbol {
                    NAVIGABLE => true,
                    OBSTACLE => false,
                    BOAT => {
                        boats.push(point);
                        true
                    }
                    TREASURE => {
                        treasures.push(point);
                        true
                    }
                    symbol => return Err(MalformedGridError::UnknownSymbol { symbol, x, y }),
                };
                navigable.push(open);
            }
        }
        let boat = match boats.as_slice() {
            [boat] => *boat,
            _ => return Err(MalformedGridError::BoatCount(boats.len())),
        };
        let treasure = match treasures.as_slice() {
            [treasure] => *treasure,
            _ => return Err(MalformedGridError::TreasureCount(treasures.len())),
        };
        let mut grid = Grid {
            width,
            height,
            navigable,
            boat,
            treasure,
            components: UnionFind::new(width * height),
        };
        grid.generate_components();
        debug!(
            "Loaded {}x{} grid with boat at {} and treasure at {}",
            width, height, boat, treasure
        );
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn boat(&self) -> Cell {
        Cell::new(self.boat, true)
    }

    pub fn treasure(&self) -> Cell {
        Cell::new(self.treasure, true)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    fn get_ix_point(&self, point: &Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }

    pub fn is_navigable(&self, point: Point) -> bool {
        self.in_bounds(point) && self.navigable[self.get_ix_point(&point)]
    }

    /// A fresh cell for `point`, or [None] outside the grid.
    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.in_bounds(point)
            .then(|| Cell::new(point, self.navigable[self.get_ix_point(&point)]))
    }

    /// The navigable cells among the 8 positions around `point`. Diagonal steps may pass between
    /// two obstacles.
    pub fn neighbors(&self, point: Point) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        point
            .moore_neighborhood()
            .into_iter()
            .filter(|p| self.is_navigable(*p))
            .map(|p| Cell::new(p, true))
            .collect()
    }

    /// Moves the boat one step. Moving onto the treasure reports [MoveOutcome::FoundTreasure],
    /// anything off the map or onto an obstacle leaves the boat where it is.
    pub fn move_boat(&mut self, direction: Direction) -> MoveOutcome {
        let target = self.boat + direction;
        if !self.is_navigable(target) {
            debug!("Boat cannot move {:?} from {}", direction, self.boat);
            return MoveOutcome::Blocked;
        }
        self.boat = target;
        if target == self.treasure {
            info!("Boat reached the treasure at {}", target);
            MoveOutcome::FoundTreasure(target)
        } else {
            MoveOutcome::Moved(target)
        }
    }

    /// The treasure cell if it lies within `range` (octile distance) of the boat.
    pub fn treasure_within(&self, range: i32) -> Option<Cell> {
        (self.boat.octile_distance(&self.treasure) <= range).then(|| self.treasure())
    }

    /// Checks if start and goal are navigable and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.is_navigable(*start)
            && self.is_navigable(*goal)
            && self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
    }

    /// Retrieves the component id a given navigable [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.is_navigable(*point)
            .then(|| self.components.find(self.get_ix_point(point)))
    }

    /// Links up navigable 8-neighbours into the same components. Only the forward half of the
    /// neighbourhood is visited since union is symmetric.
    fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let point = Point::new(x, y);
                if !self.is_navigable(point) {
                    continue;
                }
                let parent_ix = self.get_ix_point(&point);
                for p in [
                    Point::new(x, y + 1),
                    Point::new(x + 1, y - 1),
                    Point::new(x + 1, y),
                    Point::new(x + 1, y + 1),
                ] {
                    if self.is_navigable(p) {
                        let ix = self.get_ix_point(&p);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }

    fn symbol(&self, point: Point, path: &FxHashSet<Point>) -> char {
        if point == self.boat {
            BOAT
        } else if point == self.treasure {
            TREASURE
        } else if !self.navigable[self.get_ix_point(&point)] {
            OBSTACLE
        } else if path.contains(&point) {
            PATH
        } else {
            NAVIGABLE
        }
    }

    /// Draws the map row by row, marking cells of `path` other than the boat and treasure with
    /// `*`. Rows are joined by newlines, without a trailing one.
    pub fn render(&self, path: Option<&[Cell]>) -> String {
        let on_path = path
            .into_iter()
            .flatten()
            .map(|cell| cell.position)
            .collect::<FxHashSet<Point>>();
        (0..self.height as i32)
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| self.symbol(Point::new(x, y), &on_path))
                    .collect::<String>()
            })
            .join("\n")
    }
}

impl FromStr for Grid {
    type Err = MalformedGridError;

    fn from_str(s: &str) -> Result<Grid, MalformedGridError> {
        Grid::load(&s.lines().collect::<Vec<&str>>())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 5] = ["..+..++", "++.B..+", ".....++", "++.....", ".T....+"];

    #[test]
    fn load_dimensions_and_markers() {
        let grid = Grid::load(&ROWS).unwrap();
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.boat(), Cell::new(Point::new(3, 1), true));
        assert_eq!(grid.treasure().position, Point::new(1, 4));
        let corner = grid.cell(Point::new(6, 4)).unwrap();
        assert!(!corner.navigable);
        assert!(grid.cell(Point::new(7, 0)).is_none());
    }

    #[test]
    fn malformed_grids() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::load(&empty).unwrap_err(), MalformedGridError::Empty);
        assert_eq!(Grid::load(&[""]).unwrap_err(), MalformedGridError::Empty);
        assert_eq!(
            Grid::load(&["B..", ".T"]).unwrap_err(),
            MalformedGridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            Grid::load(&["B.#", "..T"]).unwrap_err(),
            MalformedGridError::UnknownSymbol {
                symbol: '#',
                x: 2,
                y: 0
            }
        );
        assert_eq!(
            Grid::load(&["B.B", "..T"]).unwrap_err(),
            MalformedGridError::BoatCount(2)
        );
        assert_eq!(
            Grid::load(&["...", "..T"]).unwrap_err(),
            MalformedGridError::BoatCount(0)
        );
        assert_eq!(
            Grid::load(&["B..", "..."]).unwrap_err(),
            MalformedGridError::TreasureCount(0)
        );
    }

    #[test]
    fn render_round_trips_layout() {
        let grid = Grid::load(&ROWS).unwrap();
        assert_eq!(grid.render(None), ROWS.join("\n"));
        assert_eq!(grid.to_string(), ROWS.join("\n"));
        let parsed: Grid = ROWS.join("\n").parse().unwrap();
        assert_eq!(parsed.render(None), grid.render(None));
    }

    #[test]
    fn render_marks_path_but_not_endpoints() {
        let grid = Grid::load(&["B.++", ".+..", "...T"]).unwrap();
        let path = [(0, 0), (1, 0), (2, 1), (3, 2)]
            .into_iter()
            .map(|(x, y)| Cell::new(Point::new(x, y), true))
            .collect::<Vec<_>>();
        assert_eq!(grid.render(Some(&path)), "B*++\n.+*.\n...T");
    }

    #[test]
    fn neighbors_skip_obstacles_and_edges() {
        let grid = Grid::load(&ROWS).unwrap();
        let corner = grid.neighbors(Point::new(0, 0));
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].position, Point::new(1, 0));
        // Boat at (3, 1) sees everything but the island at (2, 0)
        let around_boat = grid.neighbors(Point::new(3, 1));
        assert_eq!(around_boat.len(), 7);
        assert!(around_boat.iter().all(|c| c.navigable));
        assert!(!around_boat.contains(&Cell::new(Point::new(2, 0), false)));
    }

    #[test]
    fn components_follow_diagonals() {
        //  ___
        // |.+.|
        // |+.+|
        // |B+T|
        //  ___
        let grid = Grid::load(&[".+.", "+.+", "B+T"]).unwrap();
        let boat = grid.boat().position;
        assert!(grid.reachable(&boat, &grid.treasure().position));
        assert!(grid.reachable(&boat, &Point::new(2, 0)));
        assert!(!grid.reachable(&boat, &Point::new(1, 0)));
        assert_eq!(grid.get_component(&Point::new(1, 0)), None);

        let split = Grid::load(&["B+.", "++.", "..T"]).unwrap();
        assert!(!split.reachable(&split.boat().position, &split.treasure().position));
        assert_ne!(
            split.get_component(&Point::new(0, 0)),
            split.get_component(&Point::new(2, 2))
        );
    }

    #[test]
    fn boat_moves() {
        let mut grid = Grid::load(&["B.+", "+.T"]).unwrap();
        assert_eq!(grid.move_boat(Direction::South), MoveOutcome::Blocked);
        assert_eq!(grid.move_boat(Direction::North), MoveOutcome::Blocked);
        assert_eq!(
            grid.move_boat(Direction::SouthEast),
            MoveOutcome::Moved(Point::new(1, 1))
        );
        assert_eq!(grid.render(None), "..+\n+BT");
        assert_eq!(
            grid.move_boat(Direction::East),
            MoveOutcome::FoundTreasure(Point::new(2, 1))
        );
    }

    #[test]
    fn treasure_range() {
        let grid = Grid::load(&ROWS).unwrap();
        // Boat (3, 1) to treasure (1, 4) is two diagonals and one straight step
        assert_eq!(grid.treasure_within(37), None);
        assert_eq!(grid.treasure_within(38), Some(grid.treasure()));
    }
}
