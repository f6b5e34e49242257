//! # grid_astar
//!
//! Incremental [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on square,
//! 4-connected grids with unit step cost. The search reports every expansion to an
//! observer callback, so a host such as a renderer can follow the search as it unfolds
//! and cancel it cooperatively.
//!
//! A [Grid] stores the blocked state of each cell together with a precomputed adjacency
//! list. Adjacency is refreshed explicitly with [Grid::refresh_adjacency] after editing,
//! which also regenerates the
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) used by
//! [Grid::reachable].
//!
//! ```
//! use grid_astar::{AStarEngine, Grid, Pos};
//!
//! let mut grid = Grid::new(3);
//! grid.set_blocked(Pos::new(1, 1), true).unwrap();
//! grid.refresh_adjacency();
//! let result = AStarEngine::new()
//!     .search(&grid, Pos::new(0, 0), Pos::new(2, 2), |_, _| true)
//!     .unwrap();
//! assert!(result.found());
//! assert_eq!(result.path.len(), 4);
//! ```
pub mod astar;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod heuristic;
pub mod trace;

use core::fmt;

use grid_util::Point;

pub use astar::{reconstruct_path, AStarEngine, ExpansionEvent, SearchOutcome, SearchResult};
pub use error::{EndpointIssue, GridError, GridResult};
pub use frontier::Frontier;
pub use grid::{Cell, Grid};
pub use heuristic::{Heuristic, Manhattan, Weighted};
pub use trace::{CellRole, SearchTrace};

/// Cost of a single axis-aligned step.
pub const STEP_COST: u32 = 1;

/// Cost assigned to cells that have not been reached.
pub const INFINITE_COST: u32 = u32::MAX;

/// Row/column coordinate of a grid cell, a thin wrapper over [Point] with `x` as column and
/// `y` as row. Coordinates are signed so that positions just outside the grid can be
/// represented and rejected with [GridError::OutOfBounds].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Pos {
        Pos { row, col }
    }

    pub fn point(&self) -> Point {
        Point::new(self.col, self.row)
    }

    /// The four axis-aligned neighbours, in [Point]'s von Neumann order.
    pub fn neumann_neighborhood(&self) -> impl Iterator<Item = Pos> {
        self.point()
            .neumann_neighborhood_smallvec()
            .into_iter()
            .map(Pos::from)
    }

    pub fn manhattan_distance(&self, other: &Pos) -> u32 {
        self.point().manhattan_distance(&other.point()) as u32
    }

    /// True if `other` is exactly one axis-aligned step away.
    pub fn is_adjacent(&self, other: &Pos) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<Point> for Pos {
    fn from(p: Point) -> Pos {
        Pos::new(p.y, p.x)
    }
}

impl From<Pos> for Point {
    fn from(pos: Pos) -> Point {
        pos.point()
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((row, col): (i32, i32)) -> Pos {
        Pos::new(row, col)
    }
}
