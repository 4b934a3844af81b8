//! # grid_astar_stepper
//!
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a 4-connected grid with
//! obstacles, exposed as a process that advances by exactly one expansion per call. A renderer
//! can read the cell [Tag]s between steps to show the open and closed sets growing, or the
//! search can be run to completion in a tight loop.
//!
//! ```
//! use grid_astar_stepper::{Grid, PathExtractor, SearchState, Status};
//! use grid_util::point::Point;
//!
//! let mut grid = Grid::new(5, 5);
//! let mut search: SearchState = SearchState::default();
//! search
//!     .start(&mut grid, Some(Point::new(0, 0)), Some(Point::new(4, 4)))
//!     .unwrap();
//! while search.step(&mut grid).unwrap() == Status::Running {}
//! let goal = grid.goal().unwrap();
//! let path = PathExtractor::reconstruct(&grid, goal).unwrap();
//! assert_eq!(path.len(), 9);
//! ```
pub mod cell;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod path;
pub mod search;

pub use cell::{Cell, Tag};
pub use error::{Error, Result};
pub use grid::Grid;
pub use heuristic::{Dijkstra, Euclidean, Heuristic, Manhattan};
pub use path::{find_path, PathExtractor};
pub use search::{SearchState, Status};

/// Width of [Grid::default].
pub const DEFAULT_GRID_WIDTH: usize = 30;
/// Height of [Grid::default].
pub const DEFAULT_GRID_HEIGHT: usize = 30;
/// Pause between steps used by the visual drivers.
pub const DEFAULT_STEP_DELAY_MS: u64 = 10;
