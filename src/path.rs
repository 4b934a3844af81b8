use grid_util::point::Point;
use log::warn;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::heuristic::{euclidean_distance, Heuristic};
use crate::search::{SearchState, Status};

/// Turns the parent links left behind by a finished search into a route.
pub struct PathExtractor;

impl PathExtractor {
    /// Follows parent links from `goal` back to the grid's start cell and returns the route
    /// from start to goal, both endpoints included.
    ///
    /// Fails with [Error::NoPath] if the chain ends anywhere other than the designated start.
    pub fn reconstruct(grid: &Grid, goal: usize) -> Result<Vec<Point>> {
        let start = grid.start().ok_or(Error::NoPath)?;
        let mut chain = grid.ancestors(goal).collect::<Vec<usize>>();
        let root = chain.last().copied();
        if root != Some(start) || grid.cell(start).parent().is_some() {
            warn!(
                "Parent chain from {} ends at {:?} instead of the start",
                grid.point(goal),
                root.map(|ix| grid.point(ix))
            );
            return Err(Error::NoPath);
        }
        chain.reverse();
        Ok(chain.into_iter().map(|ix| grid.point(ix)).collect())
    }

    /// The path without its endpoints.
    pub fn interior(path: &[Point]) -> &[Point] {
        if path.len() <= 2 {
            &[]
        } else {
            &path[1..path.len() - 1]
        }
    }

    /// Tags the interior cells of `path` as [Path](crate::cell::Tag::Path).
    pub fn mark_path(grid: &mut Grid, path: &[Point]) -> Result<()> {
        for &p in Self::interior(path) {
            let ix = grid.get_ix_point(p)?;
            grid.cell_mut(ix).mark_path();
        }
        Ok(())
    }

    /// Total length of the path, summing the Euclidean distance of consecutive points.
    pub fn path_cost(path: &[Point]) -> f64 {
        path.windows(2)
            .map(|w| euclidean_distance(&w[0], &w[1]))
            .sum()
    }
}

/// Runs a whole search without intermediate observation. Returns `Ok(None)` when the goal is
/// unreachable or the endpoints are invalid.
pub fn find_path<H: Heuristic>(
    search: &mut SearchState<H>,
    grid: &mut Grid,
    start: Point,
    goal: Point,
) -> Result<Option<Vec<Point>>> {
    search.start(grid, Some(start), Some(goal))?;
    match search.run(grid)? {
        Status::Found => {
            let goal_ix = grid.get_ix_point(goal)?;
            PathExtractor::reconstruct(grid, goal_ix).map(Some)
        }
        _ => Ok(None),
    }
}
