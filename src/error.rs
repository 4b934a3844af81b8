//! Error types for grid access and search stepping.

use thiserror::Error;

use crate::search::Status;

/// Failures surfaced by the grid and the stepper. Terminal search outcomes such as
/// [Status::InvalidEndpoints] and [Status::Unreachable] are statuses, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Assigning `candidate` as parent of `cell` would close a loop in the parent chain.
    #[error("assigning parent {candidate} to cell {cell} would create a cycle")]
    CycleDetected { cell: usize, candidate: usize },

    #[error("parent chain does not lead from the goal back to the start")]
    NoPath,

    #[error("search is not running (status: {0:?})")]
    NotRunning(Status),

    #[error("grid dimensions changed since the search was started")]
    GridMismatch,

    #[error("could not parse grid: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
