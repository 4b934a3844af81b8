//! The incrementally steppable A* search. Each call to [SearchState::step] performs exactly one
//! expansion, so a driver can observe the open/closed tags of the [Grid] between calls.
//!
//! The open set is a [BinaryHeap] without decrease-key: improving a cell's cost pushes a new
//! entry and the outdated one is discarded when popped. A side table records the arrival number
//! of the live entry for each open cell.
use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::heuristic::{euclidean_distance, Euclidean, Heuristic};
use grid_util::point::Point;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Lifecycle of a search. [Found](Status::Found), [Unreachable](Status::Unreachable) and
/// [InvalidEndpoints](Status::InvalidEndpoints) are terminal until the next start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Running,
    Found,
    Unreachable,
    InvalidEndpoints,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Found | Status::Unreachable | Status::InvalidEndpoints
        )
    }
}

struct SmallestCostHolder {
    estimated_cost: f64,
    arrival: u64,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest estimate, then the earliest arrival
        other
            .estimated_cost
            .total_cmp(&self.estimated_cost)
            .then_with(|| other.arrival.cmp(&self.arrival))
    }
}

/// Frontier ordered by f-cost with ties broken by arrival order.
#[derive(Default)]
pub struct OpenSet {
    heap: BinaryHeap<SmallestCostHolder>,
    live: FxIndexMap<usize, u64>,
    arrivals: u64,
}

impl OpenSet {
    /// Inserts `index`, or re-keys it if it is already open.
    pub fn push(&mut self, index: usize, estimated_cost: f64) {
        let arrival = self.arrivals;
        self.arrivals += 1;
        self.live.insert(index, arrival);
        self.heap.push(SmallestCostHolder {
            estimated_cost,
            arrival,
            index,
        });
    }

    /// Removes and returns the open cell with the smallest key, skipping outdated entries.
    pub fn pop(&mut self) -> Option<usize> {
        while let Some(SmallestCostHolder { arrival, index, .. }) = self.heap.pop() {
            if self.live.get(&index) == Some(&arrival) {
                self.live.shift_remove(&index);
                return Some(index);
            }
        }
        None
    }

    pub fn contains(&self, index: usize) -> bool {
        self.live.contains_key(&index)
    }
    pub fn len(&self) -> usize {
        self.live.len()
    }
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
    /// Open cells in the order they were first discovered.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.live.keys().copied()
    }
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.arrivals = 0;
    }
}

/// Open and closed sets plus the status of one search over a [Grid].
///
/// The state does not own the grid: every call takes it by reference, so a renderer may read
/// the grid between steps. Between [start](Self::start) and a terminal status the caller must
/// not mutate the grid from elsewhere.
pub struct SearchState<H = Euclidean> {
    pub heuristic: H,
    /// Stepping a search that is not running returns [Error::NotRunning] instead of a no-op.
    pub strict: bool,
    status: Status,
    open: OpenSet,
    closed: FxIndexSet<usize>,
    endpoints: Option<(usize, usize)>,
    dimensions: (usize, usize),
    steps: usize,
}

impl Default for SearchState<Euclidean> {
    fn default() -> Self {
        SearchState::new(Euclidean)
    }
}

impl<H: Heuristic> SearchState<H> {
    pub fn new(heuristic: H) -> SearchState<H> {
        SearchState {
            heuristic,
            strict: false,
            status: Status::Idle,
            open: OpenSet::default(),
            closed: FxIndexSet::default(),
            endpoints: None,
            dimensions: (0, 0),
            steps: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }
    /// Number of expansions performed since the last start.
    pub fn steps(&self) -> usize {
        self.steps
    }
    pub fn start_index(&self) -> Option<usize> {
        self.endpoints.map(|(s, _)| s)
    }
    pub fn goal_index(&self) -> Option<usize> {
        self.endpoints.map(|(_, g)| g)
    }
    pub fn is_open(&self, ix: usize) -> bool {
        self.open.contains(ix)
    }
    pub fn is_closed(&self, ix: usize) -> bool {
        self.closed.contains(&ix)
    }
    pub fn open_len(&self) -> usize {
        self.open.len()
    }
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }
    pub fn open_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.open.iter()
    }
    /// Closed cells in expansion order.
    pub fn closed_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.closed.iter().copied()
    }
    /// Every cell the search has touched: open cells followed by closed ones.
    pub fn visited(&self) -> impl Iterator<Item = usize> + '_ {
        self.open_cells().chain(self.closed_cells())
    }

    fn reset(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.endpoints = None;
        self.steps = 0;
    }

    /// Begins a new search from `start` to `goal` and gives both cells their roles on the grid.
    ///
    /// Missing, equal or blocked endpoints end the search immediately with
    /// [Status::InvalidEndpoints]; coordinates outside the grid are an [Error::OutOfBounds].
    /// The grid is not cleared here, callers clear it first if a previous run left tags behind.
    pub fn start(
        &mut self,
        grid: &mut Grid,
        start: Option<Point>,
        goal: Option<Point>,
    ) -> Result<Status> {
        self.reset();
        self.status = Status::Idle;
        self.dimensions = (grid.width(), grid.height());
        let start_ix = start.map(|p| grid.get_ix_point(p)).transpose()?;
        let goal_ix = goal.map(|p| grid.get_ix_point(p)).transpose()?;
        let (start_ix, goal_ix) = match (start_ix, goal_ix) {
            (Some(s), Some(g))
                if s != g && !grid.cell(s).is_obstacle() && !grid.cell(g).is_obstacle() =>
            {
                (s, g)
            }
            _ => {
                info!("Invalid endpoints {:?} -> {:?}", start, goal);
                self.status = Status::InvalidEndpoints;
                return Ok(self.status);
            }
        };
        let start_point = grid.point(start_ix);
        let goal_point = grid.point(goal_ix);
        grid.set_start(start_point)?;
        grid.set_goal(goal_point)?;

        let h = self.heuristic.estimate(&start_point, &goal_point);
        let cell = grid.cell_mut(start_ix);
        cell.set_g_cost(0.0);
        cell.set_h_cost(h);
        self.open.push(start_ix, cell.f_cost());
        self.endpoints = Some((start_ix, goal_ix));
        self.status = Status::Running;
        info!("Searching from {} to {}", start_point, goal_point);
        Ok(self.status)
    }

    /// Starts a search between the start and goal cells designated on the grid.
    pub fn start_from_grid(&mut self, grid: &mut Grid) -> Result<Status> {
        let start = grid.start().map(|ix| grid.point(ix));
        let goal = grid.goal().map(|ix| grid.point(ix));
        self.start(grid, start, goal)
    }

    /// Stops a running search. The grid keeps whatever tags the search left on it.
    pub fn cancel(&mut self) {
        if self.status == Status::Running {
            info!("Search cancelled after {} steps", self.steps);
            self.status = Status::Idle;
        }
    }

    /// Performs one expansion and returns the resulting status.
    pub fn step(&mut self, grid: &mut Grid) -> Result<Status> {
        if self.status != Status::Running {
            if self.strict {
                return Err(Error::NotRunning(self.status));
            }
            warn!("Step requested while search is {:?}", self.status);
            return Ok(self.status);
        }
        if (grid.width(), grid.height()) != self.dimensions {
            return Err(Error::GridMismatch);
        }
        let Some((_, goal)) = self.endpoints else {
            return Err(Error::NotRunning(self.status));
        };

        // Cells turned into obstacles after being opened are dropped like outdated entries
        let current = loop {
            match self.open.pop() {
                Some(ix) if grid.cell(ix).is_obstacle() => continue,
                Some(ix) => break ix,
                None => {
                    info!("Open set exhausted after {} steps", self.steps);
                    self.status = Status::Unreachable;
                    return Ok(self.status);
                }
            }
        };
        self.steps += 1;

        if current == goal {
            info!("Goal reached after {} steps", self.steps);
            self.status = Status::Found;
            return Ok(self.status);
        }

        self.closed.insert(current);
        if !grid.cell(current).is_endpoint() {
            grid.cell_mut(current).mark_closed();
        }
        let current_point = grid.point(current);
        let current_g = grid.cell(current).g_cost();
        let goal_point = grid.point(goal);
        debug!(
            "Expanding {} (g = {}, f = {})",
            current_point,
            current_g,
            grid.cell(current).f_cost()
        );

        for neighbour in grid.neighbours(current) {
            if self.closed.contains(&neighbour) {
                continue;
            }
            let neighbour_point = grid.point(neighbour);
            let tentative_g = current_g + euclidean_distance(&current_point, &neighbour_point);
            if tentative_g < grid.cell(neighbour).g_cost() || !self.open.contains(neighbour) {
                if let Err(e) = grid.set_parent(neighbour, current) {
                    error!("Corrupted parent chain while expanding {}: {}", current_point, e);
                    return Err(e);
                }
                let h = self.heuristic.estimate(&neighbour_point, &goal_point);
                let cell = grid.cell_mut(neighbour);
                cell.set_g_cost(tentative_g);
                cell.set_h_cost(h);
                self.open.push(neighbour, cell.f_cost());
                if !cell.is_endpoint() {
                    cell.mark_open();
                }
            }
        }

        if self.open.is_empty() {
            info!("Open set exhausted after {} steps", self.steps);
            self.status = Status::Unreachable;
        }
        Ok(self.status)
    }

    /// Steps until the search reaches a terminal status.
    pub fn run(&mut self, grid: &mut Grid) -> Result<Status> {
        while self.status == Status::Running {
            self.step(grid)?;
        }
        Ok(self.status)
    }

    /// Performs at most `max_steps` expansions. The search may still be running afterwards.
    pub fn run_for(&mut self, grid: &mut Grid, max_steps: usize) -> Result<Status> {
        for _ in 0..max_steps {
            if self.status != Status::Running {
                break;
            }
            self.step(grid)?;
        }
        Ok(self.status)
    }
}
