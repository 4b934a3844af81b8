use grid_util::point::Point;

/// Euclidean length of the segment between two points. Used both as the step cost between
/// adjacent cells and as the default heuristic.
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f64 {
    let dx = (p1.x - p2.x) as f64;
    let dy = (p1.y - p2.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Estimate of the remaining distance to the goal. Implementations must be admissible and
/// consistent for unit-cost 4-connected moves, otherwise closed cells would not be final.
pub trait Heuristic {
    fn estimate(&self, from: &Point, goal: &Point) -> f64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    fn estimate(&self, from: &Point, goal: &Point) -> f64 {
        euclidean_distance(from, goal)
    }
}

/// Tightest admissible estimate on a 4-connected grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, from: &Point, goal: &Point) -> f64 {
        ((from.x - goal.x).abs() + (from.y - goal.y).abs()) as f64
    }
}

/// Zero estimate, turning the search into Dijkstra's algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra;

impl Heuristic for Dijkstra {
    fn estimate(&self, _: &Point, _: &Point) -> f64 {
        0.0
    }
}
