use core::hash::{Hash, Hasher};
use grid_util::point::Point;

/// The presentation tag a renderer reads to draw a cell. Only the obstacle flag and the
/// search bookkeeping in [SearchState](crate::search::SearchState) take part in the algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Blank,
    Obstacle,
    Start,
    Goal,
    Open,
    Closed,
    Path,
}

impl Tag {
    /// Character used by the ASCII rendering of a [Grid](crate::grid::Grid).
    pub fn symbol(self) -> char {
        match self {
            Tag::Blank => '.',
            Tag::Obstacle => '#',
            Tag::Start => 'S',
            Tag::Goal => 'G',
            Tag::Open => 'o',
            Tag::Closed => 'x',
            Tag::Path => '*',
        }
    }
}

/// A single grid position together with its search metadata. Cells live in the arena owned by
/// [Grid](crate::grid::Grid); the parent link is a flat index into that arena.
///
/// Two cells compare equal when their coordinates match, regardless of costs or tag.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    point: Point,
    obstacle: bool,
    tag: Tag,
    g_cost: f64,
    h_cost: f64,
    f_cost: f64,
    parent: Option<usize>,
}

impl Cell {
    pub fn new(point: Point) -> Cell {
        Cell {
            point,
            obstacle: false,
            tag: Tag::Blank,
            g_cost: f64::INFINITY,
            h_cost: 0.0,
            f_cost: f64::INFINITY,
            parent: None,
        }
    }
    pub fn point(&self) -> Point {
        self.point
    }
    pub fn x(&self) -> i32 {
        self.point.x
    }
    pub fn y(&self) -> i32 {
        self.point.y
    }
    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }
    pub fn tag(&self) -> Tag {
        self.tag
    }
    /// Whether the cell currently carries an endpoint role.
    pub fn is_endpoint(&self) -> bool {
        matches!(self.tag, Tag::Start | Tag::Goal)
    }
    pub fn g_cost(&self) -> f64 {
        self.g_cost
    }
    pub fn h_cost(&self) -> f64 {
        self.h_cost
    }
    /// Always `g + h`; there is no setter.
    pub fn f_cost(&self) -> f64 {
        self.f_cost
    }
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn set_g_cost(&mut self, g_cost: f64) {
        self.g_cost = g_cost;
        self.update_f_cost();
    }
    pub fn set_h_cost(&mut self, h_cost: f64) {
        self.h_cost = h_cost;
        self.update_f_cost();
    }
    fn update_f_cost(&mut self) {
        self.f_cost = self.g_cost + self.h_cost;
    }

    /// Assigns the parent without checking the chain. Cycle checks need the whole arena and
    /// are done by [Grid::set_parent](crate::grid::Grid::set_parent).
    pub(crate) fn link_parent(&mut self, parent: Option<usize>) {
        self.parent = parent;
    }

    pub fn mark_open(&mut self) {
        self.tag = Tag::Open;
    }
    pub fn mark_closed(&mut self) {
        self.tag = Tag::Closed;
    }
    pub fn mark_path(&mut self) {
        self.tag = Tag::Path;
    }
    pub fn mark_blank(&mut self) {
        self.tag = Tag::Blank;
        self.parent = None;
    }
    pub fn mark_start(&mut self) {
        self.tag = Tag::Start;
        self.parent = None;
    }
    pub fn mark_goal(&mut self) {
        self.tag = Tag::Goal;
        self.parent = None;
    }

    /// Sets the obstacle flag and drops any stale search metadata.
    pub(crate) fn set_obstacle(&mut self, obstacle: bool) {
        self.obstacle = obstacle;
        self.reset_costs();
        if obstacle {
            self.tag = Tag::Obstacle;
            self.parent = None;
        } else {
            self.mark_blank();
        }
    }

    fn reset_costs(&mut self) {
        self.g_cost = f64::INFINITY;
        self.h_cost = 0.0;
        self.update_f_cost();
    }

    /// Returns costs and parent to their initial values. Obstacles stay obstacles and endpoint
    /// roles keep their tag; every other tag reverts to blank.
    pub fn reset_search(&mut self) {
        self.reset_costs();
        self.parent = None;
        self.tag = match self.tag {
            _ if self.obstacle => Tag::Obstacle,
            Tag::Start => Tag::Start,
            Tag::Goal => Tag::Goal,
            _ => Tag::Blank,
        };
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.point.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_cost_follows_g_and_h() {
        let mut cell = Cell::new(Point::new(2, 3));
        assert!(cell.f_cost().is_infinite());
        cell.set_g_cost(4.0);
        cell.set_h_cost(1.5);
        assert_eq!(cell.f_cost(), 5.5);
        cell.set_g_cost(1.0);
        assert_eq!(cell.f_cost(), 2.5);
    }

    #[test]
    fn equality_ignores_costs() {
        let mut a = Cell::new(Point::new(1, 1));
        let b = Cell::new(Point::new(1, 1));
        a.set_g_cost(3.0);
        a.mark_closed();
        assert_eq!(a, b);
        assert_ne!(a, Cell::new(Point::new(1, 2)));
    }

    #[test]
    fn role_marks_drop_parent() {
        let mut cell = Cell::new(Point::new(0, 0));
        cell.link_parent(Some(3));
        cell.mark_open();
        assert_eq!(cell.parent(), Some(3));
        cell.mark_start();
        assert_eq!(cell.parent(), None);
        cell.link_parent(Some(3));
        cell.mark_goal();
        assert_eq!(cell.parent(), None);
    }

    #[test]
    fn reset_keeps_roles_and_obstacles() {
        let mut start = Cell::new(Point::new(0, 0));
        start.mark_start();
        start.set_g_cost(0.0);
        start.reset_search();
        assert_eq!(start.tag(), Tag::Start);
        assert!(start.g_cost().is_infinite());

        let mut wall = Cell::new(Point::new(1, 0));
        wall.set_obstacle(true);
        wall.reset_search();
        assert_eq!(wall.tag(), Tag::Obstacle);

        let mut open = Cell::new(Point::new(2, 0));
        open.mark_open();
        open.reset_search();
        assert_eq!(open.tag(), Tag::Blank);
    }
}
