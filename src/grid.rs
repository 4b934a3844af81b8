use crate::cell::{Cell, Tag};
use crate::error::{Error, Result};
use crate::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use core::fmt;
use core::str::FromStr;
use grid_util::grid::{Grid as _, SimpleGrid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::Rng;

/// Offsets in the order neighbours are enumerated: west, east, north, south. Equal f-costs are
/// broken by arrival order in the open set, so this order fixes the expansion trace.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A fixed-size field of [Cell]s kept in a row-wise [SimpleGrid], so the flat index of a cell
/// is `y * width + x`.
///
/// Besides the cells, [Grid] tracks which cells carry the start and goal roles and maintains
/// connected components in a [UnionFind] so reachability can be queried without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: SimpleGrid<Cell>,
    start: Option<usize>,
    goal: Option<usize>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

impl Grid {
    /// Creates a grid without obstacles or endpoints.
    ///
    /// # Panics
    /// Panics when either dimension exceeds [i32::MAX], since cell coordinates are [i32].
    pub fn new(width: usize, height: usize) -> Grid {
        let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => panic!("grid of {}x{} exceeds the coordinate range", width, height),
        };
        let mut cells = SimpleGrid::new(width, height, Cell::new(Point::new(0, 0)));
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(x, y);
                cells.set_point(p, Cell::new(p));
            }
        }
        let mut grid = Grid {
            cells,
            start: None,
            goal: None,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }
    pub fn width(&self) -> usize {
        self.cells.width()
    }
    pub fn height(&self) -> usize {
        self.cells.height()
    }
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.values.is_empty()
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.cells.point_in_bounds(Point::new(x, y))
    }
    pub fn point_in_bounds(&self, point: Point) -> bool {
        self.cells.point_in_bounds(point)
    }
    pub fn get_ix(&self, x: i32, y: i32) -> Result<usize> {
        self.get_ix_point(Point::new(x, y))
    }
    pub fn get_ix_point(&self, point: Point) -> Result<usize> {
        if self.cells.point_in_bounds(point) {
            Ok(self.cells.get_ix_point(&point))
        } else {
            Err(Error::OutOfBounds {
                x: point.x,
                y: point.y,
                width: self.width(),
                height: self.height(),
            })
        }
    }
    /// Inverse of [get_ix](Self::get_ix).
    ///
    /// # Panics
    /// Panics when `ix >= self.len()`.
    pub fn point(&self, ix: usize) -> Point {
        self.cells.values[ix].point()
    }
    pub fn get(&self, x: i32, y: i32) -> Result<&Cell> {
        self.get_ix(x, y).map(|ix| &self.cells.values[ix])
    }
    pub fn get_point(&self, point: Point) -> Result<&Cell> {
        self.get_ix_point(point).map(|ix| &self.cells.values[ix])
    }
    /// Cell at a flat index.
    ///
    /// # Panics
    /// Panics when `ix >= self.len()`.
    pub fn cell(&self, ix: usize) -> &Cell {
        &self.cells.values[ix]
    }
    pub(crate) fn cell_mut(&mut self, ix: usize) -> &mut Cell {
        &mut self.cells.values[ix]
    }
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values.iter()
    }
    /// Cells currently carrying `tag`, in index order.
    pub fn cells_tagged(&self, tag: Tag) -> impl Iterator<Item = &Cell> {
        self.cells.values.iter().filter(move |c| c.tag() == tag)
    }
    pub fn start(&self) -> Option<usize> {
        self.start
    }
    pub fn goal(&self) -> Option<usize> {
        self.goal
    }
    fn is_role(&self, ix: usize) -> bool {
        self.start == Some(ix) || self.goal == Some(ix)
    }

    /// Up to four in-bounds, non-obstacle neighbours of `ix` in west, east, north, south order.
    ///
    /// # Panics
    /// Panics when `ix >= self.len()`.
    pub fn neighbours(&self, ix: usize) -> Vec<usize> {
        let p = self.point(ix);
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| self.get_ix(p.x + dx, p.y + dy).ok())
            .filter(|&n| !self.cells.values[n].is_obstacle())
            .collect()
    }

    /// Gives `point` the start role. Returns `Ok(false)` without changes if it is an obstacle.
    /// The previous start cell is blanked; if `point` held the goal role, the goal is dropped.
    pub fn set_start(&mut self, point: Point) -> Result<bool> {
        let ix = self.get_ix_point(point)?;
        if self.cells.values[ix].is_obstacle() {
            return Ok(false);
        }
        if let Some(prev) = self.start.filter(|&prev| prev != ix) {
            self.cells.values[prev].mark_blank();
        }
        if self.goal == Some(ix) {
            self.goal = None;
        }
        self.start = Some(ix);
        self.cells.values[ix].mark_start();
        Ok(true)
    }

    /// Gives `point` the goal role, with the same rules as [set_start](Self::set_start).
    pub fn set_goal(&mut self, point: Point) -> Result<bool> {
        let ix = self.get_ix_point(point)?;
        if self.cells.values[ix].is_obstacle() {
            return Ok(false);
        }
        if let Some(prev) = self.goal.filter(|&prev| prev != ix) {
            self.cells.values[prev].mark_blank();
        }
        if self.start == Some(ix) {
            self.start = None;
        }
        self.goal = Some(ix);
        self.cells.values[ix].mark_goal();
        Ok(true)
    }

    pub fn clear_start(&mut self) {
        if let Some(ix) = self.start.take() {
            self.cells.values[ix].mark_blank();
        }
    }

    pub fn clear_goal(&mut self) {
        if let Some(ix) = self.goal.take() {
            self.cells.values[ix].mark_blank();
        }
    }

    /// Sets or removes an obstacle and drops the cell's search metadata. The start and goal
    /// cells are never turned into obstacles. Returns whether the obstacle flag changed; a
    /// cell that already has the requested flag is left untouched.
    ///
    /// Joins newly connected components when an obstacle is removed and flags the components
    /// as dirty when one is placed, since that may split a component.
    pub fn set_obstacle(&mut self, point: Point, obstacle: bool) -> Result<bool> {
        let ix = self.get_ix_point(point)?;
        if self.is_role(ix) {
            return Ok(false);
        }
        if self.cell(ix).is_obstacle() == obstacle {
            return Ok(false);
        }
        self.cell_mut(ix).set_obstacle(obstacle);
        if obstacle {
            self.components_dirty = true;
        } else {
            for n in self.neighbours(ix) {
                self.components.union(ix, n);
            }
        }
        Ok(true)
    }

    /// Places up to `count` obstacles on randomly chosen blank cells, skipping the endpoints.
    /// Returns how many were placed, which is less than `count` only when the grid runs out of
    /// free cells.
    pub fn add_random_obstacles<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let free = (0..self.len())
            .filter(|&ix| !self.cells.values[ix].is_obstacle() && !self.is_role(ix))
            .collect::<Vec<usize>>();
        let chosen = free
            .choose_multiple(rng, count)
            .copied()
            .collect::<Vec<usize>>();
        for &ix in &chosen {
            self.cells.values[ix].set_obstacle(true);
        }
        if !chosen.is_empty() {
            self.components_dirty = true;
        }
        chosen.len()
    }

    /// Resets tag, parent and costs of every cell. Obstacles and the endpoint roles are kept.
    pub fn clear(&mut self) {
        for cell in &mut self.cells.values {
            cell.reset_search();
        }
    }

    /// Like [clear](Self::clear), but also removes every obstacle.
    pub fn reset(&mut self) {
        for cell in &mut self.cells.values {
            if cell.is_obstacle() {
                cell.set_obstacle(false);
            }
        }
        self.clear();
        self.generate_components();
    }

    /// Walks the parent chain starting at `ix` itself. The walk is bounded by the number of
    /// cells so a corrupted chain cannot loop forever.
    pub fn ancestors(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        itertools::unfold(Some(ix), move |next| {
            let current = (*next)?;
            *next = self.cells.values[current].parent();
            Some(current)
        })
        .take(self.len())
    }

    /// Assigns `candidate` as parent of `cell`. Fails with [Error::CycleDetected] and leaves
    /// the parent unchanged if `cell` appears anywhere in the candidate's chain, including the
    /// candidate itself.
    ///
    /// # Panics
    /// Panics when either index is out of range.
    pub fn set_parent(&mut self, cell: usize, candidate: usize) -> Result<()> {
        if self.ancestors(candidate).any(|ix| ix == cell) {
            return Err(Error::CycleDetected { cell, candidate });
        }
        self.cells.values[cell].link_parent(Some(candidate));
        Ok(())
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: Point) -> Result<usize> {
        self.get_ix_point(point).map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are on the same component. Only accurate when the components
    /// are not dirty, see [update](Self::update).
    pub fn reachable(&self, start: Point, goal: Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: Point, goal: Point) -> bool {
        match (self.get_ix_point(start), self.get_ix_point(goal)) {
            (Ok(start_ix), Ok(goal_ix)) => {
                self.cells.values[start_ix].is_obstacle()
                    || self.cells.values[goal_ix].is_obstacle()
                    || !self.components.equiv(start_ix, goal_ix)
            }
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free grid neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        info!(
            "Generating connected components for {}x{} grid",
            self.width(),
            self.height()
        );
        self.components = UnionFind::new(self.len());
        self.components_dirty = false;
        for ix in 0..self.len() {
            if self.cells.values[ix].is_obstacle() {
                continue;
            }
            let p = self.point(ix);
            // East and south suffice, the other two directions are covered by the neighbour.
            for (dx, dy) in [(1, 0), (0, 1)] {
                if let Ok(n) = self.get_ix(p.x + dx, p.y + dy) {
                    if !self.cells.values[n].is_obstacle() {
                        self.components.union(ix, n);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.values.chunks(self.width().max(1)) {
            let line = row.iter().map(|c| c.tag().symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the layout alphabet of the [Display] output: `.` blank, `#` obstacle, `S` start and
/// `G` goal. Blank lines and surrounding whitespace are ignored.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Grid> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if let Some(y) = rows.iter().position(|r| r.chars().count() != width) {
            return Err(Error::Parse(format!(
                "row {} has {} cells, expected {}",
                y,
                rows[y].chars().count(),
                width
            )));
        }
        let mut grid = Grid::new(width, height);
        let mut start = None;
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                match c {
                    '.' => {}
                    '#' => {
                        grid.set_obstacle(p, true)?;
                    }
                    'S' if start.is_none() => start = Some(p),
                    'G' if goal.is_none() => goal = Some(p),
                    'S' | 'G' => {
                        return Err(Error::Parse(format!("duplicate '{}' at ({}, {})", c, x, y)))
                    }
                    _ => {
                        return Err(Error::Parse(format!(
                            "unexpected '{}' at ({}, {})",
                            c, x, y
                        )))
                    }
                }
            }
        }
        if let Some(p) = start {
            grid.set_start(p)?;
        }
        if let Some(p) = goal {
            grid.set_goal(p)?;
        }
        grid.update();
        Ok(grid)
    }
}
