/// Fuzzes the stepper by checking for many random grids that a path is found exactly when the goal
/// is reachable according to the connected components, and that every found path is optimal.
use grid_astar_stepper::{
    Dijkstra, Euclidean, Grid, Heuristic, Manhattan, PathExtractor, SearchState, Status,
};
use grid_util::point::Point;
use rand::prelude::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng, start: Point, end: Point) -> Grid {
    let mut grid = Grid::new(w, h);
    grid.set_start(start).unwrap();
    grid.set_goal(end).unwrap();
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            // Endpoints refuse obstacles
            grid.set_obstacle(Point::new(x, y), rng.gen_bool(0.4)).unwrap();
        }
    }
    grid.update();
    grid
}

fn random_grid_point(grid: &Grid, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..grid.width()) as i32,
        rng.gen_range(0..grid.height()) as i32,
    )
}

/// Steps the search to completion while checking that no cell is ever both open and closed.
fn step_checked<H: Heuristic>(search: &mut SearchState<H>, grid: &mut Grid) -> Status {
    while search.status() == Status::Running {
        search.step(grid).unwrap();
        for ix in search.open_cells() {
            assert!(!search.is_closed(ix));
        }
    }
    search.status()
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng, start, end);
        let reachable = grid.reachable(start, end);
        let mut search = SearchState::new(Euclidean);
        search.start_from_grid(&mut grid).unwrap();
        let status = step_checked(&mut search, &mut grid);
        // Show the grid if the outcome disagrees with the components
        if (status == Status::Found) != reachable {
            println!("{}", grid);
        }
        assert_eq!(status == Status::Found, reachable);
        if !reachable {
            assert_eq!(status, Status::Unreachable);
        }
    }
}

#[test]
fn fuzz_distance() {
    const N: usize = 8;
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(1);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng, start, end);
        if !grid.reachable(start, end) {
            continue;
        }
        let lengths = (0..3)
            .map(|heuristic| {
                grid.clear();
                solve_len(&mut grid, heuristic)
            })
            .collect::<Vec<usize>>();
        if lengths[0] != lengths[1] || lengths[0] != lengths[2] {
            println!("{}", grid);
        }
        assert_eq!(lengths[0], lengths[1]);
        assert_eq!(lengths[0], lengths[2]);
    }
}

/// Solves with the selected heuristic and checks g-costs never decrease along the path.
fn solve_len(grid: &mut Grid, heuristic: usize) -> usize {
    let status = match heuristic {
        0 => run_from_grid(SearchState::new(Euclidean), grid),
        1 => run_from_grid(SearchState::new(Manhattan), grid),
        _ => run_from_grid(SearchState::new(Dijkstra), grid),
    };
    assert_eq!(status, Status::Found);
    let path = PathExtractor::reconstruct(grid, grid.goal().unwrap()).unwrap();
    for pair in path.windows(2) {
        let g0 = grid.get_point(pair[0]).unwrap().g_cost();
        let g1 = grid.get_point(pair[1]).unwrap().g_cost();
        assert!(g0 <= g1);
    }
    path.len()
}

fn run_from_grid<H: Heuristic>(mut search: SearchState<H>, grid: &mut Grid) -> Status {
    search.start_from_grid(grid).unwrap();
    step_checked(&mut search, grid)
}

#[test]
fn open_grid_paths_are_manhattan() {
    const N: usize = 12;
    let mut rng = StdRng::seed_from_u64(2);
    let mut grid = Grid::new(N, N);
    for _ in 0..200 {
        let start = random_grid_point(&grid, &mut rng);
        let end = random_grid_point(&grid, &mut rng);
        if start == end {
            continue;
        }
        grid.clear();
        let mut search = SearchState::new(Euclidean);
        search.start(&mut grid, Some(start), Some(end)).unwrap();
        assert_eq!(step_checked(&mut search, &mut grid), Status::Found);
        let path = PathExtractor::reconstruct(&grid, grid.goal().unwrap()).unwrap();
        let manhattan = (start.x - end.x).abs() + (start.y - end.y).abs();
        assert_eq!(path.len(), 1 + manhattan as usize);
        assert_eq!(PathExtractor::path_cost(&path), manhattan as f64);
    }
}
