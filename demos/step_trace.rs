use grid_astar_stepper::{Grid, PathExtractor, SearchState, Status, DEFAULT_STEP_DELAY_MS};
use std::thread;
use std::time::Duration;

// Prints the grid after every expansion, the way a renderer driven by a timer would see it.
// The grid has shape
//  _______
// |S......|
// |.####..|
// |....#..|
// |.##.#.G|
//  _______
// where
// - # marks an obstacle
// - S marks the start
// - G marks the goal
// and frames use o for open cells, x for closed cells and * for the final path.

fn main() {
    env_logger::init();
    let mut grid: Grid = "
        S......
        .####..
        ....#..
        .##.#.G
    "
    .parse()
    .unwrap();
    let mut search: SearchState = SearchState::default();
    search.start_from_grid(&mut grid).unwrap();
    while search.status() == Status::Running {
        search.step(&mut grid).unwrap();
        println!("Step {}:\n{}", search.steps(), grid);
        thread::sleep(Duration::from_millis(DEFAULT_STEP_DELAY_MS));
    }
    match search.status() {
        Status::Found => {
            let path = PathExtractor::reconstruct(&grid, grid.goal().unwrap()).unwrap();
            PathExtractor::mark_path(&mut grid, &path).unwrap();
            println!(
                "Path of {} cells, cost {}:\n{}",
                path.len(),
                PathExtractor::path_cost(&path),
                grid
            );
        }
        status => println!("No path: {:?}", status),
    }
}
