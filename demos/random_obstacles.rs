use grid_astar_stepper::{find_path, Grid, PathExtractor, SearchState};
use grid_util::point::Point;
use rand::{rngs::StdRng, SeedableRng};

// Default scene: a 30x30 grid with the start a third of the way across, the goal two thirds
// across, both on the middle row, and a batch of random obstacles.

fn main() {
    env_logger::init();
    let mut grid = Grid::default();
    let row = grid.height() as i32 / 2;
    let start = Point::new(grid.width() as i32 / 3, row);
    let goal = Point::new(2 * grid.width() as i32 / 3, row);
    grid.set_start(start).unwrap();
    grid.set_goal(goal).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let placed = grid.add_random_obstacles(250, &mut rng);
    grid.update();
    println!(
        "Placed {} obstacles, reachable: {}",
        placed,
        grid.reachable(start, goal)
    );

    let mut search: SearchState = SearchState::default();
    match find_path(&mut search, &mut grid, start, goal).unwrap() {
        Some(path) => {
            PathExtractor::mark_path(&mut grid, &path).unwrap();
            println!(
                "Found path of {} cells after {} steps, {} cells visited",
                path.len(),
                search.steps(),
                search.visited().count()
            );
        }
        None => println!("No path after {} steps", search.steps()),
    }
    println!("{}", grid);
}
