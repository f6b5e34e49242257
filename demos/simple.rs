use grid_astar::{AStarEngine, Grid};

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S....|
// |.###.|
// |...#.|
// |.#.#G|
// |.#...|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - G marks the goal
//
// Cells have a 4-neighborhood

fn main() {
    let (grid, start, goal) =
        Grid::parse_with_endpoints("S....\n.###.\n...#.\n.#.#G\n.#...").unwrap();
    let (start, goal) = (start.unwrap(), goal.unwrap());
    println!("{}", grid);
    let path = AStarEngine::new()
        .find_path(&grid, start, goal)
        .unwrap()
        .unwrap();
    println!("Path:");
    println!("{}", start);
    for p in path {
        println!("{}", p);
    }
}
