use grid_astar::{AStarEngine, ExpansionEvent, Grid, Pos, SearchTrace};

// Prints a frame after every expansion, the text counterpart of drawing the open (o)
// and closed (x) cells while the search runs. The final frame shows the path (*).

fn main() {
    const N: usize = 12;
    let mut grid = Grid::new(N);
    grid.set_rect(Pos::new(3, 0), 1, 9, true);
    grid.set_rect(Pos::new(7, 3), 1, 9, true);
    grid.set_rect(Pos::new(0, 6), 2, 1, true);
    grid.refresh_adjacency();
    let start = Pos::new(0, 0);
    let goal = Pos::new(N as i32 - 1, 0);

    let mut trace = SearchTrace::new(&grid, start, goal).unwrap();
    let result = AStarEngine::new()
        .search(&grid, start, goal, |pos, event| {
            let keep_going = trace.observe(pos, event);
            if event == ExpansionEvent::Expanded {
                println!("Expanded {}:\n{}", pos, trace);
            }
            keep_going
        })
        .unwrap();
    trace.finish(&result);
    println!(
        "{:?} after {} expansions, path length {}:\n{}",
        result.outcome,
        trace.expansions(),
        result.path.len(),
        trace
    );
}
