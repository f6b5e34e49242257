/// Fuzzes the search by checking on many random grids that a path is found exactly when the
/// goal shares a connected component with the start, and that the path is as short as the
/// breadth-first search distance.
use std::collections::VecDeque;

use grid_astar::*;
use rand::prelude::*;

fn random_grid(n: usize, rng: &mut StdRng, density: f64) -> Grid {
    let mut grid = Grid::new(n);
    for row in 0..n as i32 {
        for col in 0..n as i32 {
            grid.set_blocked(Pos::new(row, col), rng.gen_bool(density)).unwrap();
        }
    }
    grid.refresh_adjacency();
    grid
}

fn random_free_point(grid: &Grid, rng: &mut StdRng) -> Option<Pos> {
    let free = grid.free_cells().collect::<Vec<_>>();
    free.choose(rng).copied()
}

/// Unit-cost ground truth.
fn bfs_distance(grid: &Grid, start: Pos, goal: Pos) -> Option<usize> {
    let mut dist = vec![usize::MAX; grid.size() * grid.size()];
    let mut queue = VecDeque::new();
    dist[grid.index(start)?] = 0;
    queue.push_back(start);
    while let Some(p) = queue.pop_front() {
        let d = dist[grid.index(p)?];
        if p == goal {
            return Some(d);
        }
        for n in grid.neighbors(p).unwrap() {
            let ix = grid.index(n)?;
            if dist[ix] == usize::MAX {
                dist[ix] = d + 1;
                queue.push_back(n);
            }
        }
    }
    None
}

fn visualize_grid(grid: &Grid, start: &Pos, end: &Pos) {
    for row in 0..grid.size() as i32 {
        for col in 0..grid.size() as i32 {
            let p = Pos::new(row, col);
            if *start == p {
                print!("S");
            } else if *end == p {
                print!("G");
            } else if grid.is_blocked(p).unwrap() {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let engine = AStarEngine::new();
    let start = Pos::new(0, 0);
    let end = Pos::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng, 0.4);
        grid.set_blocked(start, false).unwrap();
        grid.set_blocked(end, false).unwrap();
        grid.refresh_adjacency();
        let reachable = grid.reachable(start, end).unwrap();
        let result = engine.search(&grid, start, end, |_, _| true).unwrap();
        // Show the grid if a path is not found
        if result.found() != reachable {
            visualize_grid(&grid, &start, &end);
        }
        assert_eq!(result.found(), reachable);
        assert!(!result.cancelled());
    }
}

/// The path length equals the true shortest distance for random endpoint pairs.
#[test]
fn fuzz_distance() {
    const N: usize = 8;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(1);
    let engine = AStarEngine::new();
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, &mut rng, 0.3);
        let (Some(start), Some(goal)) = (
            random_free_point(&grid, &mut rng),
            random_free_point(&grid, &mut rng),
        ) else {
            continue;
        };
        let result = engine.search(&grid, start, goal, |_, _| true).unwrap();
        match bfs_distance(&grid, start, goal) {
            Some(d) => {
                if result.path.len() != d {
                    visualize_grid(&grid, &start, &goal);
                }
                assert!(result.found());
                assert_eq!(result.path.len(), d);
            }
            None => assert_eq!(result.outcome, SearchOutcome::Failed),
        }
    }
}

/// Manhattan distance never exceeds the true remaining distance.
#[test]
fn heuristic_is_admissible() {
    const N: usize = 12;
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let grid = random_grid(N, &mut rng, 0.25);
        for _ in 0..20 {
            let (Some(a), Some(b)) = (
                random_free_point(&grid, &mut rng),
                random_free_point(&grid, &mut rng),
            ) else {
                continue;
            };
            if let Some(d) = bfs_distance(&grid, a, b) {
                assert!(Manhattan.estimate(&a, &b) as usize <= d);
            }
        }
    }
}

/// Identical inputs give identical paths and expansion orders.
#[test]
fn search_is_deterministic() {
    const N: usize = 16;
    let mut rng = StdRng::seed_from_u64(3);
    let engine = AStarEngine::new();
    for _ in 0..100 {
        let grid = random_grid(N, &mut rng, 0.2);
        let (Some(start), Some(goal)) = (
            random_free_point(&grid, &mut rng),
            random_free_point(&grid, &mut rng),
        ) else {
            continue;
        };
        let first = engine.search(&grid, start, goal, |_, _| true).unwrap();
        let second = engine.search(&grid.clone(), start, goal, |_, _| true).unwrap();
        assert_eq!(first, second);
    }
}
