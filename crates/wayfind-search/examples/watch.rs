//! Watch a paced A* run from the outside.
//!
//! Spawns a search on a background thread and polls the grid's node flags
//! while it runs, printing a frame per poll:
//! `S` start, `T` target, `#` wall, `o` open, `x` closed, `*` solution.
//!
//! Run with: `cargo run -p wayfind-search --example watch`

use std::thread;
use std::time::Duration;

use wayfind_core::{Context, Point};
use wayfind_grid::{AlgorithmKind, Grid, Scenario};
use wayfind_search::{AStarPathfinder, Pathfinder, SearchOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Scenario::new(
        "Two walls",
        "wayfind",
        "2024-06-10",
        [
            "S....#....",
            ".....#....",
            ".....#....",
            ".....#....",
            ".....#....",
            ".....#....",
            "..........",
            "....#.....",
            "....#.....",
            "....#....T",
        ]
        .iter()
        .map(|r| r.to_string())
        .collect(),
    );

    let grid = Grid::from_scenario(&scenario, 16.0)?;
    grid.assign_algorithm(AlgorithmKind::AStar);

    let mut pathfinder = AStarPathfinder::new();
    pathfinder.bind_grid(grid.clone());
    pathfinder.set_diagonal_movement(true);
    pathfinder.set_pace(Duration::from_millis(10));

    let ctx = Context::new();
    let handle = pathfinder.spawn(ctx.clone())?;

    while !handle.is_finished() {
        print_frame(&grid);
        thread::sleep(Duration::from_millis(120));
    }
    print_frame(&grid);

    match handle.wait() {
        SearchOutcome::PathFound { path, cost } => {
            println!("path found: {} nodes, cost {cost}", path.len());
        }
        SearchOutcome::Unreachable => println!("target unreachable"),
        SearchOutcome::Cancelled => println!("search cancelled"),
    }
    Ok(())
}

fn print_frame(grid: &Grid) {
    let mut out = String::new();
    for p in grid.bounds() {
        if p.x == 0 && p != Point::ZERO {
            out.push('\n');
        }
        let node = match grid.node_at(p) {
            Some(n) => n,
            None => continue,
        };
        out.push(if p == grid.start() {
            'S'
        } else if p == grid.target() {
            'T'
        } else if !node.traversable() {
            '#'
        } else if node.on_path {
            '*'
        } else if node.in_closed {
            'x'
        } else if node.in_open {
            'o'
        } else {
            '.'
        });
    }
    println!("{out}\n");
}
