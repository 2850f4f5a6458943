use std::error::Error;
use std::fs;

use treasure_path::{convert_cost_to_unit_cost_float, Grid, PathFinder};

// Reads a map such as
//
// ..+..++
// ++.B..+
// .....++
// ++.....
// .T....+
//
// where
// - + marks an island
// - B marks the boat
// - T marks the treasure
//
// and plots the shortest route from the boat to the treasure. Set RUST_LOG=debug to see the
// search statistics.

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: plot <map file> [sonar range]")?;
    let range = std::env::args()
        .nth(2)
        .map(|r| r.parse::<i32>())
        .transpose()?;
    let grid: Grid = fs::read_to_string(&path)?.parse()?;
    println!("{}\n", grid);

    let treasure = match range {
        Some(range) => match grid.treasure_within(range) {
            Some(treasure) => treasure,
            None => {
                println!("Treasure is out of sonar range");
                return Ok(());
            }
        },
        None => grid.treasure(),
    };
    let solver = PathFinder::new();
    let route = solver.try_search(&grid, grid.boat(), treasure)?;
    println!("{}", grid.render(Some(&route)));
    let cost = solver.path_cost(&route);
    println!(
        "\n{} steps, cost {} ({:.1} straight moves)",
        route.len() - 1,
        cost,
        convert_cost_to_unit_cost_float(cost)
    );
    Ok(())
}
