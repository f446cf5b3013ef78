use docopt::Docopt;
use itertools::Itertools;
use log::info;
use maze_walls::generators;
use maze_walls::grid::WallGrid;
use maze_walls::pathing;
use maze_walls::units::{ExitsCount, Height, Width};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_derive::Deserialize;
use std::io;
use std::io::prelude::*;

const USAGE: &str = "Maze walls

Generates a perfect maze and prints each cell's walls, one line per row, top row first.
Wall bits: left = 1, right = 2, up = 4, down = 8.

Usage:
    maze_walls_driver -h | --help
    maze_walls_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--exits=<k>] [--seed=<s>] [--hex]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --exits=<k>            Number of boundary cells to open as exits [default: 2].
    --seed=<s>             Seed for the random number generator. Random if not given.
    --hex                  Print each cell as one hexadecimal digit instead of a decimal number.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_exits: usize,
    flag_seed: Option<u64>,
    flag_hex: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::maze_walls::errors::Error, ::maze_walls::errors::ErrorKind);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let mut rng = match args.flag_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let exits = ExitsCount(args.flag_exits);
    let maze = generators::generate(Width(width), Height(height), exits, &mut rng)
        .chain_err(|| format!("Failed to generate a {}x{} maze with {} exits",
                              width, height, args.flag_exits))?;

    log_maze_summary(&maze);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_wall_states(&maze, args.flag_hex, &mut out)
        .chain_err(|| "Failed to write the maze wall states")?;

    Ok(())
}

fn log_maze_summary(maze: &WallGrid) {
    let longest_path_length = pathing::dijkstra_longest_path::<u32>(maze)
        .map_or(0, |path| path.len());

    info!("{}x{} maze: {} passages, exits at {:?}, longest path {} cells",
          maze.width().0,
          maze.height().0,
          maze.passages_count(),
          maze.exits(),
          longest_path_length);
}

/// One line per row, highest `y` first so that "up" points up the screen.
fn write_wall_states<W: Write>(maze: &WallGrid, hex: bool, out: &mut W) -> io::Result<()> {
    let rows = maze.iter_row().collect::<Vec<_>>();

    for row in rows.iter().rev() {
        let line = row.iter()
            .map(|coord| {
                let bits = maze.walls(*coord).map_or(0, |walls| walls.bits());
                if hex {
                    format!("{:x}", bits)
                } else {
                    format!("{:2}", bits)
                }
            })
            .join(" ");
        writeln!(out, "{}", line)?;
    }

    Ok(())
}
