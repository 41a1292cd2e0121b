//! Command-line driver: solve puzzle files, generate random puzzles.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dichromate::{Color, ColorBoard, Dimension, Location};

#[derive(Parser)]
#[command(name = "dichromate", about = "Provably optimal Flood-It solving", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle file and print a shortest move sequence.
    Solve {
        /// Puzzle file: rows and columns on the first line, then one color
        /// label per cell.
        file: PathBuf,
        /// Flood origin, in `x y` order.
        #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = vec![0, 0])]
        origin: Vec<usize>,
    },
    /// Generate a random puzzle in the solver's input format.
    Generate {
        /// Board width.
        width: Dimension,
        /// Board height.
        height: Dimension,
        /// Number of colors.
        colors: Color,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Solve { file, origin } => {
            let input = fs::read_to_string(&file)
                .with_context(|| format!("could not read puzzle file '{}'", file.display()))?;
            let board = ColorBoard::parse(&input)
                .context("puzzle file is not a valid board")?
                .with_origin(Location(origin[0], origin[1]))?;

            let solution = board.solve()?;
            println!(
                "A shortest sequence of {} moves is given by:",
                solution.len() - 1
            );
            println!();
            println!("    {}", solution.iter().join(" "));
        }
        Command::Generate {
            width,
            height,
            colors,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let board = ColorBoard::generate((width, height), colors, &mut rng);

            println!("{} {}", height, width);
            for row in board.cells().rows() {
                println!("{}", row.iter().join(" "));
            }
        }
    }

    Ok(())
}
