//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve <board.json> [options]
//!   water-sort-solver solve --stdin [options]
//!   water-sort-solver check <board.json>
//!   water-sort-solver replay <board.json> --steps <steps.json>
//!
//! A board file is either a bare array of tubes or a saved board object with
//! a `tubes` field. Each tube lists its cells from the open end down, using
//! color names such as `"D_RED"` and `"UNKNOWN"` for masked cells.
//!
//! Options:
//!   --max-iterations <n>  Maximum boards explored (default: 15000)
//!   --tubes <n>           Tubes on the board (default: 14)
//!   --capacity <n>        Cells per tube (default: 4)
//!   --format <fmt>        Output format for solve: json or text
//!   --verbose             Log search progress to stderr

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use water_sort_solver::{
    excavation_flags, excavation_score, is_solved, parity_advisory, possible_moves, replay,
    solve, Board, BoardShape, ColorKey, Move, SolverConfig, SolverResult, DEFAULT_CAPACITY,
    DEFAULT_TUBE_COUNT,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Breadth-first solver for water sort puzzles with masked tubes")]
#[command(version)]
struct Cli {
    /// Log search progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest pour sequence, or the best excavation path
    Solve {
        #[command(flatten)]
        board: BoardArgs,

        /// Maximum boards explored before giving up
        #[arg(long, default_value_t = SolverConfig::default().max_iterations)]
        max_iterations: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Report solved status, excavation score and legal moves of a board
    Check {
        #[command(flatten)]
        board: BoardArgs,
    },

    /// Apply a list of steps to a board and report the result
    Replay {
        #[command(flatten)]
        board: BoardArgs,

        /// JSON file with the steps, either an array or a solve result
        #[arg(long, value_name = "FILE")]
        steps: PathBuf,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// Path to board JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read board from stdin instead of file
    #[arg(long)]
    stdin: bool,

    /// Number of tubes on the board
    #[arg(long, default_value_t = DEFAULT_TUBE_COUNT)]
    tubes: usize,

    /// Number of cells per tube
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Board file contents
#[derive(Deserialize)]
#[serde(untagged)]
enum BoardInput {
    /// Saved board; fields other than `tubes` are ignored
    Saved { tubes: Vec<Vec<ColorKey>> },
    Bare(Vec<Vec<ColorKey>>),
}

/// Steps file contents
#[derive(Deserialize)]
#[serde(untagged)]
enum StepsInput {
    Result { steps: Vec<Move> },
    Bare(Vec<Move>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    shape: BoardShape,
    solved: bool,
    excavation_score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    parity_advisory: Option<String>,
    color_counts: BTreeMap<ColorKey, usize>,
    moves: Vec<Move>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput {
    solved: bool,
    excavation_score: usize,
    board: Board,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Solve {
            board,
            max_iterations,
            format,
        } => {
            let board = load_board(&board)?;
            let config = SolverConfig { max_iterations };

            let result = solve(&board, &config);

            match format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Text => print_text(&result, &board),
            }

            // Exit with appropriate code
            if result.is_solution() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }

        Commands::Check { board } => {
            let board = load_board(&board)?;
            let output = CheckOutput {
                shape: board.shape(),
                solved: is_solved(&board),
                excavation_score: excavation_score(&board),
                parity_advisory: parity_advisory(&board),
                color_counts: board.color_counts(),
                moves: possible_moves(&board),
            };
            print_json(&output)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Replay { board, steps } => {
            let board = load_board(&board)?;
            let steps = load_steps(&steps)?;

            let end = replay(&board, &steps).context("replay failed")?;
            let output = ReplayOutput {
                solved: is_solved(&end),
                excavation_score: excavation_score(&end),
                board: end,
            };
            print_json(&output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_board(args: &BoardArgs) -> Result<Board> {
    let json_content = if args.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read board from stdin")?;
        buffer
    } else if let Some(path) = &args.file {
        read_file(path)?
    } else {
        bail!("must provide either a board file or --stdin");
    };

    let input: BoardInput =
        serde_json::from_str(&json_content).context("failed to parse board JSON")?;
    let tubes = match input {
        BoardInput::Saved { tubes } | BoardInput::Bare(tubes) => tubes,
    };

    let shape = BoardShape {
        tube_count: args.tubes,
        capacity: args.capacity,
    };
    Board::new(&tubes, shape).context("invalid board")
}

fn load_steps(path: &Path) -> Result<Vec<Move>> {
    let content = read_file(path)?;
    let input: StepsInput = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse steps from {}", path.display()))?;
    Ok(match input {
        StepsInput::Result { steps } | StepsInput::Bare(steps) => steps,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_text(result: &SolverResult, board: &Board) {
    let flags = excavation_flags(board, &result.steps);
    for (index, (step, digs)) in result.steps.iter().zip(flags).enumerate() {
        let marker = if digs { " (excavation)" } else { "" };
        println!("{:>3}. {}{}", index + 1, step, marker);
    }
    if let Some(warning) = &result.warning {
        println!("warning: {}", warning);
    }
    if let Some(error) = &result.error {
        println!("error: {}", error);
    }
    println!(
        "{:?} after {} iterations ({} boards, {} ms)",
        result.outcome,
        result.stats.iterations,
        result.stats.states_visited,
        result.stats.elapsed_ms
    );
}
