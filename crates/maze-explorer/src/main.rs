//! CLI entry point for the maze explorer.
//!
//! Usage:
//!   maze-explorer explore <maze.json> [options]
//!   maze-explorer explore --stdin [options]
//!   maze-explorer verify <maze.json> --path n,e,e,s [options]
//!
//! Options:
//!   --start <id>          Room to start from (default: the maze's start room)
//!   --strategy <name>     weighted (default) or dead-end
//!   --verbose             Debug logging on stderr
//!   --log-level <level>   Explicit log level or filter directive
//!   --log-json            Log as JSON lines

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use maze_explorer::logging::init_tracing;
use maze_explorer::{
    explore, verify_traversal, Direction, ExitCode, ExploreError, PlannerConfig, RoomId,
    Strategy, World,
};

#[derive(Parser)]
#[command(name = "maze-explorer")]
#[command(about = "Plan a walk that visits every room of a maze")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover the maze and plan a walk through every room
    Explore {
        /// Path to maze JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read maze from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Room to start from
        #[arg(long)]
        start: Option<RoomId>,

        /// Target selection strategy (weighted or dead-end)
        #[arg(long, default_value = "weighted")]
        strategy: Strategy,
    },

    /// Replay a walk and check that it visits every room
    Verify {
        /// Path to maze JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read maze from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Room to start from
        #[arg(long)]
        start: Option<RoomId>,

        /// Comma-separated moves, e.g. "n,e,e,s"
        #[arg(long)]
        path: String,
    },
}

/// Output format for a planned exploration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorationOutput {
    path: Vec<Direction>,
    moves: usize,
    total_rooms: usize,
    revisits: usize,
    segments: usize,
    strategy: String,
    time_elapsed_ms: u64,
}

/// Output format for a verified walk
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverageOutput {
    complete: bool,
    moves: usize,
    total_rooms: usize,
    visited_rooms: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missed: Vec<RoomId>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Error initializing logging: {}", e);
    }

    match run(cli.command) {
        Ok(code) => std::process::exit(code.into()),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            println!("{}", e.to_json());
            std::process::exit(e.exit_code().into());
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, ExploreError> {
    match command {
        Commands::Explore {
            file,
            stdin,
            start,
            strategy,
        } => {
            let world = load_world(file, stdin, start)?;
            let config = PlannerConfig { strategy };
            let exploration = explore(&world, world.start(), &config)?;

            let output = ExplorationOutput {
                path: exploration.directions.clone(),
                moves: exploration.moves(),
                total_rooms: exploration.total_rooms,
                revisits: exploration.revisits,
                segments: exploration.segments,
                strategy: strategy.to_string(),
                time_elapsed_ms: exploration.time_elapsed_ms,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::Success)
        }

        Commands::Verify {
            file,
            stdin,
            start,
            path,
        } => {
            let world = load_world(file, stdin, start)?;
            let directions = parse_path(&path)?;
            let coverage = verify_traversal(&world, world.start(), &directions)?;

            let output = CoverageOutput {
                complete: coverage.complete(),
                moves: coverage.moves,
                total_rooms: coverage.total_rooms,
                visited_rooms: coverage.visited_rooms,
                missed: coverage.missed.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);

            if coverage.complete() {
                Ok(ExitCode::Success)
            } else {
                Ok(ExitCode::Failure)
            }
        }
    }
}

fn load_world(
    file: Option<PathBuf>,
    stdin: bool,
    start: Option<RoomId>,
) -> Result<World, ExploreError> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)?
    } else {
        return Err(ExploreError::Usage(
            "must provide either a file path or --stdin".to_string(),
        ));
    };

    let world = World::from_json(&json_content)?;
    match start {
        Some(room) => world.with_start(room),
        None => Ok(world),
    }
}

fn parse_path(path: &str) -> Result<Vec<Direction>, ExploreError> {
    path.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Direction::from_token(token)
                .ok_or_else(|| ExploreError::Usage(format!("unknown direction '{}'", token)))
        })
        .collect()
}
