//! Command-line interface for noughts.

use clap::{Parser, Subcommand};
use noughts::GameMode;
use noughts_rules::Mark;
use std::path::PathBuf;

/// Noughts - tic-tac-toe in the browser with a greedy computer opponent
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Browser tic-tac-toe server and move advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long, default_value = "noughts.toml")]
        config: PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Delay before the computer replies, in milliseconds (overrides config)
        #[arg(long)]
        advisor_delay_ms: Option<u64>,

        /// Seed for the computer's random tie-breaks (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Mode for new sessions: human_vs_computer or human_vs_human (overrides config)
        #[arg(long)]
        mode: Option<GameMode>,
    },

    /// Evaluate a board and print the advisor's move
    Advise {
        /// Board as 9 cells: X, O and '.' for empty, e.g. "XX./.O./..."
        board: String,

        /// Mark the advisor plays
        #[arg(short, long, default_value = "O")]
        mark: Mark,

        /// Seed for random tie-breaks
        #[arg(long)]
        seed: Option<u64>,
    },
}
