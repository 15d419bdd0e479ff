//! Noughts - unified CLI
//!
//! Runs the browser game server or asks the move advisor about a board.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use noughts::{GameMode, ServerConfig};
use noughts_rules::{Board, Mark, MoveAdvisor, Outcome, evaluate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            advisor_delay_ms,
            seed,
            mode,
        } => run_server(config, host, port, advisor_delay_ms, seed, mode).await,
        Command::Advise { board, mark, seed } => run_advise(&board, mark, seed),
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    advisor_delay_ms: Option<u64>,
    seed: Option<u64>,
    mode: Option<GameMode>,
) -> Result<()> {
    info!("Starting noughts HTTP server");

    let mut config = ServerConfig::load_or_default(Some(&config_path))?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(delay) = advisor_delay_ms {
        config = config.with_advisor_delay_ms(delay);
    }
    if let Some(seed) = seed {
        config = config.with_advisor_seed(seed);
    }
    if let Some(mode) = mode {
        config = config.with_default_mode(mode);
    }

    noughts::serve(config).await
}

/// Evaluate a board and print the advisor's pick
#[instrument]
fn run_advise(board: &str, mark: Mark, seed: Option<u64>) -> Result<()> {
    let board: Board = board.parse()?;
    println!("{}\n", board.display());

    let outcome = evaluate(&board);
    match outcome {
        Outcome::Win { mark, line } => {
            println!("{} has won on {:?} {:?}", mark, line, line.indices());
            return Ok(());
        }
        Outcome::Draw => {
            println!("Draw");
            return Ok(());
        }
        Outcome::InProgress => println!("In progress"),
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    match MoveAdvisor::for_mark(mark).advise(&board, &mut rng) {
        Some(advice) => println!("{} should play {} ({})", mark, advice.position, advice.rule),
        None => println!("No move available"),
    }
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,noughts=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
