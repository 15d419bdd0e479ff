//! Noughts - browser-rendered tic-tac-toe
//!
//! A thin web shell over the `noughts_rules` engine: one page, a JSON API
//! and an optional computer opponent driven by the greedy move advisor.
//!
//! # Architecture
//!
//! - **Rules** (`noughts_rules`): board evaluation and move advice
//! - **Session**: turn sequencing, round lifecycle and scores per browser
//! - **Server**: axum router serving the page and the session API
//! - **Config**: TOML file with CLI overrides
//!
//! # Example
//!
//! ```no_run
//! use noughts::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_port(8080);
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod server;
mod session;

pub use config::{ConfigError, ServerConfig};

pub use server::{
    ApiError, AppState, CreateSessionRequest, ModeRequest, MoveRequest, OutcomeView, SessionView,
    router, serve,
};

pub use session::{
    COMPUTER_MARK, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS, GameMode, GameSession, HUMAN_MARK,
    Scoreboard, SessionError, SessionId, SessionManager,
};
