//! Pure tic-tac-toe rules.
//!
//! Two operations make up the engine:
//!
//! - [`evaluate`] turns a [`Board`] into an [`Outcome`]: in progress, a win on
//!   a specific [`Line`], or a draw.
//! - [`choose_move`] (or [`MoveAdvisor`]) picks the computer's next cell with a
//!   one-ply greedy heuristic.
//!
//! Both are pure functions of their inputs. Randomness for tie-breaking is
//! injected, so a seeded RNG makes the advisor fully reproducible.
//!
//! ```
//! use noughts_rules::{Board, Mark, Outcome, Position, choose_move, evaluate};
//! use rand::SeedableRng;
//!
//! let board: Board = "XX./.O./...".parse()?;
//! assert_eq!(evaluate(&board), Outcome::InProgress);
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let pick = choose_move(&board, Mark::O, Mark::X, &mut rng)?;
//! assert_eq!(pick, Some(Position::TopRight));
//! # Ok::<(), noughts_rules::RulesError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod advisor;
mod error;
mod position;
mod rules;
mod types;

pub use advisor::{Advice, AdvisorRule, MoveAdvisor, choose_move};
pub use error::RulesError;
pub use position::{CellKind, Position};
pub use rules::{
    Line, Outcome, check_winner, completed_lines, evaluate, is_draw, is_full, winning_line,
};
pub use types::{Board, Cell, Mark};
