//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Nothing here mutates state; the outcome
//! is recomputed from the board on every call.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{Line, check_winner, completed_lines, winning_line};

use super::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No completed line and at least one empty cell.
    InProgress,
    /// `mark` filled `line`.
    Win {
        /// The winning mark.
        mark: Mark,
        /// The completed line.
        line: Line,
    },
    /// Every cell occupied without a completed line.
    Draw,
}

impl Outcome {
    /// Whether the round is over.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

/// Evaluates a board.
///
/// Lines are checked rows first, then columns, then diagonals; the first
/// complete one is reported. Boards with several complete lines cannot arise
/// from alternating play, see [`completed_lines`] to inspect them.
#[instrument(skip(board), fields(board = %board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = winning_line(board) {
        Outcome::Win { mark, line }
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_win_reports_line() {
        let board: Board = "O.X/OX./O.X".parse().unwrap();
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                mark: Mark::O,
                line: Line::LeftColumn
            }
        );
    }

    #[test]
    fn test_full_board_with_win_is_not_draw() {
        let board: Board = "XXX/OOX/XOO".parse().unwrap();
        assert_eq!(evaluate(&board).winner(), Some(Mark::X));
    }

    #[test]
    fn test_draw() {
        let board: Board = "XOX/OXX/OXO".parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::Draw);
        assert!(evaluate(&board).is_decided());
    }
}
