//! Greedy move advisor for the computer opponent.
//!
//! The advisor looks one move ahead and applies a fixed rule priority:
//!
//! 1. complete one of its own lines,
//! 2. block an opponent line that would complete next move,
//! 3. take the center,
//! 4. take a random free corner,
//! 5. take a random free side,
//! 6. take the lowest free cell.
//!
//! It does not defend against forks. Given the same board and the same
//! random source it always picks the same cell.

use super::error::RulesError;
use super::position::{CellKind, Position};
use super::rules::evaluate;
use super::types::{Board, Mark};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Which rule produced a move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdvisorRule {
    /// Completes a line for the advisor.
    Win,
    /// Stops the opponent completing a line.
    Block,
    /// Takes the center cell.
    Center,
    /// Takes a free corner.
    Corner,
    /// Takes a free side.
    Side,
    /// Takes the lowest-index free cell.
    Fallback,
}

/// A chosen cell and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// Cell to play.
    pub position: Position,
    /// Rule that fired.
    pub rule: AdvisorRule,
}

/// Move advisor bound to a pair of distinct marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveAdvisor {
    advisor: Mark,
    opponent: Mark,
}

impl MoveAdvisor {
    /// Creates an advisor playing `advisor` against `opponent`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::SameMarks`] if both marks are equal.
    pub fn new(advisor: Mark, opponent: Mark) -> Result<Self, RulesError> {
        if advisor == opponent {
            return Err(RulesError::SameMarks(advisor));
        }
        Ok(Self { advisor, opponent })
    }

    /// Creates an advisor playing `mark` against the other mark.
    pub fn for_mark(mark: Mark) -> Self {
        Self {
            advisor: mark,
            opponent: mark.opponent(),
        }
    }

    /// The advisor's own mark.
    pub fn advisor(&self) -> Mark {
        self.advisor
    }

    /// The opponent's mark.
    pub fn opponent(&self) -> Mark {
        self.opponent
    }

    /// Picks the next cell and reports which rule fired.
    ///
    /// Returns `None` when the board has no empty cell.
    #[instrument(skip(self, board, rng), fields(advisor = %self.advisor, board = %board))]
    pub fn advise<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Advice> {
        let free = Position::valid_moves(board);
        let Some(&lowest) = free.first() else {
            debug!("No move available");
            return None;
        };

        let (position, rule) = if let Some(pos) = completing_move(board, &free, self.advisor) {
            (pos, AdvisorRule::Win)
        } else if let Some(pos) = completing_move(board, &free, self.opponent) {
            (pos, AdvisorRule::Block)
        } else if board.is_empty(Position::Center) {
            (Position::Center, AdvisorRule::Center)
        } else if let Some(pos) = random_of_kind(&free, CellKind::Corner, rng) {
            (pos, AdvisorRule::Corner)
        } else if let Some(pos) = random_of_kind(&free, CellKind::Side, rng) {
            (pos, AdvisorRule::Side)
        } else {
            (lowest, AdvisorRule::Fallback)
        };

        debug!(%position, %rule, "Advisor chose move");
        Some(Advice { position, rule })
    }

    /// Picks the next cell, or `None` when the board is full.
    pub fn choose_move<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Position> {
        self.advise(board, rng).map(|advice| advice.position)
    }
}

/// Picks the advisor's next cell.
///
/// `Ok(None)` means no move is available (the board is full). Callers should
/// not ask for a move on a decided board.
///
/// # Errors
///
/// Returns [`RulesError::SameMarks`] if `advisor == opponent`.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    advisor: Mark,
    opponent: Mark,
    rng: &mut R,
) -> Result<Option<Position>, RulesError> {
    Ok(MoveAdvisor::new(advisor, opponent)?.choose_move(board, rng))
}

/// First free cell (ascending) where `mark` would complete a line.
fn completing_move(board: &Board, free: &[Position], mark: Mark) -> Option<Position> {
    free.iter()
        .copied()
        .find(|&pos| evaluate(&board.with_mark(pos, mark)).winner() == Some(mark))
}

/// Uniform choice among the free cells of the given kind.
fn random_of_kind<R: Rng + ?Sized>(
    free: &[Position],
    kind: CellKind,
    rng: &mut R,
) -> Option<Position> {
    let open: Vec<Position> = free
        .iter()
        .copied()
        .filter(|pos| pos.kind() == kind)
        .collect();
    open.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_same_marks_rejected() {
        assert_eq!(
            MoveAdvisor::new(Mark::O, Mark::O),
            Err(RulesError::SameMarks(Mark::O))
        );
    }

    #[test]
    fn test_win_beats_block() {
        // O can win on the middle row; X threatens the top row.
        let board: Board = "XX./OO./X..".parse().unwrap();
        let advice = MoveAdvisor::for_mark(Mark::O).advise(&board, &mut rng());
        assert_eq!(
            advice,
            Some(Advice {
                position: Position::MiddleRight,
                rule: AdvisorRule::Win
            })
        );
    }

    #[test]
    fn test_corner_when_center_taken() {
        let board: Board = "....X....".parse().unwrap();
        let advice = MoveAdvisor::for_mark(Mark::O)
            .advise(&board, &mut rng())
            .unwrap();
        assert_eq!(advice.rule, AdvisorRule::Corner);
        assert_eq!(advice.position.kind(), CellKind::Corner);
    }

    #[test]
    fn test_full_board_has_no_advice() {
        let board: Board = "XOX/OXX/OXO".parse().unwrap();
        assert_eq!(MoveAdvisor::for_mark(Mark::O).advise(&board, &mut rng()), None);
    }
}
