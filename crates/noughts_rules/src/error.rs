//! Precondition violations raised by the rules engine.

use super::{Mark, Position};

/// A caller handed the rules engine something it cannot work with.
///
/// None of these are recoverable game situations. They mean the caller built
/// a malformed board or asked for something the rules never allow.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RulesError {
    /// A board must have exactly nine cells.
    #[display("Board must have 9 cells, got {}", _0)]
    WrongCellCount(usize),

    /// Cells are write-once within a round.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// The advisor and its opponent must play different marks.
    #[display("Advisor and opponent both play {:?}", _0)]
    SameMarks(Mark),

    /// Positions are numbered 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    InvalidPosition(usize),

    /// Board strings use X, O and '.' for empty cells.
    #[display("Unexpected character {:?} in board string", _0)]
    InvalidBoardChar(char),
}

impl std::error::Error for RulesError {}
