//! Named cells of the 3x3 board.

use super::error::RulesError;
use super::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board (0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

/// Geometric role of a cell, which drives the advisor's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The single middle cell.
    Center,
    /// One of the four corners.
    Corner,
    /// One of the four edge midpoints.
    Side,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns whether this cell is the center, a corner or a side.
    pub fn kind(self) -> CellKind {
        match self {
            Position::Center => CellKind::Center,
            Position::TopLeft
            | Position::TopRight
            | Position::BottomLeft
            | Position::BottomRight => CellKind::Corner,
            Position::TopCenter
            | Position::MiddleLeft
            | Position::MiddleRight
            | Position::BottomCenter => CellKind::Side,
        }
    }

    /// Filters positions by board state, returning only empty cells in index order.
    #[instrument(skip(board))]
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl TryFrom<usize> for Position {
    type Error = RulesError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(RulesError::InvalidPosition(index))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.to_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::try_from(i), Ok(*pos));
        }
        assert_eq!(Position::try_from(9), Err(RulesError::InvalidPosition(9)));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Position::Center.kind(), CellKind::Center);
        let corners: Vec<usize> = Position::ALL
            .iter()
            .filter(|p| p.kind() == CellKind::Corner)
            .map(|p| p.to_index())
            .collect();
        let sides: Vec<usize> = Position::ALL
            .iter()
            .filter(|p| p.kind() == CellKind::Side)
            .map(|p| p.to_index())
            .collect();
        assert_eq!(corners, [0, 2, 6, 8]);
        assert_eq!(sides, [1, 3, 5, 7]);
    }

    #[test]
    fn test_valid_moves_skip_occupied() {
        let board: Board = "X...O...X".parse().unwrap();
        assert_eq!(Position::valid_moves(&board).len(), 6);
        assert!(!Position::valid_moves(&board).contains(&Position::Center));
    }

    #[test]
    fn test_display_shows_index() {
        assert_eq!(Position::TopRight.to_string(), "Top-right (2)");
    }
}
