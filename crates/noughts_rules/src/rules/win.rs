//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the eight triples that wins when uniformly occupied.
///
/// Declaration order is the evaluation order: rows, then columns, then
/// diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Cells 0, 1, 2.
    TopRow,
    /// Cells 3, 4, 5.
    MiddleRow,
    /// Cells 6, 7, 8.
    BottomRow,
    /// Cells 0, 3, 6.
    LeftColumn,
    /// Cells 1, 4, 7.
    CenterColumn,
    /// Cells 2, 5, 8.
    RightColumn,
    /// Cells 0, 4, 8.
    MainDiagonal,
    /// Cells 2, 4, 6.
    AntiDiagonal,
}

impl Line {
    /// All lines in evaluation order.
    pub const ALL: [Line; 8] = [
        Line::TopRow,
        Line::MiddleRow,
        Line::BottomRow,
        Line::LeftColumn,
        Line::CenterColumn,
        Line::RightColumn,
        Line::MainDiagonal,
        Line::AntiDiagonal,
    ];

    /// The three cells making up this line.
    pub fn positions(self) -> [Position; 3] {
        use Position::*;
        match self {
            Line::TopRow => [TopLeft, TopCenter, TopRight],
            Line::MiddleRow => [MiddleLeft, Center, MiddleRight],
            Line::BottomRow => [BottomLeft, BottomCenter, BottomRight],
            Line::LeftColumn => [TopLeft, MiddleLeft, BottomLeft],
            Line::CenterColumn => [TopCenter, Center, BottomCenter],
            Line::RightColumn => [TopRight, MiddleRight, BottomRight],
            Line::MainDiagonal => [TopLeft, Center, BottomRight],
            Line::AntiDiagonal => [TopRight, Center, BottomLeft],
        }
    }

    /// The three cell indices making up this line.
    pub fn indices(self) -> [usize; 3] {
        self.positions().map(Position::to_index)
    }

    /// Returns the mark filling this line, if all three cells agree.
    pub fn owner(self, board: &Board) -> Option<Mark> {
        let [a, b, c] = self.positions();
        let sq = board.get(a);
        if sq != Cell::Empty && sq == board.get(b) && sq == board.get(c) {
            sq.mark()
        } else {
            None
        }
    }
}

/// Returns the first completed line in evaluation order and its mark.
#[instrument(skip(board), fields(board = %board))]
pub fn winning_line(board: &Board) -> Option<(Mark, Line)> {
    Line::ALL
        .into_iter()
        .find_map(|line| line.owner(board).map(|mark| (mark, line)))
}

/// Checks if there is a winner on the board.
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_line(board).map(|(mark, _)| mark)
}

/// Returns every completed line, in evaluation order.
///
/// Alternating play never completes lines for both marks, but injected
/// boards can. This exposes all of them where [`winning_line`] only reports
/// the first.
pub fn completed_lines(board: &Board) -> Vec<(Mark, Line)> {
    Line::ALL
        .into_iter()
        .filter_map(|line| line.owner(board).map(|mark| (mark, line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board: Board = "XXX.O.O..".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Mark::X, Line::TopRow)));
    }

    #[test]
    fn test_winner_diagonal() {
        let board: Board = "O.X.OX..O".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Mark::O, Line::MainDiagonal)));
    }

    #[test]
    fn test_anti_diagonal() {
        let board: Board = "OOX.X.X..".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Mark::X, Line::AntiDiagonal)));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board: Board = "XX.......".parse().unwrap();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_rows_take_precedence_over_columns() {
        // Unreachable in play: X owns both the top row and left column.
        let board: Board = "XXXX..X..".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Mark::X, Line::TopRow)));
        assert_eq!(
            completed_lines(&board),
            vec![(Mark::X, Line::TopRow), (Mark::X, Line::LeftColumn)]
        );
    }

    #[test]
    fn test_line_indices_cover_board() {
        let mut seen = [0usize; 9];
        for line in Line::ALL {
            for idx in line.indices() {
                seen[idx] += 1;
            }
        }
        // Center sits on four lines, corners on three, sides on two.
        assert_eq!(seen, [3, 2, 3, 2, 4, 2, 3, 2, 3]);
    }
}
