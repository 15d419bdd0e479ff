//! Tests for board evaluation.

use noughts_rules::{Board, Cell, Line, Mark, Outcome, Position, RulesError, evaluate};

/// Builds a board with `mark` on each line cell and the opponent scattered
/// elsewhere without completing anything.
fn board_won_on(line: Line, mark: Mark) -> Board {
    let mut board = Board::new();
    for pos in line.positions() {
        board.place(pos, mark).unwrap();
    }
    // Two opponent marks on cells off the line, never forming a line with
    // a third opponent mark since only two are placed.
    let mut placed = 0;
    for pos in Position::ALL {
        if placed == 2 {
            break;
        }
        if board.is_empty(pos) {
            board.place(pos, mark.opponent()).unwrap();
            placed += 1;
        }
    }
    board
}

#[test]
fn test_every_line_is_reported() {
    for line in Line::ALL {
        for mark in [Mark::X, Mark::O] {
            let board = board_won_on(line, mark);
            assert_eq!(
                evaluate(&board),
                Outcome::Win { mark, line },
                "board {board} should be won by {mark} on {line:?}"
            );
        }
    }
}

#[test]
fn test_partial_boards_in_progress() {
    for board in ["X........", "XO.......", "XOX/.O./...", "XOX/OXO/..."] {
        let board: Board = board.parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::InProgress, "board {board}");
    }
}

#[test]
fn test_full_boards_without_line_are_draws() {
    for board in ["XOX/OXX/OXO", "XXO/OOX/XOX", "OXO/XXO/XOX"] {
        let board: Board = board.parse().unwrap();
        assert_eq!(evaluate(&board), Outcome::Draw, "board {board}");
    }
}

#[test]
fn test_evaluate_is_idempotent() {
    let board: Board = "XO./XO./X..".parse().unwrap();
    let first = evaluate(&board);
    let second = evaluate(&board);
    assert_eq!(first, second);
    assert_eq!(
        first,
        Outcome::Win {
            mark: Mark::X,
            line: Line::LeftColumn
        }
    );
}

#[test]
fn test_wrong_shape_fails_fast() {
    let cells = vec![Cell::Empty; 7];
    assert_eq!(Board::from_cells(&cells), Err(RulesError::WrongCellCount(7)));
    assert_eq!(
        "XO".parse::<Board>(),
        Err(RulesError::WrongCellCount(2))
    );
}

#[test]
fn test_outcome_serializes_with_line() {
    let outcome = Outcome::Win {
        mark: Mark::O,
        line: Line::AntiDiagonal,
    };
    let json = serde_json::to_string(&outcome).unwrap();
    assert_eq!(json, r#"{"Win":{"mark":"O","line":"AntiDiagonal"}}"#);
}
