//! Core domain types for tic-tac-toe.

use super::error::RulesError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A player's symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    /// Mark X (moves first each round).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        Cell::Occupied(mark)
    }
}

/// 3x3 tic-tac-toe board.
///
/// The fixed-size array makes a board of any other size unrepresentable;
/// [`Board::from_cells`] is the only fallible way in from untrusted input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from exactly nine cells.
    #[instrument(skip(cells), fields(len = cells.len()))]
    pub fn from_cells(cells: &[Cell]) -> Result<Self, RulesError> {
        let cells: [Cell; 9] = cells
            .try_into()
            .map_err(|_| RulesError::WrongCellCount(cells.len()))?;
        Ok(Self { cells })
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Writes a mark into an empty cell.
    ///
    /// Cells are write-once: placing on an occupied cell is rejected and the
    /// board is left unchanged.
    #[instrument(skip(self))]
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), RulesError> {
        if !self.is_empty(pos) {
            return Err(RulesError::CellOccupied(pos));
        }
        self.cells[pos.to_index()] = Cell::Occupied(mark);
        Ok(())
    }

    /// Returns a copy of this board with `mark` written at `pos`.
    ///
    /// Used to simulate candidate moves; the original is untouched.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Self {
        let mut next = *self;
        next.cells[pos.to_index()] = Cell::Occupied(mark);
        next
    }

    /// Returns all cells in index order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their index so the output doubles as a move prompt.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => pos.to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl FromStr for Board {
    type Err = RulesError;

    /// Parses boards such as `"XX..O...."` or `"XO./.X./..O"`.
    ///
    /// `X` and `O` (either case) are marks; `.`, `-` and `_` are empty.
    /// Whitespace, `/` and `|` are row separators and are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .map(|c| match c {
                'X' | 'x' => Ok(Cell::Occupied(Mark::X)),
                'O' | 'o' => Ok(Cell::Occupied(Mark::O)),
                '.' | '-' | '_' => Ok(Cell::Empty),
                other => Err(RulesError::InvalidBoardChar(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(&cells)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            match cell {
                Cell::Empty => write!(f, ".")?,
                Cell::Occupied(mark) => write!(f, "{}", mark)?,
            }
        }
        Ok(())
    }
}
