//! Player-entered letters and per-cell status, indexed like the puzzle grid.

use crate::puzzle::{PlacementEntry, Position, PuzzleModel};
use serde::{Deserialize, Serialize};

/// Validation status of a white cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellStatus {
    #[default]
    Unset,
    Correct,
    Incorrect,
}

/// The player's view of one white cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    pub pos: Position,
    pub letter: Option<char>,
    pub status: CellStatus,
    /// Filled by a smart hint. Kept apart from `status` because a revealed
    /// letter still has to validate as correct for the puzzle to complete.
    pub hinted: bool,
    /// Whether this cell has already been counted toward `correct_count`
    pub counted: bool,
}

impl CellState {
    fn new(pos: Position) -> Self {
        Self {
            pos,
            letter: None,
            status: CellStatus::Unset,
            hinted: false,
            counted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.letter.is_none()
    }

    fn reset(&mut self) {
        *self = Self::new(self.pos);
    }
}

/// Cell states for every white cell of one puzzle
#[derive(Debug, Clone)]
pub struct Board {
    cols: usize,
    cells: Vec<Option<CellState>>,
}

impl Board {
    /// Empty board shaped like `puzzle`
    pub fn new(puzzle: &PuzzleModel) -> Self {
        let cols = puzzle.cols();
        let mut cells = vec![None; puzzle.rows() * cols];
        for pos in puzzle.white_cells() {
            cells[pos.row * cols + pos.col] = Some(CellState::new(pos));
        }
        Self { cols, cells }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let idx = pos.row.checked_mul(self.cols)?.checked_add(pos.col)?;
        (pos.col < self.cols && idx < self.cells.len()).then_some(idx)
    }

    /// State of a white cell; `None` for blocks and out-of-grid positions
    pub fn get(&self, pos: Position) -> Option<&CellState> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut CellState> {
        self.index(pos).and_then(|i| self.cells[i].as_mut())
    }

    pub fn letter(&self, pos: Position) -> Option<char> {
        self.get(pos).and_then(|c| c.letter)
    }

    pub fn cells(&self) -> impl Iterator<Item = &CellState> {
        self.cells.iter().flatten()
    }

    /// Letters along a word in index order, `None` where empty
    pub fn word_letters(&self, placement: &PlacementEntry) -> Vec<Option<char>> {
        placement.cells().map(|pos| self.letter(pos)).collect()
    }

    /// First empty cell of a word, in word order
    pub fn first_empty_in(&self, placement: &PlacementEntry) -> Option<Position> {
        placement
            .cells()
            .find(|&pos| self.get(pos).is_some_and(CellState::is_empty))
    }

    /// Empty every cell and forget all statuses
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.reset();
        }
    }

    pub fn filled_count(&self) -> usize {
        self.cells().filter(|c| !c.is_empty()).count()
    }
}
