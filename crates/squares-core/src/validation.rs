//! Correctness checks of player letters against the puzzle solution.
//!
//! Everything here is a pure function of its inputs; the session decides
//! when to run them and writes results back to the board.

use crate::board::{Board, CellState, CellStatus};
use crate::puzzle::{PlacementEntry, PuzzleModel};

/// Status a cell should have given its current letter
pub fn check_cell(cell: &CellState, puzzle: &PuzzleModel) -> CellStatus {
    match cell.letter {
        None => CellStatus::Unset,
        Some(letter) if puzzle.letter_at(cell.pos) == Some(letter) => CellStatus::Correct,
        Some(_) => CellStatus::Incorrect,
    }
}

/// Whether the word is completely and exactly filled in.
/// A partially filled word is never correct.
pub fn check_word(placement: &PlacementEntry, board: &Board) -> bool {
    let letters = board.word_letters(placement);
    letters.len() == placement.len()
        && letters
            .iter()
            .zip(placement.answer.chars())
            .all(|(entered, answer)| *entered == Some(answer))
}

/// Every white cell is `Correct`. An empty set of cells is never complete.
pub fn check_completion<'a, I>(cells: I) -> bool
where
    I: IntoIterator<Item = &'a CellState>,
{
    let mut total = 0;
    for cell in cells {
        if cell.status != CellStatus::Correct {
            return false;
        }
        total += 1;
    }
    total > 0
}

/// Share of white cells currently `Correct`, rounded to a whole percent
pub fn progress_percent(board: &Board) -> u8 {
    let (correct, total) = board.cells().fold((0usize, 0usize), |(correct, total), cell| {
        (correct + usize::from(cell.status == CellStatus::Correct), total + 1)
    });
    if total == 0 {
        return 0;
    }
    ((correct * 100 + total / 2) / total) as u8
}
