//! Immutable crossword grid built from fixed word placements.

use crate::error::PuzzleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction a word runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Row/column step for one letter along this direction
    pub fn delta(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    pub fn other(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A cell coordinate (row-major, zero based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by a signed delta, returning `None` when it would go negative.
    /// Upper bounds are the caller's concern.
    pub fn offset(self, row_delta: isize, col_delta: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(row_delta)?,
            col: self.col.checked_add_signed(col_delta)?,
        })
    }
}

/// Input to [`PuzzleModel::build`]: one word at a fixed position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPlacement {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub clue: String,
}

impl WordPlacement {
    pub fn new(word: &str, row: usize, col: usize, direction: Direction) -> Self {
        Self {
            word: word.to_string(),
            row,
            col,
            direction,
            clue: String::new(),
        }
    }

    pub fn with_clue(mut self, clue: &str) -> Self {
        self.clue = clue.to_string();
        self
    }
}

/// A numbered word in a built puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEntry {
    /// Clue number, shared with a crossing word starting on the same cell
    pub number: u32,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    /// Uppercase A-Z
    pub answer: String,
    pub clue: String,
}

impl PlacementEntry {
    pub fn len(&self) -> usize {
        self.answer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty()
    }

    pub fn start(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Cell of letter `index`, in word order
    pub fn cell(&self, index: usize) -> Position {
        let (dr, dc) = self.direction.delta();
        Position::new(self.row + index * dr, self.col + index * dc)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len()).map(move |i| self.cell(i))
    }

    /// Index of `pos` within this word, if the word's span covers it
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        let index = match self.direction {
            Direction::Across if pos.row == self.row && pos.col >= self.col => pos.col - self.col,
            Direction::Down if pos.col == self.col && pos.row >= self.row => pos.row - self.row,
            _ => return None,
        };
        (index < self.len()).then_some(index)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index_of(pos).is_some()
    }

    pub fn letter(&self, index: usize) -> Option<char> {
        self.answer.as_bytes().get(index).map(|&b| b as char)
    }
}

/// Largest number of rows or columns a puzzle may have
pub const MAX_GRID_SIDE: usize = 64;

/// Reject dimensions over [`MAX_GRID_SIDE`]
pub fn check_size(rows: usize, cols: usize) -> Result<(), PuzzleError> {
    if rows > MAX_GRID_SIDE || cols > MAX_GRID_SIDE {
        return Err(PuzzleError::TooLarge {
            rows,
            cols,
            max: MAX_GRID_SIDE,
        });
    }
    Ok(())
}

/// The solved grid plus its across and down words.
///
/// Built once per loaded theme and never mutated; switching themes builds a
/// fresh model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleModel {
    rows: usize,
    cols: usize,
    /// Solution letter per cell, `None` for blocks
    grid: Vec<Option<char>>,
    numbers: Vec<Option<u32>>,
    across: BTreeMap<u32, PlacementEntry>,
    down: BTreeMap<u32, PlacementEntry>,
    /// Clue number of the across/down word covering each cell
    across_owner: Vec<Option<u32>>,
    down_owner: Vec<Option<u32>>,
}

impl PuzzleModel {
    /// Build a puzzle from placements. Letters are normalised to uppercase.
    pub fn build(
        rows: usize,
        cols: usize,
        placements: &[WordPlacement],
    ) -> Result<Self, PuzzleError> {
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        check_size(rows, cols)?;

        let cells = rows * cols;
        let mut grid: Vec<Option<char>> = vec![None; cells];
        // Index into `placements` of the word covering each cell, per direction
        let mut across_idx: Vec<Option<usize>> = vec![None; cells];
        let mut down_idx: Vec<Option<usize>> = vec![None; cells];
        let mut answers = Vec::with_capacity(placements.len());

        for (i, wp) in placements.iter().enumerate() {
            let answer = wp.word.to_ascii_uppercase();
            if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(PuzzleError::InvalidAnswer {
                    word: wp.word.clone(),
                });
            }

            let (dr, dc) = wp.direction.delta();
            let last = answer.len() - 1;
            let end_row = last.checked_mul(dr).and_then(|d| wp.row.checked_add(d));
            let end_col = last.checked_mul(dc).and_then(|d| wp.col.checked_add(d));
            let fits = matches!((end_row, end_col), (Some(r), Some(c)) if r < rows && c < cols);
            if !fits {
                return Err(PuzzleError::OutOfBounds {
                    word: answer,
                    row: wp.row,
                    col: wp.col,
                });
            }

            for (k, letter) in answer.chars().enumerate() {
                let (row, col) = (wp.row + k * dr, wp.col + k * dc);
                let idx = row * cols + col;

                let owner = match wp.direction {
                    Direction::Across => &mut across_idx[idx],
                    Direction::Down => &mut down_idx[idx],
                };
                if owner.is_some() {
                    return Err(PuzzleError::DuplicatePlacement {
                        direction: wp.direction,
                        row,
                        col,
                    });
                }
                *owner = Some(i);

                if let Some(existing) = grid[idx] {
                    if existing != letter {
                        return Err(PuzzleError::Conflict {
                            row,
                            col,
                            existing,
                            incoming: letter,
                        });
                    }
                }
                grid[idx] = Some(letter);
            }

            answers.push(answer);
        }

        // Raster-order numbering over cells where any word starts
        let mut starts: Vec<Vec<usize>> = vec![Vec::new(); cells];
        for (i, wp) in placements.iter().enumerate() {
            starts[wp.row * cols + wp.col].push(i);
        }

        let mut numbers = vec![None; cells];
        let mut number_of = vec![0u32; placements.len()];
        let mut next = 1;
        for (idx, words) in starts.iter().enumerate() {
            if words.is_empty() {
                continue;
            }
            numbers[idx] = Some(next);
            for &i in words {
                number_of[i] = next;
            }
            next += 1;
        }

        let mut across = BTreeMap::new();
        let mut down = BTreeMap::new();
        for (i, (wp, answer)) in placements.iter().zip(answers).enumerate() {
            let entry = PlacementEntry {
                number: number_of[i],
                row: wp.row,
                col: wp.col,
                direction: wp.direction,
                answer,
                clue: wp.clue.clone(),
            };
            match wp.direction {
                Direction::Across => across.insert(entry.number, entry),
                Direction::Down => down.insert(entry.number, entry),
            };
        }

        let owner_numbers = |idx: Vec<Option<usize>>| -> Vec<Option<u32>> {
            idx.into_iter().map(|i| i.map(|i| number_of[i])).collect()
        };

        Ok(Self {
            rows,
            cols,
            grid,
            numbers,
            across,
            down,
            across_owner: owner_numbers(across_idx),
            down_owner: owner_numbers(down_idx),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols).then(|| pos.row * self.cols + pos.col)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Solution letter at `pos`; `None` for blocks and out-of-grid positions
    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.index(pos).and_then(|i| self.grid[i])
    }

    pub fn is_white(&self, pos: Position) -> bool {
        self.letter_at(pos).is_some()
    }

    pub fn clue_number_at(&self, row: usize, col: usize) -> Option<u32> {
        self.index(Position::new(row, col)).and_then(|i| self.numbers[i])
    }

    /// The `direction` word whose span covers `(row, col)`
    pub fn placement_containing(
        &self,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Option<&PlacementEntry> {
        let idx = self.index(Position::new(row, col))?;
        match direction {
            Direction::Across => self.across_owner[idx].and_then(|n| self.across.get(&n)),
            Direction::Down => self.down_owner[idx].and_then(|n| self.down.get(&n)),
        }
    }

    pub fn placement(&self, number: u32, direction: Direction) -> Option<&PlacementEntry> {
        match direction {
            Direction::Across => self.across.get(&number),
            Direction::Down => self.down.get(&number),
        }
    }

    /// Words in one direction, in clue-number order
    pub fn placements(&self, direction: Direction) -> impl Iterator<Item = &PlacementEntry> {
        match direction {
            Direction::Across => self.across.values(),
            Direction::Down => self.down.values(),
        }
    }

    pub fn all_placements(&self) -> impl Iterator<Item = &PlacementEntry> {
        self.across.values().chain(self.down.values())
    }

    /// White cells in raster order
    pub fn white_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|_| Position::new(i / self.cols, i % self.cols))
        })
    }

    pub fn white_count(&self) -> usize {
        self.grid.iter().filter(|c| c.is_some()).count()
    }
}

impl fmt::Display for PuzzleModel {
    /// Solution grid, `#` for blocks
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell.unwrap_or('#'))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
