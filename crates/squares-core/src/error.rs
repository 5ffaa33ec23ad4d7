//! Error types for puzzle construction, data loading and persistence.

use crate::puzzle::Direction;
use thiserror::Error;

/// Malformed placement data caught while building a [`PuzzleModel`](crate::PuzzleModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("placements disagree at ({row}, {col}): '{existing}' vs '{incoming}'")]
    Conflict {
        row: usize,
        col: usize,
        existing: char,
        incoming: char,
    },
    #[error("word {word} at ({row}, {col}) does not fit in the grid")]
    OutOfBounds { word: String, row: usize, col: usize },
    #[error("answer {word:?} must be one or more letters A-Z")]
    InvalidAnswer { word: String },
    #[error("two {direction} words overlap at ({row}, {col})")]
    DuplicatePlacement {
        direction: Direction,
        row: usize,
        col: usize,
    },
    #[error("grid has no rows or columns")]
    EmptyGrid,
    #[error("grid of {rows}x{cols} exceeds the {max}x{max} limit")]
    TooLarge { rows: usize, cols: usize, max: usize },
}

/// Missing or malformed theme/puzzle data. Always recoverable by falling
/// back to the next data source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no theme named {0:?}")]
    MissingTheme(String),
    #[error("invalid puzzle: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error("shipped grid disagrees with placements at ({row}, {col})")]
    GridMismatch { row: usize, col: usize },
}

/// Failure reading or writing the key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
