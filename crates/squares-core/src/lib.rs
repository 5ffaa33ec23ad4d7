//! Themed crossword engine
//!
//! This crate holds everything about a SlangSquares game except drawing it:
//! the puzzle grid built from fixed word placements, the player's board,
//! answer checking, cursor movement, the three hint tiers and the daily
//! streak that sets the smart-hint budget. [`Session`] ties them together
//! and reports changes as [`SessionEvent`]s for a front-end to render.

mod board;
mod error;
mod hints;
mod navigation;
mod puzzle;
mod session;
mod source;
mod streak;
mod theme;
mod timer;
mod validation;

pub use board::{Board, CellState, CellStatus};
pub use error::{DataError, PuzzleError, StoreError};
pub use hints::{ambient, use_smart_hint, AmbientHint, HintBudget, HintRefusal, RevealThresholds};
pub use navigation::{Navigator, Selection};
pub use puzzle::{
    check_size, Direction, PlacementEntry, Position, PuzzleModel, WordPlacement, MAX_GRID_SIDE,
};
pub use session::{CompletionSummary, GameState, Session, SessionEvent, Settings};
pub use source::{
    builtin_placements, builtin_puzzle, ClueEntry, GridSize, MemorySource, PuzzleDirectory,
    PuzzleLoader, PuzzleOrigin, PuzzlePayload, PuzzleSource, SampleFile, DEFAULT_SIZE,
};
pub use streak::{
    commit as commit_streak, max_hints, record_completion, Clock, FixedClock, KeyValueStore,
    LocalClock, MemoryStore, StreakRecord, StreakUpdate, BASE_HINTS, LAST_PLAY_KEY,
    STREAK_BONUS_PERIOD, STREAK_KEY,
};
pub use theme::{Theme, ThemeCatalog, DEFAULT_THEME_KEY};
pub use timer::{format_time, ElapsedTimer};
pub use validation::{check_cell, check_completion, check_word, progress_percent};
