//! Cell selection and cursor movement.
//!
//! `advance`/`retreat` stay inside the active word; arrow movement walks the
//! raw grid and ignores word boundaries.

use crate::puzzle::{Direction, PlacementEntry, Position, PuzzleModel};

/// What the player currently has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Selected { pos: Position, direction: Direction },
}

/// Selection state machine over one puzzle
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    selection: Selection,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn active_cell(&self) -> Option<Position> {
        match self.selection {
            Selection::Selected { pos, .. } => Some(pos),
            Selection::None => None,
        }
    }

    pub fn active_direction(&self) -> Option<Direction> {
        match self.selection {
            Selection::Selected { direction, .. } => Some(direction),
            Selection::None => None,
        }
    }

    /// The word containing the active cell in the active direction
    pub fn active_placement<'a>(&self, puzzle: &'a PuzzleModel) -> Option<&'a PlacementEntry> {
        match self.selection {
            Selection::Selected { pos, direction } => {
                puzzle.placement_containing(pos.row, pos.col, direction)
            }
            Selection::None => None,
        }
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
    }

    /// Direction for a newly selected cell: keep the previous direction when
    /// the cell has words both ways, else the only direction it has.
    fn infer_direction(&self, puzzle: &PuzzleModel, pos: Position) -> Direction {
        let across = puzzle.placement_containing(pos.row, pos.col, Direction::Across).is_some();
        let down = puzzle.placement_containing(pos.row, pos.col, Direction::Down).is_some();
        match (across, down) {
            (true, true) => self.active_direction().unwrap_or(Direction::Across),
            (false, true) => Direction::Down,
            _ => Direction::Across,
        }
    }

    /// Select a white cell. Returns false (and keeps the old selection) for
    /// blocks or positions outside the grid.
    pub fn select_cell(&mut self, puzzle: &PuzzleModel, pos: Position) -> bool {
        if !puzzle.is_white(pos) {
            return false;
        }
        let direction = self.infer_direction(puzzle, pos);
        self.selection = Selection::Selected { pos, direction };
        true
    }

    /// Move one letter forward within the active word
    pub fn advance(&mut self, puzzle: &PuzzleModel) -> bool {
        self.step_in_word(puzzle, 1)
    }

    /// Move one letter back within the active word
    pub fn retreat(&mut self, puzzle: &PuzzleModel) -> bool {
        self.step_in_word(puzzle, -1)
    }

    fn step_in_word(&mut self, puzzle: &PuzzleModel, step: isize) -> bool {
        let Selection::Selected { pos, direction } = self.selection else {
            return false;
        };
        let Some(placement) = puzzle.placement_containing(pos.row, pos.col, direction) else {
            return false;
        };
        let Some(index) = placement.index_of(pos) else {
            return false;
        };

        match index.checked_add_signed(step) {
            Some(next) if next < placement.len() => {
                self.selection = Selection::Selected {
                    pos: placement.cell(next),
                    direction,
                };
                true
            }
            _ => false,
        }
    }

    /// Arrow-key movement to the adjacent white cell, if there is one
    pub fn move_directional(
        &mut self,
        puzzle: &PuzzleModel,
        row_delta: isize,
        col_delta: isize,
    ) -> bool {
        let Some(pos) = self.active_cell() else {
            return false;
        };
        match pos.offset(row_delta, col_delta) {
            Some(next) => self.select_cell(puzzle, next),
            None => false,
        }
    }

    /// Select a clue: its first cell, in its direction
    pub fn jump_to(&mut self, placement: &PlacementEntry) {
        self.selection = Selection::Selected {
            pos: placement.start(),
            direction: placement.direction,
        };
    }

    /// Switch direction on the active cell when it has a word the other way
    pub fn toggle_direction(&mut self, puzzle: &PuzzleModel) -> bool {
        let Selection::Selected { pos, direction } = self.selection else {
            return false;
        };
        let other = direction.other();
        if puzzle.placement_containing(pos.row, pos.col, other).is_none() {
            return false;
        }
        self.selection = Selection::Selected { pos, direction: other };
        true
    }
}
