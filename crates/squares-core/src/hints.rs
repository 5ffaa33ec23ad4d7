//! Progressive hints.
//!
//! Three tiers, from free to budgeted:
//!
//! 1. Ambient: a vibe line and a breadcrumb derived from the theme, always shown.
//! 2. Reveals: sample words from the theme unlocked as the player gets
//!    cells right, at fixed thresholds.
//! 3. Smart hint: fills one correct letter into the active word and spends
//!    one unit of the streak-derived budget.

use crate::board::Board;
use crate::navigation::Navigator;
use crate::puzzle::{Position, PuzzleModel};
use crate::theme::Theme;
use crate::validation::check_cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tier 1 text for a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientHint {
    pub vibe: String,
    pub breadcrumb: String,
}

pub fn ambient(theme: &Theme) -> AmbientHint {
    AmbientHint {
        vibe: format!("✨ {}", theme.description),
        breadcrumb: format!("💭 Think {}...", theme.name.to_lowercase()),
    }
}

/// Correct-cell counts at which sample words unlock (tier 2).
/// Always strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealThresholds {
    /// First two words
    first: usize,
    /// Next two words
    second: usize,
    /// Everything left
    all: usize,
}

impl Default for RevealThresholds {
    fn default() -> Self {
        Self {
            first: 3,
            second: 5,
            all: 8,
        }
    }
}

impl RevealThresholds {
    /// `None` unless `first < second < all`
    pub fn new(first: usize, second: usize, all: usize) -> Option<Self> {
        (first < second && second < all).then_some(Self { first, second, all })
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn all(&self) -> usize {
        self.all
    }

    /// How many of `total` sample words are visible at `correct` cells
    pub fn revealed_count(&self, correct: usize, total: usize) -> usize {
        if correct >= self.all {
            total
        } else if correct >= self.second {
            total.min(4)
        } else if correct >= self.first {
            total.min(2)
        } else {
            0
        }
    }

    pub fn revealed_words(&self, sample_words: &[String], correct: usize) -> Vec<String> {
        sample_words[..self.revealed_count(correct, sample_words.len())].to_vec()
    }

    pub fn next_unlock_text(&self, correct: usize) -> String {
        if correct < self.first {
            format!("{} more for first reveal", self.first - correct)
        } else if correct < self.second {
            format!("{} more for next reveal", self.second - correct)
        } else if correct < self.all {
            format!("{} more to unlock all", self.all - correct)
        } else {
            "All unlocked!".to_string()
        }
    }
}

/// Why a smart hint did nothing. None of these are shown to the player
/// beyond the disabled affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintRefusal {
    /// Hints switched off in settings
    Disabled,
    /// The puzzle is already solved
    Completed,
    NoSelection,
    BudgetExhausted,
    /// Every cell of the active word already has a letter
    WordFilled,
}

impl fmt::Display for HintRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintRefusal::Disabled => write!(f, "hints are disabled"),
            HintRefusal::Completed => write!(f, "puzzle already completed"),
            HintRefusal::NoSelection => write!(f, "no cell selected"),
            HintRefusal::BudgetExhausted => write!(f, "no hints left"),
            HintRefusal::WordFilled => write!(f, "active word is already filled"),
        }
    }
}

/// Smart-hint spending for one puzzle attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintBudget {
    pub used: u32,
    /// Injected from the streak; never computed here
    pub max: u32,
}

impl HintBudget {
    pub fn new(max: u32) -> Self {
        Self { used: 0, max }
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }
}

/// Reveal the first empty letter of the active word (tier 3).
///
/// On success the cell holds the solution letter, is marked hinted and
/// re-validated, and one hint is spent. Filled cells are never overwritten,
/// even when wrong.
pub fn use_smart_hint(
    nav: &Navigator,
    puzzle: &PuzzleModel,
    board: &mut Board,
    budget: &mut HintBudget,
) -> Result<Position, HintRefusal> {
    if budget.is_exhausted() {
        return Err(HintRefusal::BudgetExhausted);
    }
    let placement = nav.active_placement(puzzle).ok_or(HintRefusal::NoSelection)?;
    let pos = board.first_empty_in(placement).ok_or(HintRefusal::WordFilled)?;
    let letter = puzzle.letter_at(pos).ok_or(HintRefusal::NoSelection)?;
    let cell = board.get_mut(pos).ok_or(HintRefusal::NoSelection)?;

    cell.letter = Some(letter);
    cell.hinted = true;
    let status = check_cell(cell, puzzle);
    cell.status = status;
    budget.used += 1;

    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellStatus;
    use crate::puzzle::{Direction, WordPlacement};
    use proptest::prelude::*;

    fn sample() -> Vec<String> {
        Theme::builtin().sample_words
    }

    fn slay_simp() -> (PuzzleModel, Board) {
        let puzzle = PuzzleModel::build(
            4,
            4,
            &[
                WordPlacement::new("SLAY", 0, 0, Direction::Across),
                WordPlacement::new("SIMP", 0, 0, Direction::Down),
            ],
        )
        .unwrap();
        let board = Board::new(&puzzle);
        (puzzle, board)
    }

    #[test]
    fn test_ambient() {
        let hint = ambient(&Theme::builtin());
        assert_eq!(hint.vibe, "✨ Basic slang terms every millennial and Gen Z should know");
        assert_eq!(hint.breadcrumb, "💭 Think urban dictionary essentials...");
    }

    #[test]
    fn test_reveal_steps() {
        let thresholds = RevealThresholds::default();
        let words = sample();

        let sizes: Vec<usize> = (0..=10)
            .map(|c| thresholds.revealed_words(&words, c).len())
            .collect();
        assert_eq!(sizes, vec![0, 0, 0, 2, 2, 4, 4, 4, 10, 10, 10]);

        assert_eq!(thresholds.revealed_words(&words, 5), vec!["RIZZ", "BUSSIN", "SLAY", "STAN"]);
    }

    #[test]
    fn test_reveal_short_sample_list() {
        let thresholds = RevealThresholds::default();
        let words = vec!["ONLY".to_string()];
        assert_eq!(thresholds.revealed_words(&words, 3), vec!["ONLY"]);
        assert_eq!(thresholds.revealed_words(&[], 9), Vec::<String>::new());
    }

    #[test]
    fn test_thresholds_must_increase() {
        assert_eq!(RevealThresholds::new(3, 5, 8), Some(RevealThresholds::default()));
        assert!(RevealThresholds::new(1, 2, 3).is_some());
        assert_eq!(RevealThresholds::new(5, 3, 8), None);
        assert_eq!(RevealThresholds::new(3, 3, 8), None);
        assert_eq!(RevealThresholds::new(3, 9, 8), None);

        let custom = RevealThresholds::new(1, 2, 3).unwrap();
        assert_eq!((custom.first(), custom.second(), custom.all()), (1, 2, 3));
    }

    #[test]
    fn test_next_unlock_text() {
        let thresholds = RevealThresholds::default();
        assert_eq!(thresholds.next_unlock_text(0), "3 more for first reveal");
        assert_eq!(thresholds.next_unlock_text(3), "2 more for next reveal");
        assert_eq!(thresholds.next_unlock_text(6), "2 more to unlock all");
        assert_eq!(thresholds.next_unlock_text(8), "All unlocked!");
        assert_eq!(thresholds.next_unlock_text(40), "All unlocked!");
    }

    #[test]
    fn test_smart_hint_fills_first_empty() {
        let (puzzle, mut board) = slay_simp();
        let mut nav = Navigator::new();
        nav.select_cell(&puzzle, Position::new(0, 2));
        board.get_mut(Position::new(0, 0)).unwrap().letter = Some('S');
        let mut budget = HintBudget::new(3);

        let pos = use_smart_hint(&nav, &puzzle, &mut board, &mut budget).unwrap();

        assert_eq!(pos, Position::new(0, 1));
        let cell = board.get(pos).unwrap();
        assert_eq!(cell.letter, Some('L'));
        assert!(cell.hinted);
        assert_eq!(cell.status, CellStatus::Correct);
        assert_eq!(budget.used, 1);
        assert_eq!(budget.remaining(), 2);
    }

    #[test]
    fn test_smart_hint_never_overwrites() {
        let (puzzle, mut board) = slay_simp();
        let mut nav = Navigator::new();
        nav.select_cell(&puzzle, Position::new(0, 0));
        for (col, letter) in "SLOP".chars().enumerate() {
            board.get_mut(Position::new(0, col)).unwrap().letter = Some(letter);
        }
        let mut budget = HintBudget::new(3);

        let result = use_smart_hint(&nav, &puzzle, &mut board, &mut budget);

        assert_eq!(result, Err(HintRefusal::WordFilled));
        assert_eq!(board.letter(Position::new(0, 2)), Some('O'));
        assert_eq!(budget.used, 0);
    }

    #[test]
    fn test_smart_hint_refusals() {
        let (puzzle, mut board) = slay_simp();
        let mut nav = Navigator::new();
        let mut budget = HintBudget::new(3);

        assert_eq!(
            use_smart_hint(&nav, &puzzle, &mut board, &mut budget),
            Err(HintRefusal::NoSelection)
        );

        nav.select_cell(&puzzle, Position::new(1, 0));
        budget.used = 3;
        assert_eq!(
            use_smart_hint(&nav, &puzzle, &mut board, &mut budget),
            Err(HintRefusal::BudgetExhausted)
        );
        assert_eq!(budget.used, 3);
        assert_eq!(board.filled_count(), 0);
    }

    proptest! {
        #[test]
        fn test_reveals_never_shrink(
            a in 0usize..20,
            b in 0usize..20,
            t in (0usize..6, 1usize..6, 1usize..6)
        ) {
            let thresholds = RevealThresholds::new(t.0, t.0 + t.1, t.0 + t.1 + t.2).unwrap();
            let words = sample();
            let (low, high) = (a.min(b), a.max(b));
            let fewer = thresholds.revealed_words(&words, low);
            let more = thresholds.revealed_words(&words, high);
            prop_assert!(fewer.len() <= more.len());
            prop_assert_eq!(&more[..fewer.len()], &fewer[..]);
        }
    }
}
