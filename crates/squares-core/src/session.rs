//! One player's session: the loaded theme and puzzle, the board, selection,
//! hints, timer and streak, driven by input events from the front-end.
//!
//! The session never draws anything. State changes are queued as
//! [`SessionEvent`]s for the front-end to drain after each input.

use crate::board::{Board, CellStatus};
use crate::error::DataError;
use crate::hints::{self, AmbientHint, HintBudget, HintRefusal, RevealThresholds};
use crate::navigation::Navigator;
use crate::puzzle::{Direction, Position, PuzzleModel};
use crate::source::{builtin_puzzle, PuzzleLoader, PuzzleOrigin};
use crate::streak::{self, record_completion, Clock, KeyValueStore, StreakRecord, StreakUpdate};
use crate::theme::{Theme, ThemeCatalog, DEFAULT_THEME_KEY};
use crate::timer::{format_time, ElapsedTimer};
use crate::validation::{check_cell, check_completion, check_word, progress_percent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Player preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run the elapsed timer
    pub show_timer: bool,
    /// Allow smart hints
    pub allow_hints: bool,
    /// Ring the bell on hints and completion
    pub sound_fx: bool,
    /// Validate each letter as it is typed
    pub auto_check: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_timer: true,
            allow_hints: true,
            sound_fx: true,
            auto_check: true,
        }
    }
}

/// Progress through the current puzzle attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Cells that have turned correct at least once this attempt
    pub correct_count: usize,
    pub hints: HintBudget,
    pub revealed_words: Vec<String>,
    pub completed: bool,
    /// Words currently filled in exactly
    pub completed_words: BTreeSet<(Direction, u32)>,
}

impl GameState {
    fn new(max_hints: u32) -> Self {
        Self {
            correct_count: 0,
            hints: HintBudget::new(max_hints),
            revealed_words: Vec::new(),
            completed: false,
            completed_words: BTreeSet::new(),
        }
    }

    pub fn hints_used(&self) -> u32 {
        self.hints.used
    }

    pub fn max_hints(&self) -> u32 {
        self.hints.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub theme_name: String,
    pub elapsed_secs: u64,
    pub hints_used: u32,
    pub streak: u32,
}

impl CompletionSummary {
    /// Brag line for the clipboard
    pub fn share_text(&self) -> String {
        format!(
            "🔥 Just completed \"{}\" in {}! Used {} hints, {}-day streak! Play SlangSquares!",
            self.theme_name,
            format_time(self.elapsed_secs),
            self.hints_used,
            self.streak
        )
    }
}

/// Output for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PuzzleLoaded,
    CellChanged { row: usize, col: usize },
    SelectionChanged,
    /// Budget, reveals or unlock text changed
    HintsChanged,
    TimerTick { elapsed_secs: u64 },
    Completed(CompletionSummary),
    /// Transient toast
    Achievement { title: String, subtitle: String },
}

impl SessionEvent {
    fn achievement(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        SessionEvent::Achievement {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

pub struct Session {
    catalog: ThemeCatalog,
    loader: PuzzleLoader,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    settings: Settings,
    thresholds: RevealThresholds,
    theme_key: String,
    theme: Theme,
    puzzle: PuzzleModel,
    origin: PuzzleOrigin,
    board: Board,
    nav: Navigator,
    state: GameState,
    /// Read from the store at startup, replaced on each completion
    streak: StreakRecord,
    timer: ElapsedTimer,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Start a session on `theme_key`, or on the catalog's first theme if
    /// the key is unknown.
    pub fn new(
        catalog: ThemeCatalog,
        loader: PuzzleLoader,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        settings: Settings,
        theme_key: &str,
    ) -> Self {
        let streak = StreakRecord::load(store.as_ref());
        let (key, theme) = match catalog.get(theme_key) {
            Some(theme) => (theme_key.to_string(), theme.clone()),
            None => {
                warn!(theme = theme_key, "unknown theme, starting on the first one");
                catalog
                    .first()
                    .map(|(key, theme)| (key.to_string(), theme.clone()))
                    .unwrap_or_else(|| (DEFAULT_THEME_KEY.to_string(), Theme::builtin()))
            }
        };

        let puzzle = builtin_puzzle();
        let board = Board::new(&puzzle);
        let mut session = Self {
            catalog,
            loader,
            store,
            clock,
            settings,
            thresholds: RevealThresholds::default(),
            theme_key: String::new(),
            theme: Theme::builtin(),
            puzzle,
            origin: PuzzleOrigin::Builtin,
            board,
            nav: Navigator::new(),
            state: GameState::new(streak.max_hints()),
            streak,
            timer: ElapsedTimer::new(),
            events: Vec::new(),
        };
        session.install(key, theme);
        session
    }

    pub fn with_thresholds(mut self, thresholds: RevealThresholds) -> Self {
        self.thresholds = thresholds;
        self.refresh_reveals();
        self
    }

    /// Switch to another theme from the catalog. Unknown keys leave the
    /// current puzzle in place.
    pub fn load_theme(&mut self, theme_key: &str) -> Result<(), DataError> {
        let theme = self
            .catalog
            .get(theme_key)
            .cloned()
            .ok_or_else(|| DataError::MissingTheme(theme_key.to_string()))?;
        self.install(theme_key.to_string(), theme);
        Ok(())
    }

    fn install(&mut self, key: String, theme: Theme) {
        let (puzzle, origin) = self.loader.load(&key);
        info!(theme = %key, name = %theme.name, ?origin, "theme loaded");

        self.board = Board::new(&puzzle);
        self.puzzle = puzzle;
        self.origin = origin;
        self.theme_key = key;
        self.theme = theme;
        self.nav.clear();
        self.state = GameState::new(self.streak.max_hints());
        self.timer.reset();
        self.refresh_reveals();

        self.events.push(SessionEvent::PuzzleLoaded);
        self.events.push(SessionEvent::HintsChanged);
    }

    // Selection

    pub fn select_cell(&mut self, pos: Position) -> bool {
        let moved = self.nav.select_cell(&self.puzzle, pos);
        if moved {
            self.events.push(SessionEvent::SelectionChanged);
        }
        moved
    }

    /// Arrow-key movement
    pub fn move_selection(&mut self, row_delta: isize, col_delta: isize) -> bool {
        let moved = self.nav.move_directional(&self.puzzle, row_delta, col_delta);
        if moved {
            self.events.push(SessionEvent::SelectionChanged);
        }
        moved
    }

    /// Select a clue from the clue list
    pub fn jump_to(&mut self, number: u32, direction: Direction) -> bool {
        let Some(placement) = self.puzzle.placement(number, direction) else {
            return false;
        };
        self.nav.jump_to(placement);
        self.events.push(SessionEvent::SelectionChanged);
        true
    }

    pub fn toggle_direction(&mut self) -> bool {
        let toggled = self.nav.toggle_direction(&self.puzzle);
        if toggled {
            self.events.push(SessionEvent::SelectionChanged);
        }
        toggled
    }

    // Input

    /// Type a letter into the active cell and advance within the word.
    /// Non-letters, no selection and a completed puzzle are ignored.
    pub fn enter_letter(&mut self, letter: char) -> bool {
        if self.state.completed || !letter.is_ascii_alphabetic() {
            return false;
        }
        let Some(pos) = self.nav.active_cell() else {
            return false;
        };
        let Some(cell) = self.board.get_mut(pos) else {
            return false;
        };

        cell.letter = Some(letter.to_ascii_uppercase());
        cell.hinted = false;
        cell.status = CellStatus::Unset;
        if self.settings.auto_check {
            self.validate_cell(pos);
        }
        self.settle(&[pos]);

        if !self.state.completed && self.nav.advance(&self.puzzle) {
            self.events.push(SessionEvent::SelectionChanged);
        }
        true
    }

    /// Empty the active cell if it has a letter, then step back in the word
    pub fn backspace(&mut self) -> bool {
        if self.state.completed {
            return false;
        }
        let Some(pos) = self.nav.active_cell() else {
            return false;
        };

        let cleared = match self.board.get_mut(pos) {
            Some(cell) if !cell.is_empty() => {
                cell.letter = None;
                cell.hinted = false;
                cell.status = CellStatus::Unset;
                true
            }
            _ => false,
        };
        if cleared {
            self.settle(&[pos]);
        }

        let moved = self.nav.retreat(&self.puzzle);
        if moved {
            self.events.push(SessionEvent::SelectionChanged);
        }
        cleared || moved
    }

    /// Validate every white cell
    pub fn check_all(&mut self) -> bool {
        if self.state.completed {
            return false;
        }
        let cells: Vec<Position> = self.puzzle.white_cells().collect();
        for &pos in &cells {
            self.validate_cell(pos);
        }
        self.settle(&cells);
        true
    }

    /// Empty the board. The hint budget already spent stays spent.
    pub fn clear_all(&mut self) -> bool {
        if self.state.completed {
            return false;
        }
        self.board.clear();
        self.state.correct_count = 0;
        self.state.revealed_words.clear();
        self.state.completed_words.clear();

        for pos in self.puzzle.white_cells() {
            self.events.push(SessionEvent::CellChanged {
                row: pos.row,
                col: pos.col,
            });
        }
        self.events.push(SessionEvent::HintsChanged);
        true
    }

    /// Reveal one letter of the active word. Returns whether a letter was
    /// actually revealed.
    pub fn use_smart_hint(&mut self) -> bool {
        let pos = match self.try_smart_hint() {
            Ok(pos) => pos,
            Err(refusal) => {
                debug!(%refusal, "smart hint refused");
                return false;
            }
        };

        self.validate_cell(pos);
        info!(
            row = pos.row,
            col = pos.col,
            remaining = self.state.hints.remaining(),
            "smart hint used"
        );
        self.events.push(SessionEvent::HintsChanged);
        self.events
            .push(SessionEvent::achievement("💡 Hint Used", "Letter revealed!"));
        self.settle(&[pos]);
        true
    }

    fn try_smart_hint(&mut self) -> Result<Position, HintRefusal> {
        if !self.settings.allow_hints {
            return Err(HintRefusal::Disabled);
        }
        if self.state.completed {
            return Err(HintRefusal::Completed);
        }
        hints::use_smart_hint(&self.nav, &self.puzzle, &mut self.board, &mut self.state.hints)
    }

    /// Whether the smart-hint affordance should be enabled
    pub fn hint_available(&self) -> bool {
        self.settings.allow_hints
            && !self.state.completed
            && self.nav.active_cell().is_some()
            && self.state.hints.remaining() > 0
    }

    // Timer

    /// Drive the elapsed timer. It runs while the timer is shown and the
    /// puzzle is unsolved, starting from the first poll after a load.
    pub fn poll_timer(&mut self, now: Instant) {
        if self.settings.show_timer && !self.state.completed {
            self.timer.start(now);
        } else {
            self.timer.stop();
        }
        if self.timer.poll(now) > 0 {
            self.events.push(SessionEvent::TimerTick {
                elapsed_secs: self.timer.elapsed_secs(),
            });
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // Internals

    /// Re-check one cell, counting it the first time it turns correct
    fn validate_cell(&mut self, pos: Position) {
        let Some(cell) = self.board.get_mut(pos) else {
            return;
        };
        let status = check_cell(cell, &self.puzzle);
        cell.status = status;
        if status == CellStatus::Correct && !cell.counted {
            cell.counted = true;
            self.state.correct_count += 1;
        }
    }

    /// Bookkeeping after cells changed: events, word tracking, reveals and
    /// completion.
    fn settle(&mut self, changed: &[Position]) {
        for &pos in changed {
            self.events.push(SessionEvent::CellChanged {
                row: pos.row,
                col: pos.col,
            });
            self.track_words(pos);
        }
        self.refresh_reveals();

        if !self.state.completed && check_completion(self.board.cells()) {
            self.complete();
        }
    }

    fn track_words(&mut self, pos: Position) {
        for direction in [Direction::Across, Direction::Down] {
            let Some(placement) = self
                .puzzle
                .placement_containing(pos.row, pos.col, direction)
            else {
                continue;
            };
            let key = (direction, placement.number);
            if check_word(placement, &self.board) {
                self.state.completed_words.insert(key);
            } else {
                self.state.completed_words.remove(&key);
            }
        }
    }

    fn refresh_reveals(&mut self) {
        let revealed = self
            .thresholds
            .revealed_words(&self.theme.sample_words, self.state.correct_count);
        if revealed != self.state.revealed_words {
            self.state.revealed_words = revealed;
            self.events.push(SessionEvent::HintsChanged);
        }
    }

    fn complete(&mut self) {
        self.state.completed = true;
        self.timer.stop();

        let today = self.clock.today();
        let update = match streak::commit(self.store.as_mut(), today) {
            Ok(update) => update,
            Err(err) => {
                warn!(%err, "failed to save streak, keeping it for this session only");
                StreakUpdate {
                    previous: self.streak,
                    current: record_completion(self.streak, today),
                }
            }
        };
        self.streak = update.current;

        let max_hints = self.streak.max_hints();
        if max_hints != self.state.hints.max {
            self.state.hints.max = max_hints;
            self.events.push(SessionEvent::HintsChanged);
        }

        let summary = CompletionSummary {
            theme_name: self.theme.name.clone(),
            elapsed_secs: self.timer.elapsed_secs(),
            hints_used: self.state.hints.used,
            streak: self.streak.current_streak,
        };
        info!(
            theme = %self.theme_key,
            elapsed_secs = summary.elapsed_secs,
            hints_used = summary.hints_used,
            streak = summary.streak,
            "puzzle completed"
        );

        self.events.push(SessionEvent::achievement(
            "🎉 Puzzle Complete!",
            format!("Finished in {}", format_time(summary.elapsed_secs)),
        ));
        if update.changed() && summary.streak > 1 {
            self.events.push(SessionEvent::achievement(
                format!("🔥 {}-Day Streak!", summary.streak),
                "Keep the momentum going!",
            ));
        }
        self.events.push(SessionEvent::Completed(summary));
    }

    // Accessors

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn theme_key(&self) -> &str {
        &self.theme_key
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn puzzle(&self) -> &PuzzleModel {
        &self.puzzle
    }

    /// Which source tier the current puzzle came from
    pub fn origin(&self) -> &PuzzleOrigin {
        &self.origin
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn streak(&self) -> StreakRecord {
        self.streak
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Takes effect immediately; the timer follows `show_timer` on the next poll
    pub fn set_settings(&mut self, settings: Settings) {
        debug!(?settings, "settings changed");
        self.settings = settings;
        self.events.push(SessionEvent::HintsChanged);
    }

    pub fn thresholds(&self) -> RevealThresholds {
        self.thresholds
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn timer_text(&self) -> String {
        format_time(self.timer.elapsed_secs())
    }

    pub fn ambient_hint(&self) -> AmbientHint {
        hints::ambient(&self.theme)
    }

    pub fn next_unlock_text(&self) -> String {
        self.thresholds.next_unlock_text(self.state.correct_count)
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(&self.board)
    }

    /// Cells of the active word, for highlighting
    pub fn active_word_cells(&self) -> Vec<Position> {
        self.nav
            .active_placement(&self.puzzle)
            .map(|placement| placement.cells().collect())
            .unwrap_or_default()
    }

    pub fn is_word_complete(&self, number: u32, direction: Direction) -> bool {
        self.state.completed_words.contains(&(direction, number))
    }
}
