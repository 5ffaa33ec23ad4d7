use crate::palette::Palette;
use crate::storage;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::seq::SliceRandom;
use squares_core::{CompletionSummary, Direction, Position, Session, SessionEvent, Settings};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Toast lifetime in ticks (~3 seconds at 100ms)
const MESSAGE_TICKS: u32 = 30;

/// Cell size on screen, in terminal columns and rows
pub const CELL_WIDTH: u16 = 4;
pub const CELL_HEIGHT: u16 = 2;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal play (read-only once solved)
    Playing,
    /// Completion summary overlay
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    /// Pick a day/theme from the catalog
    Themes,
    /// Pick a colour palette
    Palette,
    Settings,
    /// Confirm clearing the board
    ConfirmClear,
}

/// Screen region of one clue in the clue list, for mouse selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClueHitbox {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub number: u32,
    pub direction: Direction,
}

/// The main application state
pub struct App {
    /// Engine state for the current puzzle
    pub session: Session,
    pub palette: Palette,
    pub menu: MenuState,
    /// Selected menu item
    pub menu_selection: usize,
    pub screen_state: ScreenState,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Toasts waiting for the current one to expire
    queued_messages: VecDeque<String>,
    /// Summary of the solved puzzle, shown on the completion screen
    pub summary: Option<CompletionSummary>,
    /// Ring the terminal bell on the next render
    pub bell: bool,
    /// Top-left corner of the grid, set by the renderer
    pub grid_origin: (u16, u16),
    /// Clue list layout, set by the renderer
    pub clue_hitboxes: Vec<ClueHitbox>,
    /// Where settings changes are saved; `None` keeps them in memory
    settings_path: Option<PathBuf>,
}

impl App {
    pub fn new(session: Session, settings_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            session,
            palette: Palette::dark(),
            menu: MenuState::None,
            menu_selection: 0,
            screen_state: ScreenState::Playing,
            message: None,
            message_timer: 0,
            queued_messages: VecDeque::new(),
            summary: None,
            bell: false,
            grid_origin: (0, 0),
            clue_hitboxes: Vec::new(),
            settings_path,
        };
        app.pump_events();
        app
    }

    /// Update the timer and toasts (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
                if let Some(next) = self.queued_messages.pop_front() {
                    self.set_message(next);
                }
            }
        }

        self.session.poll_timer(Instant::now());
        self.pump_events();
    }

    /// Show a temporary message, after any already on screen
    pub fn show_message(&mut self, msg: &str) {
        if self.message.is_some() {
            self.queued_messages.push_back(msg.to_string());
        } else {
            self.set_message(msg.to_string());
        }
    }

    fn set_message(&mut self, msg: String) {
        self.message = Some(msg);
        self.message_timer = MESSAGE_TICKS;
    }

    /// React to what the session reported since the last call
    fn pump_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::Achievement { title, subtitle } => {
                    self.show_message(&format!("{title} {subtitle}"));
                }
                SessionEvent::Completed(summary) => {
                    self.summary = Some(summary);
                    self.screen_state = ScreenState::Complete;
                    self.ring();
                }
                SessionEvent::PuzzleLoaded => {
                    self.summary = None;
                    self.screen_state = ScreenState::Playing;
                }
                SessionEvent::CellChanged { .. }
                | SessionEvent::SelectionChanged
                | SessionEvent::HintsChanged
                | SessionEvent::TimerTick { .. } => {}
            }
        }
    }

    fn ring(&mut self) {
        if self.session.settings().sound_fx {
            self.bell = true;
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let action = match self.screen_state {
            ScreenState::Complete => self.handle_complete_key(key),
            ScreenState::Playing => match self.menu {
                MenuState::None => self.handle_game_key(key),
                MenuState::Themes
                | MenuState::Palette
                | MenuState::Settings
                | MenuState::ConfirmClear => self.handle_menu_key(key),
            },
        };
        self.pump_events();
        action
    }

    fn handle_complete_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AppAction::Quit
            }
            KeyCode::Enter | KeyCode::Char('n') => self.try_another(),
            KeyCode::Char('t') => self.open_menu(MenuState::Themes),
            // Back to the solved board
            KeyCode::Esc => self.screen_state = ScreenState::Playing,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return AppAction::Quit,
            KeyCode::Char('t') if ctrl => self.open_menu(MenuState::Themes),
            KeyCode::Char('p') if ctrl => self.open_menu(MenuState::Palette),
            KeyCode::Char('s') if ctrl => self.open_menu(MenuState::Settings),
            KeyCode::Char('n') if ctrl => self.try_another(),

            // Letter entry
            KeyCode::Char(c) if c.is_ascii_alphabetic() && !ctrl => {
                if self.session.state().completed {
                    self.show_message("Already solved! Ctrl+N for another");
                } else if self.session.navigator().active_cell().is_none() {
                    self.show_message("Pick a cell first");
                } else {
                    self.session.enter_letter(c);
                }
            }

            // Navigation
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Tab | KeyCode::Char(' ') => {
                self.session.toggle_direction();
            }
            KeyCode::Char(']') => self.cycle_clue(1),
            KeyCode::Char('[') => self.cycle_clue(-1),

            KeyCode::Backspace | KeyCode::Delete => {
                self.session.backspace();
            }

            // Smart hint
            KeyCode::Char('?') => {
                if self.session.use_smart_hint() {
                    self.ring();
                } else {
                    let reason = self.hint_refusal_text();
                    self.show_message(reason);
                }
            }

            // Check every cell
            KeyCode::Char('!') => {
                if self.session.check_all() {
                    let percent = self.session.progress_percent();
                    self.show_message(&format!("Checked: {percent}% correct"));
                }
            }

            KeyCode::Char('~') => {
                if !self.session.state().completed {
                    self.open_menu(MenuState::ConfirmClear);
                }
            }

            _ => {}
        }

        AppAction::Continue
    }

    fn hint_refusal_text(&self) -> &'static str {
        let state = self.session.state();
        if !self.session.settings().allow_hints {
            "Hints are turned off"
        } else if state.completed {
            "Already solved!"
        } else if self.session.navigator().active_cell().is_none() {
            "Pick a cell first"
        } else if state.hints.remaining() == 0 {
            "No hints left today"
        } else {
            "That word is already filled"
        }
    }

    fn open_menu(&mut self, menu: MenuState) {
        self.menu_selection = match menu {
            MenuState::Themes => self
                .session
                .catalog()
                .keys()
                .position(|key| key == self.session.theme_key())
                .unwrap_or(0),
            MenuState::Palette => (0..Palette::NAMES.len())
                .position(|i| Palette::by_index(i) == self.palette)
                .unwrap_or(0),
            _ => 0,
        };
        self.menu = menu;
        self.screen_state = ScreenState::Playing;
    }

    /// Number of entries in the open menu
    pub fn menu_len(&self) -> usize {
        match self.menu {
            MenuState::Themes => self.session.catalog().len(),
            MenuState::Palette => Palette::NAMES.len(),
            MenuState::Settings => self.settings_items().len(),
            MenuState::ConfirmClear => 2,
            MenuState::None => 0,
        }
    }

    /// Settings menu rows: label and current value
    pub fn settings_items(&self) -> [(&'static str, bool); 4] {
        let settings = self.session.settings();
        [
            ("Show timer", settings.show_timer),
            ("Smart hints", settings.allow_hints),
            ("Sound", settings.sound_fx),
            ("Auto-check", settings.auto_check),
        ]
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => self.menu = MenuState::None,
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AppAction::Quit
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < self.menu_len() {
                    self.menu_selection += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => match self.menu {
                MenuState::Themes => {
                    let key = self
                        .session
                        .catalog()
                        .keys()
                        .nth(self.menu_selection)
                        .map(str::to_string);
                    if let Some(key) = key {
                        self.load_theme(&key);
                    }
                    self.menu = MenuState::None;
                }
                MenuState::Palette => {
                    self.palette = Palette::by_index(self.menu_selection);
                    self.menu = MenuState::None;
                }
                MenuState::Settings => {
                    // Stays open so several switches can be flipped
                    self.toggle_setting(self.menu_selection);
                }
                MenuState::ConfirmClear => {
                    if self.menu_selection == 0 && self.session.clear_all() {
                        self.show_message("Board cleared");
                    }
                    self.menu = MenuState::None;
                }
                MenuState::None => {}
            },

            _ => {}
        }

        AppAction::Continue
    }

    fn toggle_setting(&mut self, index: usize) {
        let mut settings = self.session.settings();
        let flag = match index {
            0 => &mut settings.show_timer,
            1 => &mut settings.allow_hints,
            2 => &mut settings.sound_fx,
            _ => &mut settings.auto_check,
        };
        *flag = !*flag;
        self.apply_settings(settings);
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.session.set_settings(settings);
        if let Some(path) = &self.settings_path {
            if let Err(err) = storage::save_settings(path, &settings) {
                warn!(%err, "failed to save settings");
                self.show_message("Failed to save settings");
            }
        }
    }

    fn load_theme(&mut self, key: &str) {
        match self.session.load_theme(key) {
            Ok(()) => {
                let name = self.session.theme().name.clone();
                self.show_message(&format!("{key}: {name}"));
            }
            Err(err) => {
                warn!(%err, "theme switch failed");
                self.show_message("Couldn't load that theme");
            }
        }
    }

    /// Load a random theme, preferring one other than the current
    pub fn try_another(&mut self) {
        let current = self.session.theme_key().to_string();
        let keys: Vec<String> = self.session.catalog().keys().map(str::to_string).collect();
        let others: Vec<&String> = keys.iter().filter(|key| **key != current).collect();

        let mut rng = rand::thread_rng();
        let pick = others
            .choose(&mut rng)
            .map(|key| key.to_string())
            .unwrap_or(current);
        self.load_theme(&pick);
    }

    /// Arrow keys. With nothing selected, the first arrow selects the first
    /// white cell.
    fn move_cursor(&mut self, row_delta: isize, col_delta: isize) {
        if self.session.navigator().active_cell().is_none() {
            let first = self.session.puzzle().white_cells().next();
            if let Some(first) = first {
                self.session.select_cell(first);
            }
            return;
        }
        self.session.move_selection(row_delta, col_delta);
    }

    /// Jump to the next/previous clue, across clues first then down
    fn cycle_clue(&mut self, step: isize) {
        let clues: Vec<(u32, Direction)> = self
            .session
            .puzzle()
            .all_placements()
            .map(|p| (p.number, p.direction))
            .collect();
        if clues.is_empty() {
            return;
        }

        let current = self
            .session
            .navigator()
            .active_placement(self.session.puzzle())
            .and_then(|p| clues.iter().position(|&c| c == (p.number, p.direction)));
        let len = clues.len() as isize;
        let next = match current {
            Some(i) => (i as isize + step).rem_euclid(len) as usize,
            None if step < 0 => clues.len() - 1,
            None => 0,
        };
        let (number, direction) = clues[next];
        self.session.jump_to(number, direction);
    }

    /// Mouse clicks: a grid cell selects it (clicking the active cell flips
    /// direction), a clue jumps to its word.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left)
            || self.menu != MenuState::None
            || self.screen_state != ScreenState::Playing
        {
            return;
        }

        if let Some(pos) = self.cell_at(mouse.column, mouse.row) {
            if self.session.navigator().active_cell() == Some(pos) {
                self.session.toggle_direction();
            } else {
                self.session.select_cell(pos);
            }
        } else if let Some(hit) = self
            .clue_hitboxes
            .iter()
            .find(|h| h.y == mouse.row && mouse.column >= h.x && mouse.column < h.x + h.width)
            .copied()
        {
            self.session.jump_to(hit.number, hit.direction);
        }
        self.pump_events();
    }

    /// Grid cell under a terminal coordinate
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        let (x, y) = self.grid_origin;
        if column < x || row < y {
            return None;
        }
        let pos = Position::new(
            ((row - y) / CELL_HEIGHT) as usize,
            ((column - x) / CELL_WIDTH) as usize,
        );
        self.session.puzzle().contains(pos).then_some(pos)
    }

    /// Whether a cell belongs to the active word
    pub fn is_highlighted(&self, pos: Position) -> bool {
        self.session
            .navigator()
            .active_placement(self.session.puzzle())
            .is_some_and(|p| p.contains(pos))
    }
}
