//! Tests for terminal input handling

#[cfg(test)]
mod tests {
    use crate::app::{App, AppAction, ClueHitbox, MenuState, ScreenState};
    use crate::palette::Palette;
    use chrono::NaiveDate;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use squares_core::{
        Direction, FixedClock, MemorySource, MemoryStore, Position, PuzzleLoader, PuzzlePayload,
        Session, Settings, ThemeCatalog,
    };

    // S L A Y
    // I # # #
    // M # # #
    // P # # #
    fn new_app() -> App {
        let payload = PuzzlePayload::from_json(
            r#"{
                "size": { "rows": 4, "cols": 4 },
                "across": { "1": { "clue": "Do it well", "answer": "SLAY", "row": 0, "col": 0 } },
                "down": { "1": { "clue": "Too devoted", "answer": "SIMP", "row": 0, "col": 0 } }
            }"#,
        )
        .unwrap();
        let catalog = ThemeCatalog::from_json(
            r#"{
                "Day 1": { "theme": "Urban Dictionary Essentials",
                           "sample_words": ["RIZZ", "BUSSIN", "SLAY", "STAN", "SIMP", "VIBES"] },
                "Day 2": { "theme": "Gaming", "sample_words": ["NOOB"] }
            }"#,
        )
        .unwrap();
        let loader = PuzzleLoader::new(vec![Box::new(MemorySource::new().with("Day 1", payload))]);
        let session = Session::new(
            catalog,
            loader,
            Box::new(MemoryStore::new()),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())),
            Settings::default(),
            "Day 1",
        );
        App::new(session, None)
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> AppAction {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn letter(app: &App, row: usize, col: usize) -> Option<char> {
        app.session.board().letter(Position::new(row, col))
    }

    fn solve(app: &mut App) {
        press(app, KeyCode::Right);
        type_text(app, "slay");
        app.session.select_cell(Position::new(1, 0));
        type_text(app, "imp");
    }

    #[test]
    fn test_app_new() {
        let app = new_app();
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.menu, MenuState::None);
        assert!(app.message.is_none());
        assert!(app.summary.is_none());
        assert!(!app.bell);
        assert_eq!(app.session.theme_key(), "Day 1");
    }

    #[test]
    fn test_first_arrow_selects_first_cell() {
        let mut app = new_app();
        assert_eq!(app.session.navigator().active_cell(), None);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(0, 0)));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(0, 1)));

        // A block below refuses the move
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_typing_fills_word() {
        let mut app = new_app();
        press(&mut app, KeyCode::Right);
        type_text(&mut app, "sl");

        assert_eq!(letter(&app, 0, 0), Some('S'));
        assert_eq!(letter(&app, 0, 1), Some('L'));
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(0, 2)));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(letter(&app, 0, 1), None);
    }

    #[test]
    fn test_letter_without_selection() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.message.as_deref(), Some("Pick a cell first"));
        assert!(app.session.board().cells().all(|cell| cell.letter.is_none()));
    }

    #[test]
    fn test_smart_hint_key() {
        let mut app = new_app();

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.message.as_deref(), Some("Pick a cell first"));
        assert!(!app.bell);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.session.state().hints_used(), 1);
        assert_eq!(letter(&app, 0, 0), Some('S'));
        assert!(app.bell);
    }

    #[test]
    fn test_smart_hint_turned_off() {
        let mut app = new_app();
        app.session.set_settings(Settings {
            allow_hints: false,
            ..Settings::default()
        });
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.message.as_deref(), Some("Hints are turned off"));
        assert_eq!(app.session.state().hints_used(), 0);
    }

    #[test]
    fn test_check_all_key() {
        let mut app = new_app();
        press(&mut app, KeyCode::Right);
        type_text(&mut app, "s");
        press(&mut app, KeyCode::Char('!'));
        assert!(app
            .message
            .as_deref()
            .is_some_and(|msg| msg.starts_with("Checked:")));
    }

    #[test]
    fn test_clear_board_confirm() {
        let mut app = new_app();
        press(&mut app, KeyCode::Right);
        type_text(&mut app, "sl");

        // Declining leaves the board alone
        press(&mut app, KeyCode::Char('~'));
        assert_eq!(app.menu, MenuState::ConfirmClear);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(letter(&app, 0, 0), Some('S'));

        press(&mut app, KeyCode::Char('~'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(letter(&app, 0, 0), None);
        assert_eq!(letter(&app, 0, 1), None);
        assert_eq!(app.message.as_deref(), Some("Board cleared"));
    }

    #[test]
    fn test_solving_shows_complete_screen() {
        let mut app = new_app();
        solve(&mut app);

        assert_eq!(app.screen_state, ScreenState::Complete);
        assert!(app.bell);
        let summary = app.summary.as_ref().unwrap();
        assert_eq!(summary.theme_name, "Urban Dictionary Essentials");
        assert_eq!(summary.streak, 1);
        assert!(app.message.is_some());

        // Back to the board, which no longer takes letters
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen_state, ScreenState::Playing);
        app.message = None;
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.message.as_deref(), Some("Already solved! Ctrl+N for another"));
        assert_eq!(letter(&app, 1, 0), Some('I'));

        // Clearing is refused too
        press(&mut app, KeyCode::Char('~'));
        assert_eq!(app.menu, MenuState::None);
    }

    #[test]
    fn test_try_another_after_completion() {
        let mut app = new_app();
        solve(&mut app);
        assert_eq!(app.screen_state, ScreenState::Complete);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.theme_key(), "Day 2");
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert!(app.summary.is_none());
        assert!(!app.session.state().completed);
    }

    #[test]
    fn test_quit() {
        let mut app = new_app();
        assert!(matches!(press(&mut app, KeyCode::Char('q')), AppAction::Continue));
        assert!(matches!(ctrl(&mut app, 'q'), AppAction::Quit));

        ctrl(&mut app, 's');
        assert!(matches!(ctrl(&mut app, 'q'), AppAction::Quit));
    }

    #[test]
    fn test_theme_menu() {
        let mut app = new_app();
        ctrl(&mut app, 't');
        assert_eq!(app.menu, MenuState::Themes);
        assert_eq!(app.menu_selection, 0);
        assert_eq!(app.menu_len(), 2);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.menu_selection, 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(app.session.theme_key(), "Day 2");
        assert_eq!(app.message.as_deref(), Some("Day 2: Gaming"));

        // Reopening starts on the current theme
        ctrl(&mut app, 't');
        assert_eq!(app.menu_selection, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.menu, MenuState::None);
    }

    #[test]
    fn test_palette_menu() {
        let mut app = new_app();
        ctrl(&mut app, 'p');
        assert_eq!(app.menu, MenuState::Palette);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.palette, Palette::light());

        ctrl(&mut app, 'p');
        assert_eq!(app.menu_selection, 1);
    }

    #[test]
    fn test_settings_menu_toggles() {
        let mut app = new_app();
        ctrl(&mut app, 's');
        assert_eq!(app.menu, MenuState::Settings);

        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.session.settings().auto_check);
        assert_eq!(app.menu, MenuState::Settings);
        assert_eq!(app.settings_items()[3], ("Auto-check", false));

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session.settings().sound_fx);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.menu, MenuState::None);
    }

    #[test]
    fn test_clue_cycling() {
        let mut app = new_app();
        let active = |app: &App| {
            app.session
                .navigator()
                .active_placement(app.session.puzzle())
                .map(|p| (p.number, p.direction))
        };

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(active(&app), Some((1, Direction::Across)));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(active(&app), Some((1, Direction::Down)));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(active(&app), Some((1, Direction::Across)));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(active(&app), Some((1, Direction::Down)));

        press(&mut app, KeyCode::Tab);
        assert_eq!(active(&app), Some((1, Direction::Across)));
    }

    #[test]
    fn test_cell_at() {
        let mut app = new_app();
        app.grid_origin = (10, 5);

        assert_eq!(app.cell_at(10, 5), Some(Position::new(0, 0)));
        assert_eq!(app.cell_at(13, 6), Some(Position::new(0, 0)));
        assert_eq!(app.cell_at(14, 7), Some(Position::new(1, 1)));
        assert_eq!(app.cell_at(9, 5), None);
        assert_eq!(app.cell_at(26, 5), None);
        assert_eq!(app.cell_at(10, 13), None);
    }

    #[test]
    fn test_mouse_selects_cells_and_clues() {
        let mut app = new_app();
        app.grid_origin = (10, 5);

        click(&mut app, 10, 9);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(2, 0)));
        assert_eq!(app.session.navigator().active_direction(), Some(Direction::Down));

        // Blocks are ignored
        click(&mut app, 14, 9);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(2, 0)));

        app.clue_hitboxes = vec![ClueHitbox {
            x: 40,
            y: 3,
            width: 12,
            number: 1,
            direction: Direction::Across,
        }];
        click(&mut app, 45, 3);
        assert_eq!(app.session.navigator().active_cell(), Some(Position::new(0, 0)));
        assert_eq!(app.session.navigator().active_direction(), Some(Direction::Across));

        // Clicking the active cell flips direction
        click(&mut app, 11, 5);
        assert_eq!(app.session.navigator().active_direction(), Some(Direction::Down));
    }

    #[test]
    fn test_messages_queue() {
        let mut app = new_app();
        app.show_message("first");
        app.show_message("second");
        assert_eq!(app.message.as_deref(), Some("first"));

        for _ in 0..30 {
            app.tick();
        }
        assert_eq!(app.message.as_deref(), Some("second"));

        for _ in 0..30 {
            app.tick();
        }
        assert!(app.message.is_none());
    }
}
