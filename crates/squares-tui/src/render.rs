use crate::app::{App, ClueHitbox, MenuState, ScreenState, CELL_HEIGHT, CELL_WIDTH};
use crate::palette::Palette;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use squares_core::{CellStatus, Direction, Position};
use std::io;

/// Width of the info panel and each clue column
const PANEL_WIDTH: usize = 34;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    render_game_screen(stdout, app, term_width, term_height)?;

    if app.screen_state == ScreenState::Complete {
        render_complete(stdout, app, term_width, term_height)?;
    }

    if app.bell {
        execute!(stdout, Print("\x07"))?;
        app.bell = false;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let puzzle = app.session.puzzle();
    let grid_width = puzzle.cols() as u16 * CELL_WIDTH;
    let grid_height = puzzle.rows() as u16 * CELL_HEIGHT;

    // Grid + gap + info panel, centred when there is room
    let total_width = grid_width + 3 + PANEL_WIDTH as u16;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 2;

    app.grid_origin = (start_x, start_y);
    render_grid(stdout, app, start_x, start_y)?;

    let info_x = start_x + grid_width + 3;
    let info_bottom = render_info_panel(stdout, app, info_x, start_y)?;

    let clues_y = (start_y + grid_height + 1).max(info_bottom + 1);
    let clues_bottom = render_clues(stdout, app, start_x, clues_y)?;

    let controls_y = (clues_bottom + 1).max(term_height.saturating_sub(4));
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, &app.palette, msg, term_width)?;
    }

    if app.menu != MenuState::None {
        render_menu(stdout, app, term_width, term_height)?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let puzzle = app.session.puzzle();
    for row in 0..puzzle.rows() {
        for col in 0..puzzle.cols() {
            let cell_x = x + col as u16 * CELL_WIDTH;
            let cell_y = y + row as u16 * CELL_HEIGHT;
            render_cell(stdout, app, Position::new(row, col), cell_x, cell_y)?;
        }
    }
    Ok(())
}

fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    pos: Position,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let palette = &app.palette;
    let session = &app.session;
    let blank = " ".repeat(CELL_WIDTH as usize);

    let Some(cell) = session.board().get(pos) else {
        for dy in 0..CELL_HEIGHT {
            execute!(
                stdout,
                MoveTo(x, y + dy),
                SetBackgroundColor(palette.block),
                Print(&blank)
            )?;
        }
        return Ok(());
    };

    let bg = if session.navigator().active_cell() == Some(pos) {
        palette.selected_bg
    } else if app.is_highlighted(pos) {
        palette.highlight_bg
    } else {
        palette.bg
    };

    let fg = match cell.status {
        CellStatus::Incorrect => palette.error,
        _ if cell.hinted => palette.hinted,
        CellStatus::Correct => palette.success,
        CellStatus::Unset => palette.filled,
    };

    // Clue number in the corner, letter below
    let number = session
        .puzzle()
        .clue_number_at(pos.row, pos.col)
        .map(|n| n.to_string())
        .unwrap_or_default();
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(bg),
        SetForegroundColor(palette.number),
        Print(format!("{:<width$}", number, width = CELL_WIDTH as usize)),
        MoveTo(x, y + 1),
        SetForegroundColor(fg),
        Print(format!(" {}  ", cell.letter.unwrap_or(' ')))
    )?;

    Ok(())
}

/// Returns the first free row below the panel
fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<u16> {
    let palette = &app.palette;
    let session = &app.session;
    let state = session.state();
    let mut line = y;

    execute!(stdout, SetBackgroundColor(palette.bg))?;

    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(palette.key),
        Print("═══ SLANG SQUARES ═══")
    )?;
    line += 2;

    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(palette.fg),
        Print(truncate(
            &format!("{} · {}", session.theme_key(), session.theme().name),
            PANEL_WIDTH
        ))
    )?;
    line += 2;

    if session.settings().show_timer {
        execute!(
            stdout,
            MoveTo(x, line),
            SetForegroundColor(palette.info),
            Print(format!("Time: {:>12}", session.timer_text()))
        )?;
        line += 1;
    }

    let streak = session.streak().current_streak;
    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(palette.info),
        Print(format!("Streak: {:>10}", format!("🔥 {streak}"))),
        MoveTo(x, line + 1),
        Print(format!("Progress: {:>8}", format!("{}%", session.progress_percent()))),
        MoveTo(x, line + 2),
        Print(format!(
            "Hints: {:>11}",
            format!("{}/{}", state.hints_used(), state.max_hints())
        ))
    )?;
    line += 4;

    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(palette.border),
        Print("─".repeat(PANEL_WIDTH))
    )?;
    line += 1;

    // Tier 1
    let ambient = session.ambient_hint();
    for text in [&ambient.vibe, &ambient.breadcrumb] {
        for wrapped in wrap_text(text, PANEL_WIDTH) {
            execute!(
                stdout,
                MoveTo(x, line),
                SetForegroundColor(palette.info),
                Print(wrapped)
            )?;
            line += 1;
        }
    }
    line += 1;

    // Tier 2
    let unlocked = if state.revealed_words.is_empty() {
        "🔒 No words unlocked yet".to_string()
    } else {
        format!("🔓 {}", state.revealed_words.join(", "))
    };
    for wrapped in wrap_text(&unlocked, PANEL_WIDTH) {
        execute!(
            stdout,
            MoveTo(x, line),
            SetForegroundColor(palette.success),
            Print(wrapped)
        )?;
        line += 1;
    }
    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(palette.info),
        Print(session.next_unlock_text())
    )?;
    line += 2;

    // Tier 3
    let hint_color = if session.hint_available() {
        palette.key
    } else {
        palette.dim
    };
    execute!(
        stdout,
        MoveTo(x, line),
        SetForegroundColor(hint_color),
        Print(format!("[?] Smart hint ({} left)", state.hints.remaining()))
    )?;
    line += 2;

    // Active clue
    if let Some(placement) = session.navigator().active_placement(session.puzzle()) {
        let label = format!(
            "{} {}: {} ({})",
            placement.number,
            direction_label(placement.direction),
            placement.clue,
            placement.len()
        );
        for wrapped in wrap_text(&label, PANEL_WIDTH) {
            execute!(
                stdout,
                MoveTo(x, line),
                SetForegroundColor(palette.fg),
                Print(wrapped)
            )?;
            line += 1;
        }
    }

    Ok(line)
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Across => "Across",
        Direction::Down => "Down",
    }
}

/// Across and down clue columns. Returns the first free row below them.
fn render_clues(stdout: &mut io::Stdout, app: &mut App, x: u16, y: u16) -> io::Result<u16> {
    let mut hitboxes = Vec::new();
    let mut bottom = y;

    {
        let palette = &app.palette;
        let session = &app.session;
        let active = session
            .navigator()
            .active_placement(session.puzzle())
            .map(|p| (p.number, p.direction));

        for (i, direction) in [Direction::Across, Direction::Down].into_iter().enumerate() {
            let column_x = x + i as u16 * (PANEL_WIDTH as u16 + 2);
            let mut line = y;

            execute!(
                stdout,
                MoveTo(column_x, line),
                SetBackgroundColor(palette.bg),
                SetForegroundColor(palette.key),
                Print(direction_label(direction).to_uppercase())
            )?;
            line += 1;

            for placement in session.puzzle().placements(direction) {
                let text = truncate(
                    &format!("{:>3}. {}", placement.number, placement.clue),
                    PANEL_WIDTH,
                );
                let is_active = active == Some((placement.number, placement.direction));
                let (fg, bg) = if is_active {
                    (palette.fg, palette.selected_bg)
                } else if session.is_word_complete(placement.number, direction) {
                    (palette.success, palette.bg)
                } else {
                    (palette.info, palette.bg)
                };

                execute!(
                    stdout,
                    MoveTo(column_x, line),
                    SetForegroundColor(fg),
                    SetBackgroundColor(bg),
                    Print(&text)
                )?;
                hitboxes.push(ClueHitbox {
                    x: column_x,
                    y: line,
                    width: text.chars().count() as u16,
                    number: placement.number,
                    direction,
                });
                line += 1;
            }
            bottom = bottom.max(line);
        }
    }

    app.clue_hitboxes = hitboxes;
    Ok(bottom)
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let palette = &app.palette;

    execute!(stdout, SetBackgroundColor(palette.bg))?;

    let controls = [
        ("A-Z", "Type"),
        ("Arrows", "Move"),
        ("Tab", "Direction"),
        ("[ ]", "Prev/next clue"),
        ("Bksp", "Delete"),
        ("?", "Smart hint"),
        ("!", "Check all"),
        ("~", "Clear all"),
        ("^T", "Themes"),
        ("^N", "Try another"),
        ("^S", "Settings"),
        ("^P", "Palette"),
        ("^Q", "Quit"),
    ];

    // 4 rows per column
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 22;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(palette.key),
            Print(format!("{:>6}", key)),
            SetForegroundColor(palette.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    palette: &Palette,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(palette.fg),
        SetBackgroundColor(palette.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}

/// Filled box with a one-line border, returns its top-left corner
fn draw_box(
    stdout: &mut io::Stdout,
    palette: &Palette,
    bg: Color,
    width: u16,
    height: u16,
    term_width: u16,
    term_height: u16,
) -> io::Result<(u16, u16)> {
    let x = term_width.saturating_sub(width) / 2;
    let y = term_height.saturating_sub(height) / 2;

    for row in 0..height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(width as usize))
        )?;
    }

    execute!(
        stdout,
        SetForegroundColor(palette.border),
        MoveTo(x, y),
        Print("┌"),
        Print("─".repeat(width as usize - 2)),
        Print("┐")
    )?;
    for row in 1..height - 1 {
        execute!(stdout, MoveTo(x, y + row), Print("│"))?;
        execute!(stdout, MoveTo(x + width - 1, y + row), Print("│"))?;
    }
    execute!(
        stdout,
        MoveTo(x, y + height - 1),
        Print("└"),
        Print("─".repeat(width as usize - 2)),
        Print("┘")
    )?;

    Ok((x, y))
}

fn render_menu(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let palette = &app.palette;

    let options: Vec<String> = match app.menu {
        MenuState::Themes => app
            .session
            .catalog()
            .keys()
            .map(|key| {
                let name = app
                    .session
                    .catalog()
                    .get(key)
                    .map(|theme| theme.name.as_str())
                    .unwrap_or_default();
                truncate(&format!("{key} · {name}"), 32)
            })
            .collect(),
        MenuState::Palette => Palette::NAMES.iter().map(|name| name.to_string()).collect(),
        MenuState::Settings => app
            .settings_items()
            .iter()
            .map(|(label, on)| format!("{:<20}{:>6}", label, if *on { "on" } else { "off" }))
            .collect(),
        MenuState::ConfirmClear => vec!["Yes, clear it".to_string(), "No".to_string()],
        MenuState::None => Vec::new(),
    };
    let title = match app.menu {
        MenuState::Themes => "Pick a Day",
        MenuState::Palette => "Select Palette",
        MenuState::Settings => "Settings",
        MenuState::ConfirmClear => "Clear the whole board?",
        MenuState::None => "",
    };

    let menu_width: u16 = 40;
    let menu_height = options.len() as u16 + 5;
    let bg = Color::Rgb {
        r: 30,
        g: 30,
        b: 40,
    };
    let (x, y) = draw_box(stdout, palette, bg, menu_width, menu_height, term_width, term_height)?;

    let title_x = x + (menu_width.saturating_sub(title.chars().count() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(title_x, y + 1),
        SetForegroundColor(palette.fg),
        SetBackgroundColor(bg),
        Print(title)
    )?;

    for (i, option) in options.iter().enumerate() {
        let selected = i == app.menu_selection;
        let (fg, item_bg) = if selected {
            (Color::Black, palette.key)
        } else {
            (palette.fg, bg)
        };

        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(item_bg),
            Print(format!(" {:<34} ", option))
        )?;
    }

    Ok(())
}

fn render_complete(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let Some(summary) = &app.summary else {
        return Ok(());
    };
    let palette = &app.palette;

    let max_width = 46;
    let mut lines = vec![
        format!("Theme:   {}", summary.theme_name),
        format!("Time:    {}", squares_core::format_time(summary.elapsed_secs)),
        format!("Hints:   {}", summary.hints_used),
        format!("Streak:  🔥 {} day(s)", summary.streak),
        String::new(),
    ];
    lines.extend(wrap_text(&summary.share_text(), max_width));

    let box_width = (max_width + 4) as u16;
    let box_height = (lines.len() + 6) as u16;
    let bg = Color::Rgb {
        r: 25,
        g: 45,
        b: 25,
    };
    let (x, y) = draw_box(stdout, palette, bg, box_width, box_height, term_width, term_height)?;

    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(palette.success),
        SetBackgroundColor(bg),
        Print("🎉 Puzzle Complete!")
    )?;

    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(palette.fg),
            Print(line)
        )?;
    }

    execute!(
        stdout,
        MoveTo(x + 2, y + box_height - 2),
        SetForegroundColor(palette.key),
        Print("Enter: try another  t: themes  Esc: board")
    )?;

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
