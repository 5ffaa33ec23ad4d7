mod app;
mod logging;
mod palette;
mod render;
mod storage;
#[cfg(test)]
mod tests;

use app::App;
use clap::{ArgAction, Parser};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use squares_core::{LocalClock, PuzzleLoader, Session, Settings, ThemeCatalog, DEFAULT_THEME_KEY};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use storage::JsonFileStore;
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Daily slang crossword in your terminal
#[derive(Parser, Debug)]
#[command(name = "squares", version)]
struct Args {
    /// Directory holding crossword_themes.json, puzzles/ and sample_crossword.json
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Theme to start on
    #[arg(long, default_value = DEFAULT_THEME_KEY)]
    theme: String,

    /// Hide the timer
    #[arg(long)]
    no_timer: bool,

    /// Only check letters on demand
    #[arg(long)]
    no_auto_check: bool,

    /// Turn off smart hints
    #[arg(long)]
    no_hints: bool,

    /// No bell on hints and completion
    #[arg(long)]
    mute: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log file, defaults to squares.log beside the saved streak
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Flags switch saved settings off for this run
    fn apply(&self, mut settings: Settings) -> Settings {
        if self.no_timer {
            settings.show_timer = false;
        }
        if self.no_auto_check {
            settings.auto_check = false;
        }
        if self.no_hints {
            settings.allow_hints = false;
        }
        if self.mute {
            settings.sound_fx = false;
        }
        settings
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_file = args.log_file.clone().unwrap_or_else(storage::log_path);
    if let Err(err) = logging::init(args.verbose, &log_file) {
        eprintln!("warning: logging disabled ({}): {}", log_file.display(), err);
    }

    let settings_path = storage::settings_path();
    let settings = args.apply(storage::load_settings(&settings_path));
    let catalog = ThemeCatalog::load_or_builtin(&args.data_dir.join("crossword_themes.json"));
    let loader = PuzzleLoader::for_data_dir(&args.data_dir);
    let store = JsonFileStore::open(storage::streak_path());

    info!(data_dir = %args.data_dir.display(), theme = %args.theme, "starting");
    let session = Session::new(
        catalog,
        loader,
        Box::new(store),
        Box::new(LocalClock),
        settings,
        &args.theme,
    );
    let mut app = App::new(session, Some(settings_path));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        error!(%e, "terminal loop failed");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
