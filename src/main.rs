use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyrace::{
    config::{Config, ConfigStore, FileConfigStore},
    engine::{Engine, EngineOptions},
    history::{HistoryDb, HistorySink},
    runtime::{keystroke_for, AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{clamp_seed_size, clamp_time_limit, Mode},
    ui::{ScreenSink, View},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
};

/// time limits cycled with F3
const TIME_PRESETS: [u32; 4] = [15, 30, 60, 120];
const LEADERBOARD_SIZE: usize = 10;

/// timed typing test with live wpm, accuracy and consistency
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// seconds per run (1-3600)
    #[clap(short = 't', long = "time")]
    time_limit: Option<u32>,

    /// kind of text to type
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// words generated per batch
    #[clap(short = 's', long)]
    seed_size: Option<usize>,

    /// whitespace separated words to draw from instead of the bundled list
    #[clap(long)]
    words_file: Option<PathBuf>,

    /// print the fastest recorded runs and exit
    #[clap(long)]
    leaderboard: bool,
}

impl Cli {
    /// Command line values take precedence over the stored config
    fn merge_into(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.time_limit {
            cfg.time_limit = clamp_time_limit(secs);
        }
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        if let Some(count) = self.seed_size {
            cfg.seed_size = clamp_seed_size(count);
        }
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if cli.leaderboard {
        return print_leaderboard();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.merge_into(config_store.load());
    if let Err(err) = config_store.save(&config) {
        tracing::warn!(%err, "failed to save config");
    }

    let mut options = EngineOptions::from(&config);
    if let Some(path) = &cli.words_file {
        match fs::read_to_string(path) {
            Ok(text) => {
                options.word_pool = Some(text.split_whitespace().map(str::to_string).collect())
            }
            Err(err) => {
                let mut cmd = Cli::command();
                cmd.error(
                    ErrorKind::Io,
                    format!("cannot read {}: {err}", path.display()),
                )
                .exit();
            }
        }
    }

    let mut engine = Engine::new(options);
    let screen = ScreenSink::new();
    engine.subscribe(Box::new(screen.clone()));
    match HistoryDb::open_default() {
        Ok(db) => {
            engine.subscribe(Box::new(HistorySink::new(db)));
        }
        Err(err) => tracing::warn!(%err, "run history disabled"),
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut settings = Settings {
        config,
        store: config_store,
    };
    let outcome = start_tui(&mut terminal, &mut engine, &screen, &mut settings);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

/// Log to `keyrace.log` when KEYRACE_LOG is set; the terminal belongs to the UI.
fn init_logging() {
    if std::env::var("KEYRACE_LOG").is_err() {
        return;
    }
    use std::fs::File;
    use tracing_subscriber::prelude::*;
    match File::create("keyrace.log") {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false);
            let filter = tracing_subscriber::EnvFilter::new("keyrace=debug");
            let _ = tracing_subscriber::registry()
                .with(file_layer.with_filter(filter))
                .try_init();
        }
        Err(err) => {
            eprintln!("Failed to create log file: {err}");
        }
    }
}

fn print_leaderboard() -> Result<(), Box<dyn Error>> {
    let db = HistoryDb::open_default()?;
    let runs = db.top_runs(LEADERBOARD_SIZE)?;
    if runs.is_empty() {
        println!("no runs recorded yet");
        return Ok(());
    }

    for (rank, run) in runs.iter().enumerate() {
        println!(
            "{:>2}. {:>3} wpm  {:>3}% acc  {:>3} raw  {:>2} sd  {:>4}s {:<7}  {}",
            rank + 1,
            run.wpm,
            run.accuracy,
            run.raw_speed,
            run.consistency,
            run.time_limit,
            run.mode,
            run.finished_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

struct Settings<S: ConfigStore> {
    config: Config,
    store: S,
}

impl<S: ConfigStore> Settings<S> {
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.config) {
            tracing::warn!(%err, "failed to save config");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn start_tui<B: Backend, S: ConfigStore>(
    terminal: &mut Terminal<B>,
    engine: &mut Engine,
    screen: &ScreenSink,
    settings: &mut Settings<S>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        let state = screen.snapshot();
        terminal.draw(|f| f.render_widget(View::new(engine, &state), f.area()))?;

        match runner.step() {
            AppEvent::Tick => engine.tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if handle_key(engine, settings, key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key<S: ConfigStore>(engine: &mut Engine, settings: &mut Settings<S>, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
        KeyCode::Tab => engine.reset(),
        KeyCode::F(2) => {
            let mode = engine.mode().next();
            engine.set_mode(mode);
            settings.config.mode = mode;
            settings.persist();
        }
        KeyCode::F(3) => {
            let secs = next_time_limit(engine.time_limit());
            engine.set_time_limit(secs);
            settings.config.time_limit = secs;
            settings.persist();
        }
        _ => {
            if let Some(keystroke) = keystroke_for(&key) {
                engine.submit_keystroke(keystroke);
            }
        }
    }
    Flow::Continue
}

fn next_time_limit(current: u32) -> u32 {
    TIME_PRESETS
        .iter()
        .copied()
        .find(|&secs| secs > current)
        .unwrap_or(TIME_PRESETS[0])
}
