mod app;
mod config;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use app::AppState;
use anyhow::{Context, Result};
use config::Config;
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{
    ensure_dir, init_local_dir, resolve_data_dir, FileStorage, MemoryStorage, Storage,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Calendar, mind maps and a Pomodoro timer in your terminal", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .daybook directory, then ~/.daybook
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off). Overrides config.json
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .daybook directory in the current directory
    Init,
    /// Print the open tasks planned for a day
    Agenda {
        /// Date (YYYY-MM-DD format). Defaults to tomorrow.
        #[arg(short, long)]
        date: Option<String>,
        /// Also write the agenda to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            let data_dir = init_local_dir(&cwd)?;
            let config_path = config::config_file(&data_dir);
            if !config_path.exists() {
                config::save_config(&config_path, &config::Config::default())?;
            }
            println!("Initialized daybook directory: {}", data_dir.display());
            println!();
            println!("Daybook will now use this local directory for its data.");
            println!("Run 'daybook' to start.");
            Ok(())
        }
        Some(Commands::Agenda { date, output }) => {
            let agenda_date = match date {
                Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?,
                None => Local::now().date_naive() + Duration::days(1),
            };

            let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
            let config = config::load_config(config::config_file(&data_dir))?;
            let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
            let _logger = logging::init_logging(level, &logging::log_dir(&data_dir))?;

            let storage = FileStorage::open(&data_dir)?;
            let text = report::generate_agenda(&storage, agenda_date, output.as_deref())?;
            print!("{}", text);
            Ok(())
        }
        None => run_tui(cli.data_dir, cli.log_level, cli.memory),
    }
}

/// Where a TUI session keeps its data, config and logs
enum Workspace {
    Files(PathBuf),
    /// Nothing touches the data directory; logs go to a temporary
    /// directory that is removed when the session ends
    Memory(tempfile::TempDir),
}

impl Workspace {
    fn prepare(data_dir: Option<&Path>, memory: bool) -> Result<Self> {
        if memory {
            let logs = tempfile::Builder::new()
                .prefix("daybook-")
                .tempdir()
                .context("failed to create temporary log directory")?;
            return Ok(Self::Memory(logs));
        }
        let data_dir = resolve_data_dir(data_dir)?;
        ensure_dir(&data_dir)?;
        Ok(Self::Files(data_dir))
    }

    fn config(&self) -> Result<Config> {
        match self {
            Self::Files(dir) => config::load_config(config::config_file(dir)),
            Self::Memory(_) => Ok(Config::default()),
        }
    }

    fn log_dir(&self) -> PathBuf {
        match self {
            Self::Files(dir) => logging::log_dir(dir),
            Self::Memory(logs) => logs.path().to_path_buf(),
        }
    }

    fn storage(&self) -> Result<Box<dyn Storage>> {
        match self {
            Self::Files(dir) => {
                let storage = FileStorage::open(dir)?;
                log::info!("event=storage_mode mode=files dir={}", storage.dir().display());
                Ok(Box::new(storage))
            }
            Self::Memory(_) => {
                log::info!("event=storage_mode mode=memory");
                Ok(Box::new(MemoryStorage::new()))
            }
        }
    }
}

fn run_tui(data_dir: Option<PathBuf>, log_level: Option<String>, memory: bool) -> Result<()> {
    let workspace = Workspace::prepare(data_dir.as_deref(), memory)?;
    let config = workspace.config()?;
    let level = log_level.as_deref().unwrap_or(config.log_level.as_str());
    // Held until exit so buffered log lines get flushed; declared after
    // `workspace` so it is dropped before a temporary log directory
    let _logger = logging::init_logging(level, &workspace.log_dir())?;

    let storage = workspace.storage()?;
    let mut app = AppState::new(storage, config, Local::now().date_naive())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => log::info!("event=app_exit"),
        Err(e) => log::error!("event=app_exit error={:#}", e),
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Keep "today" right across midnight
        let today = Local::now().date_naive();
        if today != app.today {
            log::info!("event=day_changed date={}", today);
            app.set_today(today);
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
    }
}
