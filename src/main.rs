//! usrapi-manager binary entry point.
//!
//! Parses configuration, sets up logging and the request runtime,
//! initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use usrapi_manager::api::HttpUserApi;
use usrapi_manager::app::{self, AppState, Theme};
use usrapi_manager::config::Config;
use usrapi_manager::dispatch::Dispatcher;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Log to the configured file; stdout belongs to the TUI, so without a file nothing is logged.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;

    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init tracing: {e}"))?;
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting");

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    let api = HttpUserApi::new(&config.base_url).map_err(|e| anyhow::anyhow!("{e}"))?;
    let (dispatcher, mut completions) = Dispatcher::new(Arc::new(api), runtime.handle().clone());

    let theme = Theme::load_or_init(&config.theme);
    let mut state = AppState::new(theme, config.username_prefix(), config.base_url.as_str());

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &dispatcher, &mut completions);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
