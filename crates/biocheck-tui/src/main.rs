//! biocheck - terminal test harness for platform biometric authentication
//!
//! Probes for biometric hardware and enrollment on startup, then lets the
//! user trigger authentication and cancellation while every outcome is
//! written to an on-screen activity log.

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use biocheck_tui::app::{App, BackendKind, TuiConfig};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "biocheck")]
#[command(about = "Exercise the platform biometric authentication API", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ~/.config/biocheck/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured platform backend
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TuiConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TuiConfig::load(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    init_logging(&config)?;

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_app(&config).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Route tracing to the configured log file; the terminal belongs to the UI
fn init_logging(config: &TuiConfig) -> Result<()> {
    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(EnvFilter::from_default_env().add_directive("biocheck=info".parse()?))
        .init();

    tracing::info!(backend = ?config.backend, "biocheck starting");
    Ok(())
}

/// Main application runner
async fn run_app(config: &TuiConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.build_platform(), config.tick_rate());
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
