//! Quote TUI Entry Point
//!
//! Shows a random quote, fading it in glyph by glyph once it is on screen,
//! then the author.
//!
//! # Usage
//!
//! ```bash
//! # Quotes from the default endpoint
//! quote-tui
//!
//! # Another endpoint with the same response shape
//! quote-tui --url https://example.com/quotes
//!
//! # No network
//! quote-tui --offline
//!
//! # Verbose logging (written to the log file, never the terminal)
//! RUST_LOG=debug quote-tui
//! ```

use std::fs;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quote_tui::cli::Args;
use quote_tui::App;
use reveal_core::{FixedQuoteSource, HttpQuoteSource, QuoteSource, RevealConfig};

/// Default log file under the XDG state (or cache) directory
fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("quote-reveal").join("quote-tui.log"))
}

/// Log to a file so output never lands on the alternate screen
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quote_tui=info,reveal_core=info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}

fn build_source(args: &Args, config: &RevealConfig) -> Result<Box<dyn QuoteSource>> {
    if args.offline {
        return Ok(Box::new(FixedQuoteSource::builtin()));
    }
    let source = HttpQuoteSource::from_config(&config.source)
        .context("Failed to build the HTTP quote source")?;
    Ok(Box::new(source))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: quote-tui requires a terminal (TTY)");
        std::process::exit(1);
    }

    let config = args.build_config()?;
    let source = build_source(&args, &config)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = source.name(),
        url = %config.source.url,
        url_source = %config.url_source(),
        "Quote TUI starting"
    );

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        );
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config, source);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Quote TUI stopped with error");
    }
    result
}
