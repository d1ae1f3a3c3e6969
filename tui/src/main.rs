//! Folio TUI Entry Point
//!
//! Usage:
//!   folio-tui [OPTIONS]
//!
//! Options:
//!   --config <PATH>      Config file (default: ~/.config/folio/folio.toml)
//!   --base-url <URL>     Server the sample files are fetched from
//!   --tick-ms <MS>       Milliseconds per typed character
//!   --poll-ms <MS>       Milliseconds between scheduler polls
//!   --clear              Clear the panel before each new file
//!   --offline            Type built-in samples instead of fetching
//!
//! Logs go to the file named by `FOLIO_LOG_FILE` (filtered by `RUST_LOG`);
//! writing them to the terminal would corrupt the screen.

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_core::{load_config_from_path, ConfigOverrides, FolioConfig};
use folio_tui::App;

#[derive(Parser, Debug)]
#[command(name = "folio-tui", version, about = "Watch source files type themselves out")]
struct Cli {
    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Server the sample files are fetched from
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Milliseconds per typed character
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Milliseconds between scheduler polls
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,

    /// Clear the panel before each new file
    #[arg(long)]
    clear: bool,

    /// Type built-in samples instead of fetching over HTTP
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(url) = &self.base_url {
            overrides = overrides.with_base_url(url.clone());
        }
        if let Some(ms) = self.tick_ms {
            overrides = overrides.with_tick_ms(ms);
        }
        if let Some(ms) = self.poll_ms {
            overrides = overrides.with_poll_ms(ms);
        }
        if self.clear {
            overrides = overrides.with_clear_between_runs(true);
        }
        overrides
    }

    fn load_config(&self) -> anyhow::Result<FolioConfig> {
        let path = self.config.clone().or_else(folio_core::default_config_path);
        let mut config = load_config_from_path(path).context("Failed to load configuration")?;
        self.overrides()
            .apply(&mut config)
            .context("Invalid command line options")?;
        Ok(config)
    }
}

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os("FOLIO_LOG_FILE") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", PathBuf::from(&path).display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = cli.load_config()?;
    tracing::info!(
        source = ?config.source(),
        files = config.catalog.len(),
        tick_ms = config.tick_interval.as_millis() as u64,
        "Configuration loaded"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: folio-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or with `ssh -t` over SSH.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &config, cli.offline).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &FolioConfig,
    offline: bool,
) -> anyhow::Result<()> {
    let mut app = App::new(config, offline)?;
    let result = app.run(terminal).await;
    app.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "folio-tui",
            "--base-url",
            "http://example.test",
            "--tick-ms",
            "20",
            "--clear",
        ]);
        let mut config = FolioConfig::default();
        cli.overrides().apply(&mut config).unwrap();

        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert!(config.clear_between_runs);
        assert!(!cli.offline);
    }

    #[test]
    fn test_zero_tick_rejected() {
        let cli = Cli::parse_from(["folio-tui", "--tick-ms", "0"]);
        let mut config = FolioConfig::default();
        assert!(cli.overrides().apply(&mut config).is_err());
    }
}
