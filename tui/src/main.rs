//! Panelstack TUI Entry Point
//!
//! Runs a small demo of the panel stack: a static base view with help,
//! confirmation, error, search and command panels layered over it.
//!
//! Usage:
//!   panelstack-tui
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod demo;

use std::io;
use std::panic;
use std::sync::Arc;

use anyhow::Context;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panelstack_tui::config::Config;
use panelstack_tui::terminal::forward_terminal_events;
use panelstack_tui::{load_config, Orchestrator, TerminalSink, Theme, Viewport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging, away from the alternate screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: panelstack-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or the session");
        eprintln!("has no terminal attached (CI, ssh without -t).");
        std::process::exit(1);
    }

    let config = load_config().context("Failed to load configuration")?;
    tracing::info!(source = %config.source, "Configuration loaded");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = run_app(config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;

    result
}

async fn run_app(config: Config) -> anyhow::Result<()> {
    let theme = Arc::new(Theme::from_config(&config));
    let (width, height) = crossterm::terminal::size()?;

    let mut app = Orchestrator::new(
        Box::new(demo::DemoView::new(Arc::clone(&theme))),
        demo::panels(&theme),
        Viewport::new(width, height),
        &config,
        theme,
    );

    let input = app
        .sender()
        .map(|tx| tokio::spawn(forward_terminal_events(tx)));
    let mut sink = TerminalSink::new(io::stdout());
    let result = app.run(&mut sink).await;
    if let Some(input) = input {
        input.abort();
    }

    result.context("Event loop failed")
}
