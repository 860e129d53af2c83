// blogdeck - blog posts in an animated terminal UI
//
// Fetches posts from a blog API and shows them as animated tabs or an
// expandable card grid. Every post opens into a detail overlay that loads
// the long-form content on demand.
//
// Architecture:
// - API client (reqwest): list and detail endpoints behind the BlogSource trait
// - TUI (ratatui): tabs, cards, overlays and their dismissal listeners
// - Event system: fetch tasks report to the UI loop over an mpsc channel
// - Demo source: canned posts for offline runs and tests

mod api;
mod cli;
mod config;
mod demo;
mod events;
mod logging;
mod tui;

use anyhow::{Context, Result};
use api::{HttpBlogSource, SharedSource};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogRotation};
use demo::DemoSource;
use logging::{LogBuffer, TuiLogLayer};
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Simulated network latency in demo mode, long enough to see skeletons
const DEMO_LATENCY: Duration = Duration::from_millis(700);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Precedence: flags > env > file > defaults
    let config = cli.apply(Config::from_env());

    if let Some(Commands::Config { show, path, reset }) = cli.command {
        return cli::handle_config(show, path, reset, &config);
    }

    // In TUI mode logs go to a buffer (the status bar shows the latest);
    // headless commands log to stderr so stdout stays clean
    let tui_mode = cli.command.is_none();
    let log_buffer = LogBuffer::new();
    // The guard must live until exit so buffered file logs flush
    let _file_guard = init_logging(&config, &log_buffer, tui_mode);

    let (source, source_name) = build_source(&config)?;

    match cli.command {
        Some(Commands::List) => cli::run_list(source).await,
        Some(Commands::Show { id }) => cli::run_show(source, &id).await,
        Some(Commands::Config { .. }) => Ok(()),
        None => {
            tracing::info!("blogdeck {} reading from {}", config::VERSION, source_name);
            tui::run_tui(config, source, source_name, log_buffer).await
        }
    }
}

/// Set up tracing
///
/// RUST_LOG wins over the configured level. File logging is JSON, written
/// through a non-blocking rolling appender, in addition to the buffer or
/// stderr output.
fn init_logging(config: &Config, log_buffer: &LogBuffer, tui_mode: bool) -> Option<WorkerGuard> {
    let default_filter = format!("blogdeck={},reqwest=warn", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (file_layer, guard) = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let tui_layer = tui_mode.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!tui_mode).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Pick the blog source: bundled demo posts or the HTTP API
fn build_source(config: &Config) -> Result<(SharedSource, String)> {
    if config.demo_mode {
        tracing::info!("Demo mode: serving bundled posts");
        return Ok((Arc::new(DemoSource::new(DEMO_LATENCY)), "demo".to_string()));
    }

    let source = HttpBlogSource::new(&config.api_base, config.request_timeout)
        .context("Failed to create blog API client")?;
    Ok((Arc::new(source), config.api_host().to_string()))
}
