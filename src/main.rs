//! Shutbox - Unified CLI
//!
//! Play Don't Shut the Box against computer opponents, or watch them play
//! each other.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use shutbox::{
    Cli, Command, EventSink, GameController, MatchArgs, OutputFormat, players, rules_text,
    print_events, spawn_stdin_reader,
};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command() {
        Command::Play {
            name,
            delay_ms,
            game,
        } => run_play(name, Duration::from_millis(delay_ms), game, format).await,
        Command::Simulate { game } => run_simulate(game, format).await,
        Command::Rules => {
            println!("{}", rules_text());
            Ok(())
        }
    }
}

/// Logs to stderr, or to a file when one is given.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        EnvFilter::new("info,strictly_shutbox=debug,shutbox=debug")
                    }),
                )
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// One human against computer opponents.
#[instrument(skip(game, format))]
async fn run_play(name: String, delay: Duration, game: MatchArgs, format: OutputFormat) -> Result<()> {
    let config = game.resolve(Some(&name), 1)?;
    let (events, rx) = EventSink::channel();
    let printer = tokio::spawn(print_events(rx, format));

    let input = spawn_stdin_reader();
    let seats = players::from_config(&config, Some(input), &events, delay)?;
    let mut controller = GameController::new(config, seats)?.with_events(events);
    info!("Starting interactive match");
    let result = controller.play_match().await;

    // closes the event channel so the printer drains and stops
    drop(controller);
    printer.await?;
    result?;
    Ok(())
}

/// Computer players only.
#[instrument(skip(game, format))]
async fn run_simulate(game: MatchArgs, format: OutputFormat) -> Result<()> {
    let config = game.resolve(None, 2)?;
    let (events, rx) = EventSink::channel();
    let printer = tokio::spawn(print_events(rx, format));

    let seats = players::from_config(&config, None, &events, Duration::ZERO)?;
    let mut controller = GameController::new(config, seats)?.with_events(events);
    info!("Starting simulation");
    let result = controller.play_match().await;

    drop(controller);
    printer.await?;
    result?;
    Ok(())
}
