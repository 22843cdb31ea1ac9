//! Shutbox - Don't Shut the Box in the terminal
//!
//! Runs matches of Don't Shut the Box between people and computer
//! strategies. The rules live in `strictly_shutbox`; this crate seats the
//! players, drives the turns and renders what happens.
//!
//! # Architecture
//!
//! - **Controller**: rounds, turn order and scoring over a match
//! - **Players**: async `Player` trait with human and AI implementations
//! - **Events**: read-only match events for renderers
//! - **Settings**: TOML config files and command-line overrides
//! - **Console**: text and JSON-lines output, stdin input
//!
//! # Example
//!
//! ```no_run
//! use shutbox::{EventSink, GameController, MatchArgs, players};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = MatchArgs::default().resolve(None, 2)?;
//! let players = players::from_config(&config, None, &EventSink::disabled(), Duration::ZERO)?;
//! let mut controller = GameController::new(config, players)?;
//! let standings = controller.play_match().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod console;
mod controller;
mod events;
mod settings;

pub mod players;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Console rendering
pub use console::{
    OutputFormat, RULES, print_events, render_standings, render_text, rules_text,
    spawn_stdin_reader,
};

// Crate-level exports - Orchestration
pub use controller::GameController;

// Crate-level exports - Events
pub use events::{EventSink, MatchEvent, MatchSnapshot, SeatSnapshot};

// Crate-level exports - Players
pub use players::{AiPlayer, Choice, HumanPlayer, Player};

// Crate-level exports - Settings
pub use settings::{MatchArgs, load_config, save_config};
