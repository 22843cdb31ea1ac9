//! Command-line interface for shutbox.

use crate::settings::MatchArgs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shutbox - Don't Shut the Box against computer opponents
#[derive(Parser, Debug)]
#[command(name = "shutbox")]
#[command(about = "Don't Shut the Box dice game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Write logs to this file instead of the terminal
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run; defaults to `play`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play against computer opponents
    Play {
        /// Your name at the table
        #[arg(short, long, default_value = "You")]
        name: String,

        /// Milliseconds a computer player waits before each decision
        #[arg(long, default_value = "400")]
        delay_ms: u64,

        #[command(flatten)]
        game: MatchArgs,
    },

    /// Run an all-computer match and print the ranking
    Simulate {
        #[command(flatten)]
        game: MatchArgs,
    },

    /// Print the rules
    Rules,
}

impl Cli {
    /// The chosen command, or `play` with defaults.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Play {
            name: "You".to_string(),
            delay_ms: 400,
            game: MatchArgs::default(),
        })
    }
}
