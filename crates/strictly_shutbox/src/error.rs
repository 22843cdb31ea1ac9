//! Error types for the rule engine.
//!
//! Only [`MoveError`] is recoverable: the caller asks the human again.
//! [`AiContractError`] and [`ConfigError`] stop the match.

use crate::tiles::Tile;
use derive_more::{Display, Error, From};
use tracing::instrument;

/// A candidate move was rejected.
///
/// Rejection never changes board or turn state.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// A move must shut at least one tile.
    #[display("A move must shut at least one tile")]
    Empty,

    /// The tile is not on this board.
    #[display("Tile {} is not on the board", _0)]
    UnknownTile(#[error(not(source))] Tile),

    /// The same tile was named twice.
    #[display("Tile {} is listed more than once", _0)]
    Duplicate(#[error(not(source))] Tile),

    /// The tile was already shut.
    #[display("Tile {} is already shut", _0)]
    TileShut(#[error(not(source))] Tile),

    /// The tiles do not add up to the roll.
    #[display("Tiles sum to {} but the roll is {}", sum, roll)]
    WrongSum {
        /// Sum of the offered tiles.
        sum: u32,
        /// Current roll total.
        roll: u32,
    },

    /// The move is not one of the offered legal moves.
    #[display("{} is not a legal move for this roll", _0)]
    NotOffered(#[error(not(source))] String),
}

/// A computer strategy returned a move outside the legal set.
#[derive(Debug, Clone, Display, Error)]
#[display(
    "Strategy {} broke its contract with {} at {}:{}",
    strategy,
    offending,
    file,
    line
)]
pub struct AiContractError {
    /// Name of the strategy that misbehaved.
    pub strategy: String,
    /// What it returned.
    pub offending: String,
    /// Line number where the breach was detected.
    pub line: u32,
    /// Source file where the breach was detected.
    pub file: &'static str,
}

impl AiContractError {
    /// Creates a contract error tagged with the caller location.
    #[track_caller]
    #[instrument(skip(strategy, offending))]
    pub fn new(strategy: impl Into<String>, offending: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            strategy: strategy.into(),
            offending: offending.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Invalid match setup.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The turn engine was driven out of order.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TurnError {
    /// The requested operation does not apply in the current phase.
    #[display("Cannot {} while the turn is {}", action, phase)]
    WrongPhase {
        /// What the caller tried to do.
        action: &'static str,
        /// The phase the turn is in.
        phase: &'static str,
    },

    /// The dice rule does not allow this many dice right now.
    #[display("Rolling {} dice is not allowed right now", _0)]
    DiceNotAllowed(#[error(not(source))] u8),

    /// A postcondition failed after a move.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(#[error(not(source))] String),
}

/// Any failure the match can stop on.
#[derive(Debug, Display, Error, From)]
pub enum GameError {
    /// A move was rejected.
    #[display("{}", _0)]
    Move(MoveError),
    /// A strategy broke its contract.
    #[display("{}", _0)]
    AiContract(AiContractError),
    /// The match was set up incorrectly.
    #[display("{}", _0)]
    Config(ConfigError),
    /// The turn engine was misused.
    #[display("{}", _0)]
    Turn(TurnError),
    /// The match was aborted before it finished.
    #[display("Match aborted: {}", _0)]
    #[from(ignore)]
    Aborted(#[error(not(source))] String),
}
