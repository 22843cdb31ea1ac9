//! Strictly Shutbox - rules and AI for "Don't Shut the Box"
//!
//! Every player owns a box of numbered tiles. On each roll they shut open
//! tiles that add up to the dice exactly, and keep rolling until no subset
//! matches. Whatever stays open is the round score; lowest total wins.
//!
//! # Architecture
//!
//! - **Board**: one player's tiles as a bitmask set
//! - **Moves**: legal move enumeration by pruned subset search
//! - **Dice**: seeded rolls and the one-or-two-dice policy
//! - **Turn**: explicit roll / offer / apply state machine
//! - **Strategy**: computer players, from random to risk-minimising
//! - **Match**: configuration, round scores and competition ranking
//!
//! # Example
//!
//! ```
//! use strictly_shutbox::{Board, DicePolicy, DiceRoll, Move, TileRange, TurnEngine};
//!
//! let mut board = Board::new(TileRange::Nine);
//! let mut turn = TurnEngine::new(&mut board, DicePolicy::default());
//! turn.accept_roll(DiceRoll::from_values(vec![4, 5])).unwrap();
//! turn.submit_human(Move::new([4, 5]).unwrap()).unwrap();
//! assert_eq!(turn.board().score(), 36);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod config;
mod contracts;
mod dice;
mod error;
mod match_state;
mod moves;
mod strategy;
mod tiles;
mod turn;

// Crate-level exports - Tiles and boards
pub use board::Board;
pub use tiles::{MAX_TILE, Tile, TileRange, TileSet};

// Crate-level exports - Moves
pub use moves::{Move, has_legal_move, legal_moves, reachable_sums};

// Crate-level exports - Dice
pub use dice::{
    DEFAULT_FACES, Dice, DiceCount, DiceOptions, DicePolicy, DiceRoll, DiceRule,
    SingleDieTrigger, sum_weights,
};

// Crate-level exports - Contracts
pub use contracts::{Claim, Contract, ExactSum, ShutContract, TilesOpen};

// Crate-level exports - Turn engine
pub use turn::{TurnEngine, TurnOutcome, TurnPhase, TurnRecord, TurnStep, TurnTransition};

// Crate-level exports - Strategies
pub use strategy::{Difficulty, HighTiles, MaxTiles, MinRisk, RandomChoice, Strategy};

// Crate-level exports - Match setup and scoring
pub use config::{MAX_FACES, MIN_FACES, MatchConfig, PlayerKind, Seat, StartOrder};
pub use match_state::{MatchState, Standing, high_roll_winner, round_order};

// Crate-level exports - Errors
pub use error::{AiContractError, ConfigError, GameError, MoveError, TurnError};
