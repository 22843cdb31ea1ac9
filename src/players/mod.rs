//! Player trait and implementations.

mod ai;
mod human;

pub use ai::AiPlayer;
pub use human::{HumanPlayer, InputError, parse_dice_answer, parse_move_answer};

use anyhow::Result;
use strictly_shutbox::{
    DiceCount, DiceOptions, DiceRoll, MatchConfig, Move, MoveError, PlayerKind, TileSet,
};
use tokio::sync::mpsc;

use crate::events::EventSink;

/// A player's answer to a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Shut these tiles.
    Shut(Move),
    /// Stop the turn and keep the open tiles as score.
    Concede,
    /// The player produced no move at all.
    Undecided,
}

/// Trait for players that answer dice and move prompts.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Returns the player's display name.
    fn name(&self) -> &str;

    /// Human or computer.
    fn kind(&self) -> PlayerKind;

    /// Picks how many dice to throw. Only asked when there is a choice.
    async fn choose_dice(&mut self, open: TileSet, options: DiceOptions) -> Result<DiceCount>;

    /// Answers a roll. `legal` is never empty.
    async fn choose_move(&mut self, open: TileSet, roll: &DiceRoll, legal: &[Move]) -> Result<Choice>;

    /// Told when the last answer was rejected, before being asked again.
    fn rejected(&mut self, _error: &MoveError) {}
}

/// Builds one player per configured seat.
///
/// Human seats read lines from `input`; only one human seat is supported
/// per input stream. Computer seats derive their seed from the match seed
/// and their seat index so seeded matches replay exactly.
pub fn from_config(
    config: &MatchConfig,
    mut input: Option<mpsc::UnboundedReceiver<String>>,
    events: &EventSink,
    ai_delay: std::time::Duration,
) -> Result<Vec<Box<dyn Player>>> {
    let policy = config.dice_policy();
    let mut players: Vec<Box<dyn Player>> = Vec::with_capacity(config.seats().len());
    for (index, seat) in config.seats().iter().enumerate() {
        match seat.kind() {
            PlayerKind::Human => {
                let Some(rx) = input.take() else {
                    anyhow::bail!("No input available for human seat '{}'", seat.name());
                };
                players.push(Box::new(HumanPlayer::new(seat.name(), rx, events.clone())));
            }
            PlayerKind::Ai { difficulty } => {
                let seed = strategy_seed(config.seed(), index);
                let strategy = difficulty.build(policy, seed);
                players.push(Box::new(
                    AiPlayer::new(seat.name(), *difficulty, strategy).with_delay(ai_delay),
                ));
            }
        }
    }
    Ok(players)
}

fn strategy_seed(match_seed: &Option<u64>, seat: usize) -> u64 {
    match match_seed {
        Some(seed) => seed.wrapping_add(seat as u64 + 1),
        None => rand::random(),
    }
}
