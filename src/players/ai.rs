//! Computer player backed by a strategy.

use super::{Choice, Player};
use anyhow::Result;
use std::time::Duration;
use strictly_shutbox::{DiceCount, DiceOptions, DiceRoll, Difficulty, Move, PlayerKind, Strategy, TileSet};
use tracing::debug;

/// AI player that asks its strategy for every decision.
pub struct AiPlayer {
    name: String,
    difficulty: Difficulty,
    strategy: Box<dyn Strategy>,
    delay: Duration,
}

impl AiPlayer {
    /// Creates a new AI player.
    pub fn new(name: impl Into<String>, difficulty: Difficulty, strategy: Box<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            difficulty,
            strategy,
            delay: Duration::ZERO,
        }
    }

    /// Pauses before every decision so people can follow along.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

}

async fn think(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait::async_trait]
impl Player for AiPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Ai {
            difficulty: self.difficulty,
        }
    }

    async fn choose_dice(&mut self, open: TileSet, options: DiceOptions) -> Result<DiceCount> {
        think(self.delay).await;
        let count = self.strategy.choose_dice(open, options);
        debug!(ai = %self.name, dice = %count, "AI chose dice");
        Ok(count)
    }

    async fn choose_move(&mut self, open: TileSet, roll: &DiceRoll, legal: &[Move]) -> Result<Choice> {
        think(self.delay).await;
        let choice = self.strategy.choose_move(open, legal, *roll.sum());
        debug!(ai = %self.name, strategy = self.strategy.name(), ?choice, "AI chose move");
        Ok(choice.map_or(Choice::Undecided, Choice::Shut))
    }
}
