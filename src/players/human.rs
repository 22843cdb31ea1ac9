//! Human player that answers through text lines.

use super::{Choice, Player};
use crate::events::{EventSink, MatchEvent};
use anyhow::Result;
use derive_more::{Display, Error, From};
use strictly_shutbox::{DiceCount, DiceOptions, DiceRoll, Move, MoveError, PlayerKind, Tile, TileSet};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// A line of input that could not be turned into an answer.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum InputError {
    /// Nothing was typed.
    #[display("Type the tiles to shut, #N to pick an option, or 0 to stop")]
    #[from(ignore)]
    Blank,
    /// A token was not a number.
    #[display("'{}' is not a tile number", _0)]
    #[from(ignore)]
    Unreadable(#[error(not(source))] String),
    /// `#N` named an option that was not offered.
    #[display("There is no option #{}", _0)]
    #[from(ignore)]
    NoSuchOption(#[error(not(source))] usize),
    /// The dice answer was not understood.
    #[display("Answer 1 or 2 (or y for one die, n for two)")]
    #[from(ignore)]
    DiceAnswer,
    /// The tiles do not form a move.
    #[display("{}", _0)]
    Move(MoveError),
}

/// Parses an answer to a roll.
///
/// Accepts tile lists such as `3 5` or `3,5`, `#2` for the second offered
/// move, and `0` or `stop` to concede.
#[instrument(skip(legal))]
pub fn parse_move_answer(line: &str, legal: &[Move]) -> Result<Choice, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Blank);
    }
    if line == "0" || line.eq_ignore_ascii_case("stop") {
        return Ok(Choice::Concede);
    }
    if let Some(index) = line.strip_prefix('#') {
        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| InputError::Unreadable(line.to_string()))?;
        return index
            .checked_sub(1)
            .and_then(|i| legal.get(i))
            .map(|mv| Choice::Shut(*mv))
            .ok_or(InputError::NoSuchOption(index));
    }
    let tiles = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Tile>()
                .map_err(|_| InputError::Unreadable(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Choice::Shut(Move::new(tiles)?))
}

/// Parses an answer to "roll one die?".
pub fn parse_dice_answer(line: &str) -> Result<DiceCount, InputError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" => Ok(DiceCount::One),
        "2" | "n" | "no" => Ok(DiceCount::Two),
        _ => Err(InputError::DiceAnswer),
    }
}

/// Human player reading answers from a line channel.
pub struct HumanPlayer {
    name: String,
    input_rx: mpsc::UnboundedReceiver<String>,
    events: EventSink,
}

impl HumanPlayer {
    /// Creates a new human player.
    pub fn new(
        name: impl Into<String>,
        input_rx: mpsc::UnboundedReceiver<String>,
        events: EventSink,
    ) -> Self {
        Self {
            name: name.into(),
            input_rx,
            events,
        }
    }

    fn prompt(&self, text: impl Into<String>) {
        self.events.send(MatchEvent::Prompt {
            player: self.name.clone(),
            text: text.into(),
        });
    }

    async fn next_line(&mut self) -> Result<String> {
        match self.input_rx.recv().await {
            Some(line) => Ok(line),
            None => anyhow::bail!("Input closed"),
        }
    }
}

#[async_trait::async_trait]
impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Human
    }

    async fn choose_dice(&mut self, _open: TileSet, options: DiceOptions) -> Result<DiceCount> {
        if let DiceOptions::Only(count) = options {
            return Ok(count);
        }
        self.prompt("Roll one die? [y/n]");
        loop {
            let line = self.next_line().await?;
            match parse_dice_answer(&line) {
                Ok(count) => return Ok(count),
                Err(e) => self.prompt(e.to_string()),
            }
        }
    }

    async fn choose_move(&mut self, _open: TileSet, roll: &DiceRoll, legal: &[Move]) -> Result<Choice> {
        self.prompt(format!(
            "Rolled {}. Tiles to shut (e.g. 3 5), #N for an option, 0 to stop",
            roll
        ));
        loop {
            let line = self.next_line().await?;
            match parse_move_answer(&line, legal) {
                Ok(choice) => {
                    debug!(player = %self.name, ?choice, "Human answered");
                    return Ok(choice);
                }
                Err(e) => self.prompt(e.to_string()),
            }
        }
    }

    fn rejected(&mut self, error: &MoveError) {
        self.prompt(format!("{}. Try again", error));
    }
}
