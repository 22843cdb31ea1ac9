//! Match setup: seats, board size, dice rule and round count.

use crate::dice::{DEFAULT_FACES, DicePolicy, DiceRule, SingleDieTrigger};
use crate::error::ConfigError;
use crate::strategy::Difficulty;
use crate::tiles::TileRange;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

/// Fewest faces a die may have.
pub const MIN_FACES: u8 = 2;
/// Most faces a die may have.
pub const MAX_FACES: u8 = 20;

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerKind {
    /// A person at the keyboard.
    Human,
    /// A computer strategy.
    Ai {
        /// Strategy strength.
        #[serde(default)]
        difficulty: Difficulty,
    },
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Ai { difficulty } => write!(f, "ai ({})", difficulty),
        }
    }
}

/// A named seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Seat {
    /// Display name, unique within a match.
    name: String,
    /// Human or computer.
    kind: PlayerKind,
}

impl Seat {
    /// A human seat.
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Human,
        }
    }

    /// A computer seat.
    pub fn ai(name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Ai { difficulty },
        }
    }

    /// Whether a person plays this seat.
    pub fn is_human(&self) -> bool {
        matches!(self.kind, PlayerKind::Human)
    }
}

/// How the first player of each round is chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StartOrder {
    /// Seats play in configuration order every round.
    #[default]
    Seated,
    /// Every seat rolls two dice and the highest roll starts. Ties go to
    /// the earlier seat.
    HighRoll,
}

/// Complete setup for a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct MatchConfig {
    /// Rounds to play.
    #[serde(default = "default_rounds")]
    rounds: u32,

    /// Board size.
    #[serde(default)]
    tiles: TileRange,

    /// How many dice are thrown.
    #[serde(default)]
    dice_rule: DiceRule,

    /// When a single die is allowed under [`DiceRule::Choice`].
    #[serde(default)]
    single_die: SingleDieTrigger,

    /// Faces per die.
    #[serde(default = "default_faces")]
    faces: u8,

    /// First player selection.
    #[serde(default)]
    start_order: StartOrder,

    /// Seed for dice and random strategies; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Seats in play order.
    #[serde(default)]
    seats: Vec<Seat>,
}

fn default_rounds() -> u32 {
    3
}

fn default_faces() -> u8 {
    DEFAULT_FACES
}

impl MatchConfig {
    /// Config with the classic rules for the given seats.
    pub fn new(seats: Vec<Seat>) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    /// Dice policy implied by the rule, trigger and faces.
    pub fn dice_policy(&self) -> DicePolicy {
        DicePolicy::new(self.dice_rule, self.single_die, self.faces)
    }

    /// Checks the setup before any round is played.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for no seats, blank or repeated names, zero
    /// rounds, or a face count outside `2..=20`.
    #[instrument(skip(self), fields(seats = self.seats.len(), rounds = self.rounds))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.is_empty() {
            return Err(ConfigError::new("At least one seat is required"));
        }
        let mut names = HashSet::new();
        for seat in &self.seats {
            let name = seat.name.trim();
            if name.is_empty() {
                return Err(ConfigError::new("Seat names must not be blank"));
            }
            if !names.insert(name) {
                return Err(ConfigError::new(format!(
                    "Seat name '{}' is used more than once",
                    name
                )));
            }
        }
        if self.rounds == 0 {
            return Err(ConfigError::new("A match needs at least one round"));
        }
        if !(MIN_FACES..=MAX_FACES).contains(&self.faces) {
            return Err(ConfigError::new(format!(
                "Dice must have {} to {} faces, got {}",
                MIN_FACES, MAX_FACES, self.faces
            )));
        }
        debug!("Config valid");
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seats: Vec::new(),
            rounds: default_rounds(),
            tiles: TileRange::default(),
            dice_rule: DiceRule::default(),
            single_die: SingleDieTrigger::default(),
            faces: default_faces(),
            start_order: StartOrder::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_seats() -> Vec<Seat> {
        vec![Seat::human("Ada"), Seat::ai("Bot", Difficulty::Hard)]
    }

    #[test]
    fn test_defaults_are_classic() {
        let config = MatchConfig::new(two_seats());
        assert_eq!(*config.rounds(), 3);
        assert_eq!(*config.tiles(), TileRange::Nine);
        assert_eq!(config.dice_policy(), DicePolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_seats() {
        assert!(MatchConfig::default().validate().is_err());
    }

    #[test]
    fn test_rejects_zero_rounds() {
        let config = MatchConfig::new(two_seats()).with_rounds(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let config = MatchConfig::new(vec![Seat::human("Ada"), Seat::ai("Ada", Difficulty::Easy)]);
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("Ada"));
    }

    #[test]
    fn test_rejects_blank_name() {
        let config = MatchConfig::new(vec![Seat::human("  ")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_odd_faces() {
        let config = MatchConfig::new(two_seats()).with_faces(1);
        assert!(config.validate().is_err());
        let config = MatchConfig::new(two_seats()).with_faces(21);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_with_defaults() {
        let text = r#"
            tiles = 12
            start_order = "high_roll"

            [[seats]]
            name = "Ada"
            kind = { type = "human" }

            [[seats]]
            name = "Bot"
            kind = { type = "ai", difficulty = "classic" }
        "#;
        let config: MatchConfig = toml::from_str(text).unwrap();
        assert_eq!(*config.tiles(), TileRange::Twelve);
        assert_eq!(*config.start_order(), StartOrder::HighRoll);
        assert_eq!(*config.rounds(), 3);
        assert_eq!(
            config.seats()[1].kind(),
            &PlayerKind::Ai {
                difficulty: Difficulty::Classic
            }
        );
    }

    #[test]
    fn test_toml_rejects_unsupported_tiles() {
        let text = "tiles = 10\n";
        assert!(toml::from_str::<MatchConfig>(text).is_err());
    }
}
