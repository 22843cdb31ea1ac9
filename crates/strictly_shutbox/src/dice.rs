//! Dice, rolls and the rule for how many dice a player may throw.

use crate::moves::has_legal_move;
use crate::tiles::TileSet;
use derive_getters::Getters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

/// Standard six-sided dice.
pub const DEFAULT_FACES: u8 = 6;

/// How many dice are thrown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiceCount {
    /// A single die.
    #[strum(to_string = "one", serialize = "1")]
    One,
    /// A pair of dice.
    #[strum(to_string = "two", serialize = "2")]
    Two,
}

impl DiceCount {
    /// Number of dice as an integer.
    pub fn get(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Result of one throw. Created fresh for every roll.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Face values in the order they were thrown.
    values: Vec<u8>,
    /// Sum of the face values.
    sum: u32,
}

impl DiceRoll {
    /// Builds a roll from face values.
    pub fn from_values(values: Vec<u8>) -> Self {
        let sum = values.iter().map(|&v| u32::from(v)).sum();
        Self { values, sum }
    }

    /// How many dice were thrown.
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces = self
            .values
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(" + ");
        if self.values.len() > 1 {
            write!(f, "{} = {}", faces, self.sum)
        } else {
            write!(f, "{}", self.sum)
        }
    }
}

/// Random source for rolls.
///
/// Seeded dice replay the exact same sequence of throws.
#[derive(Debug, Clone)]
pub struct Dice {
    faces: u8,
    rng: StdRng,
}

impl Dice {
    /// Dice seeded from operating system entropy.
    #[instrument]
    pub fn new(faces: u8) -> Self {
        Self {
            faces,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Dice with a fixed seed, for reproducible matches and tests.
    #[instrument]
    pub fn seeded(faces: u8, seed: u64) -> Self {
        Self {
            faces,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Faces per die.
    pub fn faces(&self) -> u8 {
        self.faces
    }

    /// Throws `count` dice, each uniform in `1..=faces`.
    #[instrument(skip(self), fields(faces = self.faces))]
    pub fn roll(&mut self, count: DiceCount) -> DiceRoll {
        let values = (0..count.get())
            .map(|_| self.rng.random_range(1..=self.faces))
            .collect();
        let roll = DiceRoll::from_values(values);
        debug!(roll = %roll, "Dice rolled");
        roll
    }
}

/// Which dice counts a player may choose from for the next roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceOptions {
    /// Exactly this many dice.
    Only(DiceCount),
    /// The player picks one or two dice.
    Either,
}

impl DiceOptions {
    /// Whether `count` is allowed.
    pub fn allows(self, count: DiceCount) -> bool {
        match self {
            Self::Only(only) => only == count,
            Self::Either => true,
        }
    }

    /// The counts on offer, fewest dice first.
    pub fn counts(self) -> Vec<DiceCount> {
        match self {
            Self::Only(only) => vec![only],
            Self::Either => vec![DiceCount::One, DiceCount::Two],
        }
    }

    /// Whether the player actually has a choice to make.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Either)
    }
}

/// How many dice the rules call for.
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
pub enum DiceRule {
    /// Always two dice.
    Two,
    /// Always one die.
    One,
    /// Two dice, with the option of one die whenever the trigger allows it.
    #[default]
    Choice,
}

/// When a player on [`DiceRule::Choice`] may throw a single die.
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
pub enum SingleDieTrigger {
    /// On any roll.
    Always,
    /// Only once every open tile fits on one die (7, 8 and 9 shut on the
    /// classic box).
    #[default]
    HighTilesShut,
}

/// Everything the engine needs to decide and evaluate dice counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DicePolicy {
    /// Base rule.
    rule: DiceRule,
    /// Single-die trigger under [`DiceRule::Choice`].
    trigger: SingleDieTrigger,
    /// Faces per die.
    faces: u8,
}

impl DicePolicy {
    /// Creates a policy.
    pub fn new(rule: DiceRule, trigger: SingleDieTrigger, faces: u8) -> Self {
        Self {
            rule,
            trigger,
            faces,
        }
    }

    /// Dice counts allowed for a roll against `open`.
    #[instrument(skip(self, open), fields(rule = %self.rule, open = %open))]
    pub fn options(&self, open: TileSet) -> DiceOptions {
        match self.rule {
            DiceRule::Two => DiceOptions::Only(DiceCount::Two),
            DiceRule::One => DiceOptions::Only(DiceCount::One),
            DiceRule::Choice => {
                let single_allowed = match self.trigger {
                    SingleDieTrigger::Always => true,
                    SingleDieTrigger::HighTilesShut => {
                        open.max().is_some_and(|max| max <= self.faces)
                    }
                };
                if single_allowed {
                    DiceOptions::Either
                } else {
                    DiceOptions::Only(DiceCount::Two)
                }
            }
        }
    }

    /// Number of equally likely outcomes when throwing `count` dice.
    pub fn outcomes(&self, count: DiceCount) -> u32 {
        u32::from(self.faces).pow(u32::from(count.get()))
    }

    /// How many of the equally likely outcomes of `count` dice leave `open`
    /// with no legal move.
    pub fn stuck_outcomes(&self, open: TileSet, count: DiceCount) -> u32 {
        sum_weights(count, self.faces)
            .into_iter()
            .filter(|&(sum, _)| !has_legal_move(open, sum))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Chance that the next roll of `count` dice leaves `open` stuck, scaled
    /// to a common denominator of `faces²` so values for one and two dice
    /// compare exactly. A shut box is never stuck.
    pub fn stuck_weight(&self, open: TileSet, count: DiceCount) -> u32 {
        if open.is_empty() {
            return 0;
        }
        let scale = self.outcomes(DiceCount::Two) / self.outcomes(count);
        self.stuck_outcomes(open, count) * scale
    }

    /// Lowest stuck weight over the dice counts allowed against `open`, and
    /// the count that achieves it. Ties prefer the fewest dice.
    pub fn best_stuck_weight(&self, open: TileSet) -> (u32, DiceCount) {
        self.options(open)
            .counts()
            .into_iter()
            .map(|count| (self.stuck_weight(open, count), count))
            .min()
            .unwrap_or((0, DiceCount::Two))
    }
}

impl Default for DicePolicy {
    fn default() -> Self {
        Self::new(DiceRule::default(), SingleDieTrigger::default(), DEFAULT_FACES)
    }
}

/// Every possible sum of `count` dice with the number of ways to throw it.
pub fn sum_weights(count: DiceCount, faces: u8) -> Vec<(u32, u32)> {
    let faces = u32::from(faces);
    match count {
        DiceCount::One => (1..=faces).map(|s| (s, 1)).collect(),
        DiceCount::Two => (2..=2 * faces)
            .map(|s| {
                let ways = if s <= faces + 1 { s - 1 } else { 2 * faces + 1 - s };
                (s, ways)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Tile;

    fn set(tiles: &[Tile]) -> TileSet {
        tiles.iter().copied().collect()
    }

    #[test]
    fn test_roll_values_in_range() {
        let mut dice = Dice::seeded(6, 7);
        for _ in 0..1_000 {
            let roll = dice.roll(DiceCount::Two);
            assert_eq!(roll.count(), 2);
            assert!(roll.values().iter().all(|v| (1..=6).contains(v)));
            assert_eq!(*roll.sum(), roll.values().iter().map(|&v| u32::from(v)).sum::<u32>());
            let single = dice.roll(DiceCount::One);
            assert!((1..=6).contains(single.sum()));
        }
    }

    #[test]
    fn test_seeded_dice_repeat() {
        let mut a = Dice::seeded(6, 42);
        let mut b = Dice::seeded(6, 42);
        for _ in 0..100 {
            assert_eq!(a.roll(DiceCount::Two), b.roll(DiceCount::Two));
        }
    }

    #[test]
    fn test_every_face_shows_up() {
        let mut dice = Dice::seeded(6, 3);
        let mut seen = [false; 7];
        for _ in 0..600 {
            seen[*dice.roll(DiceCount::One).sum() as usize] = true;
        }
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn test_two_dice_distribution() {
        let weights = sum_weights(DiceCount::Two, 6);
        assert_eq!(weights.len(), 11);
        assert_eq!(weights[0], (2, 1));
        assert_eq!(weights[5], (7, 6));
        assert_eq!(weights[10], (12, 1));
        assert_eq!(weights.iter().map(|&(_, w)| w).sum::<u32>(), 36);
    }

    #[test]
    fn test_fixed_rules() {
        let open = TileSet::range(9);
        let two = DicePolicy::new(DiceRule::Two, SingleDieTrigger::Always, 6);
        let one = DicePolicy::new(DiceRule::One, SingleDieTrigger::Always, 6);
        assert_eq!(two.options(open), DiceOptions::Only(DiceCount::Two));
        assert_eq!(one.options(open), DiceOptions::Only(DiceCount::One));
    }

    #[test]
    fn test_high_tiles_trigger() {
        let policy = DicePolicy::default();
        assert_eq!(policy.options(TileSet::range(9)), DiceOptions::Only(DiceCount::Two));
        assert_eq!(policy.options(set(&[1, 4, 6])), DiceOptions::Either);
        assert_eq!(policy.options(set(&[2, 7])), DiceOptions::Only(DiceCount::Two));
    }

    #[test]
    fn test_always_trigger() {
        let policy = DicePolicy::new(DiceRule::Choice, SingleDieTrigger::Always, 6);
        assert_eq!(policy.options(TileSet::range(9)), DiceOptions::Either);
    }

    #[test]
    fn test_stuck_weight_scales_single_die() {
        let policy = DicePolicy::default();
        // {1}: one die sticks on 2..=6 (5 of 6), two dice always stick
        assert_eq!(policy.stuck_weight(set(&[1]), DiceCount::One), 30);
        assert_eq!(policy.stuck_weight(set(&[1]), DiceCount::Two), 36);
        assert_eq!(policy.stuck_weight(TileSet::EMPTY, DiceCount::Two), 0);
    }

    #[test]
    fn test_full_board_never_stuck() {
        let policy = DicePolicy::default();
        assert_eq!(policy.stuck_weight(TileSet::range(9), DiceCount::Two), 0);
    }

    #[test]
    fn test_dice_rule_parses() {
        assert_eq!("choice".parse::<DiceRule>().unwrap(), DiceRule::Choice);
        assert_eq!("2".parse::<DiceCount>().unwrap(), DiceCount::Two);
        assert_eq!(
            "high_tiles_shut".parse::<SingleDieTrigger>().unwrap(),
            SingleDieTrigger::HighTilesShut
        );
    }
}
