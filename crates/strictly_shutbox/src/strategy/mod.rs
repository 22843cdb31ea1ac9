//! Computer strategies.
//!
//! A strategy is picked per seat when the match is set up and is consulted
//! once per roll. It must answer with a member of the legal set it was
//! given; the turn engine treats anything else as a fatal contract breach.

mod high_tiles;
mod max_tiles;
mod min_risk;
mod random;

pub use high_tiles::HighTiles;
pub use max_tiles::MaxTiles;
pub use min_risk::MinRisk;
pub use random::RandomChoice;

use crate::dice::{DiceCount, DiceOptions, DicePolicy};
use crate::moves::Move;
use crate::tiles::{Tile, TileSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::instrument;

/// Chooses moves and dice for a computer seat.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Name used in logs and contract errors.
    fn name(&self) -> &'static str;

    /// Picks one of `legal` for a roll totalling `roll_sum` against `open`.
    ///
    /// `legal` is never empty when the engine asks.
    fn choose_move(&mut self, open: TileSet, legal: &[Move], roll_sum: u32) -> Option<Move>;

    /// Picks how many dice to throw. Takes a single die whenever allowed.
    fn choose_dice(&mut self, _open: TileSet, options: DiceOptions) -> DiceCount {
        if options.allows(DiceCount::One) {
            DiceCount::One
        } else {
            DiceCount::Two
        }
    }
}

/// Strategy strength offered at seat setup.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal move.
    Easy,
    /// Shut as many tiles as possible.
    #[default]
    Medium,
    /// Clear the high tiles first, then shut as many as possible.
    Classic,
    /// Minimise the chance of being stuck on the next roll.
    Hard,
}

impl Difficulty {
    /// Builds the strategy for this difficulty.
    ///
    /// `seed` only matters for [`Difficulty::Easy`].
    #[instrument]
    pub fn build(self, policy: DicePolicy, seed: u64) -> Box<dyn Strategy> {
        match self {
            Self::Easy => Box::new(RandomChoice::seeded(seed)),
            Self::Medium => Box::new(MaxTiles::new()),
            Self::Classic => Box::new(HighTiles::new(*policy.faces())),
            Self::Hard => Box::new(MinRisk::new(policy)),
        }
    }
}

/// Ordering key for "most tiles, then largest tile, then the next largest".
///
/// Larger keys are better.
pub(crate) fn most_tiles_key(mv: &Move) -> (usize, Vec<Tile>) {
    let mut tiles = mv.to_vec();
    tiles.reverse();
    (mv.len(), tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_difficulty_names() {
        let names: Vec<String> = Difficulty::iter().map(|d| d.to_string()).collect();
        assert_eq!(names, vec!["easy", "medium", "classic", "hard"]);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_most_tiles_key_orders_by_count_then_size() {
        let small = Move::new([1, 2, 6]).unwrap();
        let large = Move::new([2, 3, 4]).unwrap();
        let pair = Move::new([1, 8]).unwrap();
        assert!(most_tiles_key(&small) > most_tiles_key(&large));
        assert!(most_tiles_key(&large) > most_tiles_key(&pair));
    }

    #[test]
    fn test_default_dice_choice_prefers_one_die() {
        let mut strategy = MaxTiles::new();
        assert_eq!(
            strategy.choose_dice(TileSet::range(6), DiceOptions::Either),
            DiceCount::One
        );
        assert_eq!(
            strategy.choose_dice(TileSet::range(9), DiceOptions::Only(DiceCount::Two)),
            DiceCount::Two
        );
    }
}
