//! One-step lookahead against the exact dice distribution.

use super::{Strategy, most_tiles_key};
use crate::dice::{DiceCount, DiceOptions, DicePolicy};
use crate::moves::Move;
use crate::tiles::TileSet;
use std::cmp::Reverse;
use tracing::{debug, instrument};

/// Picks the move whose resulting board is least likely to be stuck on the
/// next roll.
///
/// Risk is measured in equally likely outcomes of two dice, assuming the
/// next roll uses whichever allowed dice count is safer. A shut box has no
/// risk. Ties fall back to [`MaxTiles`](super::MaxTiles).
#[derive(Debug, Clone, Copy)]
pub struct MinRisk {
    policy: DicePolicy,
}

impl MinRisk {
    /// Creates the strategy for a dice rule.
    pub fn new(policy: DicePolicy) -> Self {
        Self { policy }
    }

    /// Stuck weight of the board left behind by `mv`.
    pub fn risk_after(&self, open: TileSet, mv: &Move) -> u32 {
        let rest = open.difference(mv.tiles());
        self.policy.best_stuck_weight(rest).0
    }
}

impl Strategy for MinRisk {
    fn name(&self) -> &'static str {
        "min_risk"
    }

    #[instrument(skip(self, legal), fields(open = %open, choices = legal.len()))]
    fn choose_move(&mut self, open: TileSet, legal: &[Move], roll_sum: u32) -> Option<Move> {
        let choice = legal
            .iter()
            .min_by_key(|mv| (self.risk_after(open, mv), Reverse(most_tiles_key(mv))))
            .copied();
        if let Some(mv) = &choice {
            debug!(mv = %mv, risk = self.risk_after(open, mv), "Lowest risk move");
        }
        choice
    }

    fn choose_dice(&mut self, open: TileSet, options: DiceOptions) -> DiceCount {
        options
            .counts()
            .into_iter()
            .min_by_key(|&count| self.policy.stuck_weight(open, count))
            .unwrap_or(DiceCount::Two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceRule, SingleDieTrigger};
    use crate::moves::legal_moves;

    fn set(tiles: &[u8]) -> TileSet {
        tiles.iter().copied().collect()
    }

    #[test]
    fn test_prefers_lower_risk_over_more_tiles() {
        // {7} leaves {2,5}, where one die is allowed and sticks 4 times in 6.
        // {2,5} leaves {7}, which two dice miss 30 times in 36.
        let open = set(&[2, 5, 7]);
        let mut strategy = MinRisk::new(DicePolicy::default());
        assert_eq!(strategy.risk_after(open, &Move::new([7]).unwrap()), 24);
        assert_eq!(strategy.risk_after(open, &Move::new([2, 5]).unwrap()), 30);
        assert_eq!(
            strategy.choose_move(open, &legal_moves(open, 7), 7),
            Some(Move::new([7]).unwrap())
        );
    }

    #[test]
    fn test_avoids_leaving_unreachable_tile() {
        // {4} leaves {1,3,11}, which answers 3, 4, 11 and 12.
        // {1,3} leaves {4,11}, which answers only 4 and 11.
        let policy = DicePolicy::new(DiceRule::Two, SingleDieTrigger::Always, 6);
        let mut strategy = MinRisk::new(policy);
        let open = set(&[1, 3, 4, 11]);
        assert_eq!(strategy.risk_after(open, &Move::new([4]).unwrap()), 28);
        assert_eq!(strategy.risk_after(open, &Move::new([1, 3]).unwrap()), 31);
        assert_eq!(
            strategy.choose_move(open, &legal_moves(open, 4), 4),
            Some(Move::new([4]).unwrap())
        );
    }

    #[test]
    fn test_dice_choice_follows_risk() {
        let mut strategy = MinRisk::new(DicePolicy::default());
        // {1}: one die sticks 5/6 of the time, two dice always
        assert_eq!(strategy.choose_dice(set(&[1]), DiceOptions::Either), DiceCount::One);
        // {6}: one die sticks 30 in 36, two dice 31 in 36
        assert_eq!(strategy.choose_dice(set(&[6]), DiceOptions::Either), DiceCount::One);
        assert_eq!(
            strategy.choose_dice(set(&[1, 2, 3, 4, 5, 6]), DiceOptions::Only(DiceCount::Two)),
            DiceCount::Two
        );
    }
}
