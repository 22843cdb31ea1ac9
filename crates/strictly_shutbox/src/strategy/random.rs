//! Uniform random choice.

use super::Strategy;
use crate::moves::Move;
use crate::tiles::TileSet;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, instrument};

/// Picks any legal move with equal probability.
#[derive(Debug, Clone)]
pub struct RandomChoice {
    rng: StdRng,
}

impl RandomChoice {
    /// Random strategy with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomChoice {
    fn name(&self) -> &'static str {
        "random"
    }

    #[instrument(skip(self, legal), fields(choices = legal.len()))]
    fn choose_move(&mut self, open: TileSet, legal: &[Move], roll_sum: u32) -> Option<Move> {
        let choice = legal.choose(&mut self.rng).copied();
        debug!(choice = ?choice.map(|m| m.to_string()), "Random pick");
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::legal_moves;

    #[test]
    fn test_random_picks_from_legal_set() {
        let mut strategy = RandomChoice::seeded(11);
        let open = TileSet::range(9);
        let legal = legal_moves(open, 9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let mv = strategy.choose_move(open, &legal, 9).unwrap();
            assert!(legal.contains(&mv));
            seen.insert(mv);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let open = TileSet::range(12);
        let legal = legal_moves(open, 12);
        let mut a = RandomChoice::seeded(5);
        let mut b = RandomChoice::seeded(5);
        for _ in 0..50 {
            assert_eq!(a.choose_move(open, &legal, 12), b.choose_move(open, &legal, 12));
        }
    }
}
