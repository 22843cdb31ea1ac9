//! Greedy "shut as many tiles as possible".

use super::{Strategy, most_tiles_key};
use crate::moves::Move;
use crate::tiles::TileSet;
use derive_new::new;

/// Shuts the most tiles; ties go to the move with the larger tiles.
#[derive(Debug, Clone, Copy, Default, new)]
pub struct MaxTiles;

impl Strategy for MaxTiles {
    fn name(&self) -> &'static str {
        "max_tiles"
    }

    fn choose_move(&mut self, _open: TileSet, legal: &[Move], _roll_sum: u32) -> Option<Move> {
        legal.iter().max_by_key(|mv| most_tiles_key(mv)).copied()
    }
}
