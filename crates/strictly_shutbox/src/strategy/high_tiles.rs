//! Clear the tiles a single die can never reach, then shut as many as
//! possible.

use super::{Strategy, most_tiles_key};
use crate::moves::Move;
use crate::tiles::TileSet;
use derive_new::new;

/// Prefers moves that shut a tile above the die face count, so the single
/// die opens up sooner. Among those, most tiles and then the largest sum.
#[derive(Debug, Clone, Copy, new)]
pub struct HighTiles {
    faces: u8,
}

impl HighTiles {
    fn shuts_high_tile(&self, mv: &Move) -> bool {
        mv.max_tile() > self.faces
    }
}

impl Strategy for HighTiles {
    fn name(&self) -> &'static str {
        "high_tiles"
    }

    fn choose_move(&mut self, _open: TileSet, legal: &[Move], _roll_sum: u32) -> Option<Move> {
        legal
            .iter()
            .max_by_key(|mv| (self.shuts_high_tile(mv), most_tiles_key(mv)))
            .copied()
    }
}
