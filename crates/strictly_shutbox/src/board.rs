//! A single player's box of tiles.

use crate::error::MoveError;
use crate::moves::Move;
use crate::tiles::{Tile, TileRange, TileSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One player's tiles.
///
/// Tile values are fixed when the board is built; only their open or shut
/// flag changes, and shut tiles stay shut until [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    range: TileRange,
    open: TileSet,
}

impl Board {
    /// Creates a board with every tile open.
    #[instrument]
    pub fn new(range: TileRange) -> Self {
        Self {
            range,
            open: range.full_set(),
        }
    }

    /// The board size.
    pub fn range(&self) -> TileRange {
        self.range
    }

    /// Every tile on the board, open or shut.
    pub fn tiles(&self) -> TileSet {
        self.range.full_set()
    }

    /// Open tiles as a set.
    pub fn open_set(&self) -> TileSet {
        self.open
    }

    /// Open tile values in ascending order.
    pub fn open_tiles(&self) -> Vec<Tile> {
        self.open.to_vec()
    }

    /// Shut tile values in ascending order.
    pub fn shut_tiles(&self) -> Vec<Tile> {
        self.tiles().difference(self.open).to_vec()
    }

    /// Whether the tile is still open.
    pub fn is_open(&self, tile: Tile) -> bool {
        self.open.contains(tile)
    }

    /// Shuts every tile in the move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::UnknownTile`] or [`MoveError::TileShut`] if any
    /// tile is not currently open. The board is left untouched on error.
    #[instrument(skip(self, mv), fields(mv = %mv, open = %self.open))]
    pub fn shut(&mut self, mv: &Move) -> Result<(), MoveError> {
        for tile in mv.tiles().iter() {
            if !self.tiles().contains(tile) {
                return Err(MoveError::UnknownTile(tile));
            }
            if !self.open.contains(tile) {
                return Err(MoveError::TileShut(tile));
            }
        }
        self.open = self.open.difference(mv.tiles());
        debug!(remaining = %self.open, "Tiles shut");
        Ok(())
    }

    /// True when no open tiles remain.
    pub fn is_complete(&self) -> bool {
        self.open.is_empty()
    }

    /// Sum of the open tiles; zero once the box is shut.
    pub fn score(&self) -> u32 {
        self.open.sum()
    }

    /// Reopens every tile for a new round.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.open = self.range.full_set();
    }

    /// Formats the board as two rows: tile numbers and open/shut marks.
    pub fn display(&self) -> String {
        let tiles = self.tiles().to_vec();
        let numbers = tiles
            .iter()
            .map(|t| format!("{:>2}", t))
            .collect::<Vec<_>>()
            .join(" ");
        let marks = tiles
            .iter()
            .map(|&t| if self.is_open(t) { " O" } else { " X" })
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n{}", numbers, marks)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(TileRange::default())
    }
}
