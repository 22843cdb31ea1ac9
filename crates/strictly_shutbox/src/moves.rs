//! Moves and legal move generation.
//!
//! A legal move is a non-empty set of open tiles whose values add up to the
//! roll exactly. Boards hold at most twelve tiles, so the generator walks
//! every subset with pruning instead of doing anything clever.

use crate::error::MoveError;
use crate::tiles::{MAX_TILE, Tile, TileSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A non-empty set of distinct tiles to shut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Move {
    tiles: TileSet,
}

impl Move {
    /// Builds a move from tile values.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Empty`] for no tiles, [`MoveError::UnknownTile`]
    /// for values outside any board and [`MoveError::Duplicate`] when a tile
    /// is named twice.
    #[instrument(skip(tiles))]
    pub fn new(tiles: impl IntoIterator<Item = Tile>) -> Result<Self, MoveError> {
        let mut set = TileSet::EMPTY;
        for tile in tiles {
            if !(1..=MAX_TILE).contains(&tile) {
                return Err(MoveError::UnknownTile(tile));
            }
            if set.contains(tile) {
                return Err(MoveError::Duplicate(tile));
            }
            set.insert(tile);
        }
        Self::from_set(set)
    }

    /// Wraps a tile set.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Empty`] for the empty set.
    pub fn from_set(tiles: TileSet) -> Result<Self, MoveError> {
        if tiles.is_empty() {
            Err(MoveError::Empty)
        } else {
            Ok(Self { tiles })
        }
    }

    /// The tiles this move shuts.
    pub fn tiles(&self) -> TileSet {
        self.tiles
    }

    /// Tiles in ascending order.
    pub fn to_vec(&self) -> Vec<Tile> {
        self.tiles.to_vec()
    }

    /// Number of tiles shut.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of the tiles.
    pub fn sum(&self) -> u32 {
        self.tiles.sum()
    }

    /// Largest tile in the move.
    pub fn max_tile(&self) -> Tile {
        self.tiles.max().unwrap_or_default()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tiles)
    }
}

impl TryFrom<Vec<Tile>> for Move {
    type Error = MoveError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self, Self::Error> {
        Self::new(tiles)
    }
}

impl From<Move> for Vec<Tile> {
    fn from(mv: Move) -> Self {
        mv.to_vec()
    }
}

/// Every subset of `open` whose tiles add up to `target`.
///
/// The result is ordered by tile count, then by the ascending tile list, so
/// identical inputs always give identical output. It is empty when no subset
/// matches, including whenever `target` exceeds the sum of `open`.
#[instrument(skip(open), fields(open = %open))]
pub fn legal_moves(open: TileSet, target: u32) -> Vec<Move> {
    let tiles = open.to_vec();
    // suffix[i] = sum of tiles[i..]
    let mut suffix = vec![0u32; tiles.len() + 1];
    for i in (0..tiles.len()).rev() {
        suffix[i] = suffix[i + 1] + u32::from(tiles[i]);
    }

    let mut found = Vec::new();
    if target > 0 {
        collect(&tiles, &suffix, 0, target, TileSet::EMPTY, &mut found);
    }

    let mut moves: Vec<Move> = found.into_iter().map(|tiles| Move { tiles }).collect();
    moves.sort_by_key(|m| (m.len(), m.to_vec()));
    debug!(target, count = moves.len(), "Legal moves enumerated");
    moves
}

/// Whether any subset of `open` sums to `target`.
pub fn has_legal_move(open: TileSet, target: u32) -> bool {
    target > 0 && target < 128 && reachable_sums(open) & (1u128 << target) != 0
}

/// Bitmask of every sum reachable by a non-empty subset of `open`.
///
/// Bit `s` is set when some subset sums to `s`. The largest possible sum is
/// 78, so a `u128` holds them all.
pub fn reachable_sums(open: TileSet) -> u128 {
    let mut sums: u128 = 1;
    for tile in open.iter() {
        sums |= sums << tile;
    }
    sums & !1
}

fn collect(
    tiles: &[Tile],
    suffix: &[u32],
    start: usize,
    remaining: u32,
    chosen: TileSet,
    out: &mut Vec<TileSet>,
) {
    if remaining == 0 {
        out.push(chosen);
        return;
    }
    if suffix[start] < remaining {
        return;
    }
    for i in start..tiles.len() {
        let tile = u32::from(tiles[i]);
        // ascending order: every later tile is larger still
        if tile > remaining {
            break;
        }
        let mut next = chosen;
        next.insert(tiles[i]);
        collect(tiles, suffix, i + 1, remaining - tile, next, out);
    }
}
