//! Tile values and bitmask tile sets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A numbered tile. Tiles run from 1 to the board size.
pub type Tile = u8;

/// Largest tile any board can hold.
pub const MAX_TILE: Tile = 12;

/// Supported board sizes.
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
#[serde(try_from = "u8", into = "u8")]
pub enum TileRange {
    /// The classic 1-9 box.
    #[default]
    #[strum(serialize = "9")]
    Nine,
    /// The 1-12 variant.
    #[strum(serialize = "12")]
    Twelve,
}

impl TileRange {
    /// Highest tile on the board.
    pub fn max_tile(self) -> Tile {
        match self {
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }

    /// All tiles on a fresh board.
    pub fn full_set(self) -> TileSet {
        TileSet::range(self.max_tile())
    }
}

impl TryFrom<u8> for TileRange {
    type Error = crate::ConfigError;

    #[track_caller]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            9 => Ok(Self::Nine),
            12 => Ok(Self::Twelve),
            other => Err(crate::ConfigError::new(format!(
                "Unsupported tile range 1-{}, expected 9 or 12",
                other
            ))),
        }
    }
}

impl From<TileRange> for u8 {
    fn from(range: TileRange) -> Self {
        range.max_tile()
    }
}

/// A set of tiles stored as a bitmask; bit `t` is tile `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileSet(u16);

impl TileSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Tiles `1..=max`.
    pub fn range(max: Tile) -> Self {
        let max = max.min(MAX_TILE);
        Self(((1u16 << (max + 1)) - 1) & !1)
    }

    /// Builds a set from raw bits. Bit 0 and bits above [`MAX_TILE`] are dropped.
    pub fn from_bits(bits: u16) -> Self {
        Self(bits & Self::range(MAX_TILE).0)
    }

    /// Raw bitmask.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether the tile is a member.
    pub fn contains(self, tile: Tile) -> bool {
        tile <= MAX_TILE && self.0 & (1 << tile) != 0
    }

    /// Adds a tile; tiles outside `1..=MAX_TILE` are ignored.
    pub fn insert(&mut self, tile: Tile) {
        if (1..=MAX_TILE).contains(&tile) {
            self.0 |= 1 << tile;
        }
    }

    /// Number of tiles in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sum of tile values.
    pub fn sum(self) -> u32 {
        self.iter().map(u32::from).sum()
    }

    /// Largest tile, if any.
    pub fn max(self) -> Option<Tile> {
        if self.0 == 0 {
            None
        } else {
            Some((15 - self.0.leading_zeros()) as Tile)
        }
    }

    /// Whether every tile of `self` is in `other`.
    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Tiles in `self` but not in `other`.
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Tiles in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Tile> {
        (1..=MAX_TILE).filter(move |&t| self.contains(t))
    }

    /// Tiles in ascending order, collected.
    pub fn to_vec(self) -> Vec<Tile> {
        self.iter().collect()
    }
}

impl FromIterator<Tile> for TileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for tile in iter {
            set.insert(tile);
        }
        set
    }
}

impl std::fmt::Display for TileSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, tile) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tile)?;
        }
        write!(f, "}}")
    }
}
