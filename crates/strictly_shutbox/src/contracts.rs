//! Contract-based validation for shutting tiles.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} shut {Q}. The turn engine checks preconditions on every move and
//! postconditions in debug builds.

use crate::board::Board;
use crate::error::{MoveError, TurnError};
use crate::moves::Move;
use tracing::{instrument, warn};

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), TurnError>;
}

/// A request to shut tiles against the current roll.
#[derive(Debug, Clone, Copy)]
pub struct Claim {
    /// Tiles to shut.
    pub mv: Move,
    /// Current roll total.
    pub roll: u32,
}

/// Precondition: every tile is on the board and still open.
pub struct TilesOpen;

impl TilesOpen {
    /// Checks the tiles of the claim against the board.
    #[instrument(skip_all)]
    pub fn check(claim: &Claim, board: &Board) -> Result<(), MoveError> {
        for tile in claim.mv.tiles().iter() {
            if !board.tiles().contains(tile) {
                return Err(MoveError::UnknownTile(tile));
            }
            if !board.is_open(tile) {
                return Err(MoveError::TileShut(tile));
            }
        }
        Ok(())
    }
}

/// Precondition: the tiles add up to the roll exactly.
pub struct ExactSum;

impl ExactSum {
    /// Checks the claim's sum.
    #[instrument(skip_all)]
    pub fn check(claim: &Claim) -> Result<(), MoveError> {
        let sum = claim.mv.sum();
        if sum == claim.roll {
            Ok(())
        } else {
            Err(MoveError::WrongSum {
                sum,
                roll: claim.roll,
            })
        }
    }
}

/// Contract for shutting tiles.
///
/// Preconditions:
/// - Tiles are on the board and open
/// - Tiles sum to the roll
///
/// Postconditions:
/// - The board keeps the same tiles
/// - Open tiles only ever shrink, and strictly
pub struct ShutContract;

impl Contract<Board, Claim> for ShutContract {
    fn pre(board: &Board, claim: &Claim) -> Result<(), MoveError> {
        TilesOpen::check(claim, board)?;
        ExactSum::check(claim)
    }

    fn post(before: &Board, after: &Board) -> Result<(), TurnError> {
        if before.range() != after.range() {
            warn!("Board size changed during a move");
            return Err(TurnError::InvariantViolation(
                "board size changed".to_string(),
            ));
        }
        let shrank = after.open_set().is_subset(before.open_set())
            && after.open_set().len() < before.open_set().len();
        if !shrank {
            warn!(before = %before.open_set(), after = %after.open_set(), "Shutting was not monotonic");
            return Err(TurnError::InvariantViolation(format!(
                "open tiles went from {} to {}",
                before.open_set(),
                after.open_set()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileRange;

    fn claim(tiles: &[u8], roll: u32) -> Claim {
        Claim {
            mv: Move::new(tiles.iter().copied()).unwrap(),
            roll,
        }
    }

    #[test]
    fn test_precondition_accepts_exact_open_tiles() {
        let board = Board::new(TileRange::Nine);
        assert!(ShutContract::pre(&board, &claim(&[3, 6], 9)).is_ok());
    }

    #[test]
    fn test_precondition_rejects_partial_sum() {
        let board = Board::new(TileRange::Nine);
        assert_eq!(
            ShutContract::pre(&board, &claim(&[3, 5], 9)),
            Err(MoveError::WrongSum { sum: 8, roll: 9 })
        );
    }

    #[test]
    fn test_precondition_rejects_shut_tile() {
        let mut board = Board::new(TileRange::Nine);
        board.shut(&Move::new([6]).unwrap()).unwrap();
        assert_eq!(
            ShutContract::pre(&board, &claim(&[3, 6], 9)),
            Err(MoveError::TileShut(6))
        );
    }

    #[test]
    fn test_precondition_rejects_tile_off_board() {
        let board = Board::new(TileRange::Nine);
        assert_eq!(
            ShutContract::pre(&board, &claim(&[10], 10)),
            Err(MoveError::UnknownTile(10))
        );
    }

    #[test]
    fn test_postcondition_holds_after_shut() {
        let before = Board::new(TileRange::Nine);
        let mut after = before.clone();
        after.shut(&Move::new([4, 5]).unwrap()).unwrap();
        assert!(ShutContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_reopened_tile() {
        let mut before = Board::new(TileRange::Nine);
        before.shut(&Move::new([9]).unwrap()).unwrap();
        let after = Board::new(TileRange::Nine);
        assert!(ShutContract::post(&before, &after).is_err());
    }

    #[test]
    fn test_postcondition_detects_no_change() {
        let board = Board::new(TileRange::Nine);
        assert!(ShutContract::post(&board, &board.clone()).is_err());
    }
}
