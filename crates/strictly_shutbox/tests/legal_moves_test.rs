//! Legal move enumeration checked against brute force.

use std::collections::{HashMap, HashSet};
use strictly_shutbox::{Move, TileSet, has_legal_move, legal_moves, reachable_sums};

/// Every non-empty subset of `open`, grouped by sum, by walking all submasks.
fn brute_force(open: TileSet) -> HashMap<u32, HashSet<TileSet>> {
    let mut by_sum: HashMap<u32, HashSet<TileSet>> = HashMap::new();
    let full = open.bits();
    let mut sub = full;
    while sub != 0 {
        let subset = TileSet::from_bits(sub);
        by_sum.entry(subset.sum()).or_default().insert(subset);
        sub = (sub - 1) & full;
    }
    by_sum
}

#[test]
fn test_matches_brute_force_for_every_open_set() {
    // every subset of 1..=12 as the open set, every target up to one past its sum
    for bits in 0u16..(1 << 12) {
        let open = TileSet::from_bits(bits << 1);
        let reference = brute_force(open);
        for target in 1..=open.sum() + 1 {
            let moves = legal_moves(open, target);
            let got: HashSet<TileSet> = moves.iter().map(Move::tiles).collect();
            let expected = reference.get(&target).cloned().unwrap_or_default();
            assert_eq!(got.len(), moves.len(), "duplicate move for {} / {}", open, target);
            assert_eq!(got, expected, "open {} target {}", open, target);
            assert_eq!(has_legal_move(open, target), !moves.is_empty());
        }
    }
}

#[test]
fn test_empty_when_target_exceeds_open_sum() {
    let open: TileSet = [2, 3, 9].into_iter().collect();
    assert!(legal_moves(open, 15).is_empty());
    assert!(legal_moves(open, 40).is_empty());
    assert!(legal_moves(TileSet::EMPTY, 4).is_empty());
}

#[test]
fn test_zero_target_has_no_moves() {
    assert!(legal_moves(TileSet::range(9), 0).is_empty());
    assert!(!has_legal_move(TileSet::range(9), 0));
}

#[test]
fn test_output_order_is_deterministic() {
    let open = TileSet::range(12);
    let first = legal_moves(open, 12);
    let second = legal_moves(open, 12);
    assert_eq!(first, second);
    for pair in first.windows(2) {
        assert!((pair[0].len(), pair[0].to_vec()) < (pair[1].len(), pair[1].to_vec()));
    }
}

#[test]
fn test_reachable_sums_of_full_box() {
    let sums = reachable_sums(TileSet::range(9));
    for s in 1..=45 {
        assert!(sums & (1u128 << s) != 0, "sum {} should be reachable", s);
    }
    assert_eq!(sums >> 46, 0);
}
