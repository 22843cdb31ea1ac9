//! Scores across rounds and the final ranking.

use crate::config::Seat;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One seat's place in the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct Standing {
    /// 1-based place; tied totals share a place.
    place: usize,
    /// Index of the seat in configuration order.
    seat: usize,
    /// Seat name.
    name: String,
    /// Cumulative score. Lower is better.
    total: u32,
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {} ({})", self.place, self.name, self.total)
    }
}

/// Match progress: which round, whose turn, and every round score so far.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchState {
    /// Seats in configuration order.
    seats: Vec<Seat>,
    /// Rounds to play.
    rounds: u32,
    /// Current round, 1-based; 0 before the first round.
    round: u32,
    /// Seat whose turn it is.
    current: Option<usize>,
    /// Per seat, the score of each finished round.
    history: Vec<Vec<u32>>,
}

impl MatchState {
    /// Fresh state before the first round.
    #[instrument(skip(seats), fields(seats = seats.len()))]
    pub fn new(seats: Vec<Seat>, rounds: u32) -> Self {
        let history = vec![Vec::new(); seats.len()];
        Self {
            seats,
            rounds,
            round: 0,
            current: None,
            history,
        }
    }

    /// Advances to the next round and returns its number.
    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.current = None;
        debug!(round = self.round, "Round started");
        self.round
    }

    /// Marks whose turn it is.
    pub fn set_current(&mut self, seat: Option<usize>) {
        self.current = seat;
    }

    /// Adds a round score for `seat`. Unknown seats are ignored.
    #[instrument(skip(self))]
    pub fn record_score(&mut self, seat: usize, score: u32) {
        if let Some(scores) = self.history.get_mut(seat) {
            scores.push(score);
        }
    }

    /// Whether every round has been played by every seat.
    pub fn is_finished(&self) -> bool {
        self.round >= self.rounds
            && self
                .history
                .iter()
                .all(|scores| scores.len() as u32 >= self.rounds)
    }

    /// Cumulative score per seat.
    pub fn totals(&self) -> Vec<u32> {
        self.history.iter().map(|scores| scores.iter().sum()).collect()
    }

    /// Seats ranked by ascending total.
    ///
    /// Equal totals share a place and the next place is skipped (1, 1, 3).
    /// Tied seats are listed in seat order; that order is not a tiebreak.
    #[instrument(skip(self))]
    pub fn standings(&self) -> Vec<Standing> {
        let totals = self.totals();
        let mut order: Vec<usize> = (0..self.seats.len()).collect();
        // stable sort keeps seat order within a tie
        order.sort_by_key(|&seat| totals[seat]);

        let mut standings: Vec<Standing> = Vec::with_capacity(order.len());
        for (index, &seat) in order.iter().enumerate() {
            let total = totals[seat];
            let place = match standings.last() {
                Some(prev) if prev.total == total => prev.place,
                _ => index + 1,
            };
            standings.push(Standing::new(
                place,
                seat,
                self.seats[seat].name().clone(),
                total,
            ));
        }
        if let Some(leader) = standings.first() {
            info!(leader = %leader.name, total = leader.total, "Standings computed");
        }
        standings
    }
}

/// Seat indices for one round, starting at `first` and going clockwise.
pub fn round_order(first: usize, seats: usize) -> Vec<usize> {
    (0..seats).map(|offset| (first + offset) % seats).collect()
}

/// Index of the highest roll; ties go to the earliest seat.
pub fn high_roll_winner(rolls: &[u32]) -> usize {
    let mut best = 0;
    for (seat, &roll) in rolls.iter().enumerate() {
        if roll > rolls[best] {
            best = seat;
        }
    }
    best
}
