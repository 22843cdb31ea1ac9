//! Match events published to renderers.

use serde::Serialize;
use strictly_shutbox::{Board, DiceRoll, Move, PlayerKind, Standing, Tile, TurnRecord};
use tokio::sync::mpsc;
use tracing::debug;

/// Read-only view of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatSnapshot {
    /// Seat name.
    pub name: String,
    /// Human or computer.
    pub kind: PlayerKind,
    /// Open tiles on the seat's board.
    pub open: Vec<Tile>,
    /// Total over finished turns.
    pub total: u32,
}

/// Read-only view of the whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    /// Current round, 0 before the first.
    pub round: u32,
    /// Rounds in the match.
    pub rounds: u32,
    /// Name of the seat whose turn it is.
    pub current: Option<String>,
    /// Every seat in configuration order.
    pub seats: Vec<SeatSnapshot>,
}

/// Something that happened during a match.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A round began; `order` is the play order.
    RoundStarted {
        /// Round number, 1-based.
        round: u32,
        /// Rounds in the match.
        rounds: u32,
        /// Seat names in play order.
        order: Vec<String>,
    },
    /// Seats rolled to decide who starts.
    StartRolls {
        /// Name and two-dice total for every seat.
        rolls: Vec<(String, u32)>,
        /// Who starts.
        starter: String,
    },
    /// A seat's turn began.
    TurnStarted {
        /// Seat name.
        player: String,
        /// Board at turn start.
        board: Board,
    },
    /// Dice were thrown.
    DiceRolled {
        /// Seat name.
        player: String,
        /// The throw.
        roll: DiceRoll,
        /// Legal answers, empty when stuck.
        legal: Vec<Move>,
    },
    /// Tiles were shut.
    MoveApplied {
        /// Seat name.
        player: String,
        /// The tiles shut.
        #[serde(rename = "move")]
        mv: Move,
        /// Board afterwards.
        board: Board,
        /// Every seat's board and total after the move.
        snapshot: MatchSnapshot,
    },
    /// A human answer was rejected; they are asked again.
    InvalidMove {
        /// Seat name.
        player: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A human player is being asked for input.
    Prompt {
        /// Seat name.
        player: String,
        /// Question text.
        text: String,
    },
    /// A seat's turn ended.
    TurnEnded {
        /// Seat name.
        player: String,
        /// What happened in the turn.
        record: TurnRecord,
        /// Every seat's board and total with this turn counted.
        snapshot: MatchSnapshot,
    },
    /// Every seat has played the round.
    RoundEnded {
        /// Round number.
        round: u32,
        /// Match state after the round.
        snapshot: MatchSnapshot,
    },
    /// The match finished.
    MatchEnded {
        /// Final ranking.
        standings: Vec<Standing>,
    },
}

/// Sending half of the event stream. Without a receiver events are dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<MatchEvent>>,
}

impl EventSink {
    /// Sink feeding `tx`.
    pub fn new(tx: mpsc::UnboundedSender<MatchEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sink that discards every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Creates a sink and the matching receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Publishes an event. A closed receiver is not an error.
    pub fn send(&self, event: MatchEvent) {
        if let Some(tx) = &self.tx
            && tx.send(event).is_err()
        {
            debug!("Event receiver closed");
        }
    }
}
