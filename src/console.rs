//! Plain text and JSON-lines rendering of match events, and stdin input.

use crate::events::MatchEvent;
use std::io::{BufRead, Write};
use strictly_shutbox::{DiceRule, Difficulty, SingleDieTrigger, Standing, StartOrder, TurnOutcome};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Rule summary printed by `shutbox rules`.
pub const RULES: &str = "\
Don't Shut the Box

1. Every player has a box of tiles numbered 1 to 9 (or 1 to 12).
2. Roll two dice. Shut any open tiles that add up to the roll exactly,
   for example 3 + 5 or 8 for a roll of 8.
3. Keep rolling until no open tiles add up to the roll.
4. Once the tiles above six are shut you may roll a single die.
5. Your round score is the sum of the tiles still open.
   Shutting every tile scores zero.
6. After the last round the lowest total wins.

Answer a roll with the tiles to shut (3 5 or 3,5), #N to pick an offered
option, or 0 to stop the turn early.";

/// Rule summary followed by the values each option accepts.
pub fn rules_text() -> String {
    fn list<T: IntoEnumIterator + std::fmt::Display>() -> String {
        T::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
    }
    format!(
        "{}\n\nOptions\n  --difficulty   {}\n  --dice         {}\n  --single-die   {}\n  --start-order  {}\n  --tiles        9, 12",
        RULES,
        list::<Difficulty>(),
        list::<DiceRule>(),
        list::<SingleDieTrigger>(),
        list::<StartOrder>(),
    )
}

/// How events are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Reads stdin lines on a background thread.
///
/// The channel closes when stdin does.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
        debug!("Stdin reader finished");
    });
    rx
}

/// Prints every event until the channel closes.
pub async fn print_events(mut rx: mpsc::UnboundedReceiver<MatchEvent>, format: OutputFormat) {
    while let Some(event) = rx.recv().await {
        let text = match format {
            OutputFormat::Text => render_text(&event),
            OutputFormat::Json => match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize event");
                    continue;
                }
            },
        };
        let mut out = std::io::stdout().lock();
        if writeln!(out, "{}", text).and_then(|_| out.flush()).is_err() {
            break;
        }
    }
}

/// Renders one event as text.
pub fn render_text(event: &MatchEvent) -> String {
    match event {
        MatchEvent::RoundStarted {
            round,
            rounds,
            order,
        } => format!(
            "\n=== ROUND {} of {} ===\nOrder: {}",
            round,
            rounds,
            order.join(", ")
        ),
        MatchEvent::StartRolls { rolls, starter } => {
            let rolled = rolls
                .iter()
                .map(|(name, roll)| format!("{} rolled {}", name, roll))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}. {} goes first.", rolled, starter)
        }
        MatchEvent::TurnStarted { player, board } => {
            format!("\n{}'s turn\n{}", player, board.display())
        }
        MatchEvent::DiceRolled {
            player,
            roll,
            legal,
        } => {
            if legal.is_empty() {
                format!("{} rolled {}. No tiles add up to it.", player, roll)
            } else {
                let options = legal
                    .iter()
                    .enumerate()
                    .map(|(i, mv)| format!("#{} {}", i + 1, mv))
                    .collect::<Vec<_>>()
                    .join("  ");
                format!("{} rolled {}\n  {}", player, roll, options)
            }
        }
        MatchEvent::MoveApplied {
            player, mv, board, ..
        } => {
            format!("{} shut {}\n{}", player, mv, board.display())
        }
        MatchEvent::InvalidMove { reason, .. } => format!("Rejected: {}", reason),
        MatchEvent::Prompt { text, .. } => format!("> {}", text),
        MatchEvent::TurnEnded {
            player,
            record,
            snapshot,
        } => {
            let line = match record.outcome() {
                TurnOutcome::ShutOut => format!("{} shut the box! Score 0", player),
                outcome => format!("{} {}. Score {}", player, outcome, record.score()),
            };
            let totals = snapshot
                .seats
                .iter()
                .map(|seat| format!("{} {}", seat.name, seat.total))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}\nTotals: {}", line, totals)
        }
        MatchEvent::RoundEnded { round, snapshot } => {
            let mut text = format!("\n=== Round {} Results ===", round);
            for seat in &snapshot.seats {
                text.push_str(&format!("\n{}: {}", seat.name, seat.total));
            }
            text
        }
        MatchEvent::MatchEnded { standings } => render_standings(standings),
    }
}

/// Final ranking with the winner line.
pub fn render_standings(standings: &[Standing]) -> String {
    let mut text = String::from("\n=== GAME OVER ===");
    for standing in standings {
        text.push_str(&format!("\n{}", standing));
    }
    let winners: Vec<&str> = standings
        .iter()
        .filter(|s| *s.place() == 1)
        .map(|s| s.name().as_str())
        .collect();
    match winners.as_slice() {
        [] => {}
        [winner] => text.push_str(&format!("\n\n{} wins!", winner)),
        tied => text.push_str(&format!("\n\nTie for first: {}", tied.join(", "))),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MatchSnapshot, SeatSnapshot};
    use strictly_shutbox::{Board, DiceRoll, Move, PlayerKind, TileRange};

    fn snapshot(totals: &[(&str, u32)]) -> MatchSnapshot {
        MatchSnapshot {
            round: 1,
            rounds: 3,
            current: None,
            seats: totals
                .iter()
                .map(|&(name, total)| SeatSnapshot {
                    name: name.to_string(),
                    kind: PlayerKind::Human,
                    open: Vec::new(),
                    total,
                })
                .collect(),
        }
    }

    #[test]
    fn test_stuck_roll_text() {
        let event = MatchEvent::DiceRolled {
            player: "Ada".to_string(),
            roll: DiceRoll::from_values(vec![6, 5]),
            legal: Vec::new(),
        };
        assert_eq!(render_text(&event), "Ada rolled 6 + 5 = 11. No tiles add up to it.");
    }

    #[test]
    fn test_options_are_numbered() {
        let event = MatchEvent::DiceRolled {
            player: "Ada".to_string(),
            roll: DiceRoll::from_values(vec![1, 2]),
            legal: vec![Move::new([3]).unwrap(), Move::new([1, 2]).unwrap()],
        };
        let text = render_text(&event);
        assert!(text.contains("#1 {3}"));
        assert!(text.contains("#2 {1, 2}"));
    }

    #[test]
    fn test_move_applied_shows_board() {
        let mut board = Board::new(TileRange::Nine);
        let mv = Move::new([4, 5]).unwrap();
        board.shut(&mv).unwrap();
        let text = render_text(&MatchEvent::MoveApplied {
            player: "Bot".to_string(),
            mv,
            board,
            snapshot: snapshot(&[("Bot", 0)]),
        });
        assert!(text.starts_with("Bot shut {4, 5}"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_turn_end_shows_running_totals() {
        let mut board = Board::new(TileRange::Nine);
        let mut turn = strictly_shutbox::TurnEngine::new(&mut board, Default::default());
        turn.accept_roll(DiceRoll::from_values(vec![6, 6])).unwrap();
        turn.concede().unwrap();
        let record = turn.finish().unwrap();
        let text = render_text(&MatchEvent::TurnEnded {
            player: "Ada".to_string(),
            record,
            snapshot: snapshot(&[("Ada", 45), ("Bot", 12)]),
        });
        assert!(text.ends_with("Totals: Ada 45, Bot 12"));
    }

    #[test]
    fn test_tied_winners() {
        let standings = vec![
            Standing::new(1, 0, "A".to_string(), 7),
            Standing::new(1, 1, "B".to_string(), 7),
            Standing::new(3, 2, "C".to_string(), 20),
        ];
        let text = render_standings(&standings);
        assert!(text.ends_with("Tie for first: A, B"));
    }

    #[test]
    fn test_rules_list_option_values() {
        let text = rules_text();
        assert!(text.contains("easy, medium, classic, hard"));
        assert!(text.contains("seated, high_roll"));
    }

    #[test]
    fn test_json_event_is_tagged() {
        let event = MatchEvent::InvalidMove {
            player: "Ada".to_string(),
            reason: "nope".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "invalid_move");
        assert_eq!(json["player"], "Ada");
    }
}
