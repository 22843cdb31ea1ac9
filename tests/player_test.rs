//! Human input handling and strategy contract enforcement in the controller.

use anyhow::Result;
use shutbox::{AiPlayer, Choice, EventSink, GameController, HumanPlayer, MatchEvent, Player, players};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strictly_shutbox::{
    DiceCount, DiceOptions, DiceRoll, DiceRule, Difficulty, GameError, MatchConfig, Move,
    MoveError, PlayerKind, Seat, TileSet,
};
use tokio::sync::mpsc;

/// Answers every roll wrongly once, then with the first legal move.
struct Stubborn {
    name: String,
    rejections: Arc<AtomicUsize>,
    retrying: bool,
}

#[async_trait::async_trait]
impl Player for Stubborn {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Human
    }

    async fn choose_dice(&mut self, _open: TileSet, _options: DiceOptions) -> Result<DiceCount> {
        Ok(DiceCount::Two)
    }

    async fn choose_move(&mut self, open: TileSet, _roll: &DiceRoll, legal: &[Move]) -> Result<Choice> {
        let wrong = Move::from_set(open)?;
        if self.retrying || legal.contains(&wrong) {
            self.retrying = false;
            return Ok(Choice::Shut(legal[0]));
        }
        self.retrying = true;
        Ok(Choice::Shut(wrong))
    }

    fn rejected(&mut self, _error: &MoveError) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }
}

/// A computer player that ignores the legal set.
struct Cheater {
    answer: Choice,
}

#[async_trait::async_trait]
impl Player for Cheater {
    fn name(&self) -> &str {
        "Cheater"
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Ai {
            difficulty: Difficulty::Easy,
        }
    }

    async fn choose_dice(&mut self, _open: TileSet, _options: DiceOptions) -> Result<DiceCount> {
        Ok(DiceCount::Two)
    }

    async fn choose_move(&mut self, _open: TileSet, _roll: &DiceRoll, _legal: &[Move]) -> Result<Choice> {
        Ok(self.answer)
    }
}

fn two_dice(seats: Vec<Seat>) -> MatchConfig {
    MatchConfig::new(seats)
        .with_rounds(1)
        .with_dice_rule(DiceRule::Two)
        .with_seed(Some(21))
}

#[tokio::test]
async fn test_rejected_move_reprompts_without_changing_board() {
    let config = two_dice(vec![Seat::human("Ada")]);
    let (events, mut rx) = EventSink::channel();
    let rejections = Arc::new(AtomicUsize::new(0));
    let stubborn: Box<dyn Player> = Box::new(Stubborn {
        name: "Ada".to_string(),
        rejections: Arc::clone(&rejections),
        retrying: false,
    });
    let mut controller = GameController::new(config, vec![stubborn])
        .unwrap()
        .with_events(events);
    controller.play_match().await.unwrap();
    drop(controller);

    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        seen.push(event);
    }

    let invalid = seen
        .iter()
        .filter(|e| matches!(e, MatchEvent::InvalidMove { .. }))
        .count();
    assert!(invalid > 0);
    assert_eq!(rejections.load(Ordering::SeqCst), invalid);

    // the board shown after a rejection differs from the last one only by
    // the accepted move
    let mut last_board = None;
    for event in &seen {
        match event {
            MatchEvent::TurnStarted { board, .. } => last_board = Some(board.clone()),
            MatchEvent::MoveApplied { mv, board, .. } => {
                let before = last_board.take().unwrap();
                assert_eq!(before.open_set().difference(mv.tiles()), board.open_set());
                last_board = Some(board.clone());
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_human_plays_through_input_lines() {
    let config = two_dice(vec![Seat::human("Ada"), Seat::ai("Bot", Difficulty::Medium)]);
    let (tx, rx) = mpsc::unbounded_channel();
    // more answers than a turn can use; "#1" always picks an offered move
    for _ in 0..12 {
        tx.send("#1".to_string()).unwrap();
    }
    drop(tx);

    let events = EventSink::disabled();
    let seats = players::from_config(&config, Some(rx), &events, Duration::ZERO).unwrap();
    let mut controller = GameController::new(config, seats).unwrap();
    let standings = controller.play_match().await.unwrap();
    assert_eq!(standings.len(), 2);
}

#[tokio::test]
async fn test_human_can_stop_early() {
    let config = two_dice(vec![Seat::human("Ada")]);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send("stop".to_string()).unwrap();
    drop(tx);

    let seats = players::from_config(&config, Some(rx), &EventSink::disabled(), Duration::ZERO)
        .unwrap();
    let mut controller = GameController::new(config, seats).unwrap();
    let standings = controller.play_match().await.unwrap();
    assert_eq!(*standings[0].total(), 45);
}

#[tokio::test]
async fn test_closed_input_aborts_match() {
    let config = two_dice(vec![Seat::human("Ada")]);
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    drop(tx);
    let human: Box<dyn Player> = Box::new(HumanPlayer::new("Ada", rx, EventSink::disabled()));
    let mut controller = GameController::new(config, vec![human]).unwrap();
    let err = controller.play_match().await.unwrap_err();
    assert!(matches!(err, GameError::Aborted(_)));
}

#[tokio::test]
async fn test_illegal_ai_move_aborts_match() {
    for answer in [
        Choice::Shut(Move::new([1]).unwrap()),
        Choice::Undecided,
        Choice::Concede,
    ] {
        let config = two_dice(vec![Seat::ai("Cheater", Difficulty::Easy)]);
        let cheater: Box<dyn Player> = Box::new(Cheater { answer });
        let mut controller = GameController::new(config, vec![cheater]).unwrap();
        let err = controller.play_match().await.unwrap_err();
        assert!(matches!(err, GameError::AiContract(_)), "{:?}", answer);
        assert!(controller.state().standings().iter().all(|s| *s.total() == 0));
    }
}

#[test]
fn test_player_kind_must_match_seat() {
    let config = two_dice(vec![Seat::human("Ada")]);
    let strategy = Difficulty::Easy.build(config.dice_policy(), 1);
    let imposter: Box<dyn Player> = Box::new(AiPlayer::new("Ada", Difficulty::Easy, strategy));
    let result = GameController::new(config, vec![imposter]);
    assert!(matches!(result, Err(GameError::Config(_))));

    let config = two_dice(vec![Seat::ai("Cheater", Difficulty::Hard)]);
    let cheater: Box<dyn Player> = Box::new(Cheater {
        answer: Choice::Undecided,
    });
    let result = GameController::new(config, vec![cheater]);
    assert!(matches!(result, Err(GameError::Config(_))));
}
