//! Match orchestration between players.

use crate::events::{EventSink, MatchEvent, MatchSnapshot, SeatSnapshot};
use crate::players::{Choice, Player};
use strictly_shutbox::{
    AiContractError, Board, ConfigError, Dice, DiceCount, GameError, MatchConfig, MatchState,
    PlayerKind, Standing, StartOrder, Tile, TurnEngine, TurnOutcome, TurnPhase, TurnRecord,
    TurnTransition, high_roll_winner, round_order,
};
use tracing::{debug, info, instrument, warn};

/// Runs a match: rounds of turns for every seat, then the ranking.
pub struct GameController {
    config: MatchConfig,
    players: Vec<Box<dyn Player>>,
    boards: Vec<Board>,
    state: MatchState,
    dice: Dice,
    events: EventSink,
}

impl GameController {
    /// Creates a controller for a validated config and one player per seat.
    ///
    /// # Errors
    ///
    /// [`GameError::Config`] when the config is invalid or the players do
    /// not match the seats.
    #[instrument(skip_all, fields(seats = config.seats().len()))]
    pub fn new(config: MatchConfig, players: Vec<Box<dyn Player>>) -> Result<Self, GameError> {
        config.validate()?;
        if players.len() != config.seats().len() {
            return Err(ConfigError::new(format!(
                "{} players for {} seats",
                players.len(),
                config.seats().len()
            ))
            .into());
        }
        for (player, seat) in players.iter().zip(config.seats()) {
            if player.name() != seat.name() {
                return Err(ConfigError::new(format!(
                    "Player '{}' sits in seat '{}'",
                    player.name(),
                    seat.name()
                ))
                .into());
            }
            if player.kind() != *seat.kind() {
                return Err(ConfigError::new(format!(
                    "Seat '{}' is {} but its player is {}",
                    seat.name(),
                    seat.kind(),
                    player.kind()
                ))
                .into());
            }
        }

        let dice = match config.seed() {
            Some(seed) => Dice::seeded(*config.faces(), *seed),
            None => Dice::new(*config.faces()),
        };
        let boards = vec![Board::new(*config.tiles()); players.len()];
        let state = MatchState::new(config.seats().clone(), *config.rounds());
        info!(rounds = config.rounds(), tiles = %config.tiles(), "Match created");

        Ok(Self {
            config,
            players,
            boards,
            state,
            dice,
            events: EventSink::disabled(),
        })
    }

    /// Publishes events to `events` from now on.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Match progress so far.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Read-only view of every seat.
    pub fn snapshot(&self) -> MatchSnapshot {
        build_snapshot(&self.config, &self.state, |seat| self.boards[seat].open_tiles())
    }

    /// Plays every round and returns the final ranking.
    ///
    /// # Errors
    ///
    /// [`GameError::AiContract`] when a strategy breaks its contract, and
    /// [`GameError::Aborted`] when a player fails, for example because
    /// input closed.
    #[instrument(skip(self))]
    pub async fn play_match(&mut self) -> Result<Vec<Standing>, GameError> {
        info!("Starting match");
        while !self.state.is_finished() {
            self.play_round().await?;
        }
        let standings = self.state.standings();
        self.events.send(MatchEvent::MatchEnded {
            standings: standings.clone(),
        });
        info!("Match finished");
        Ok(standings)
    }

    async fn play_round(&mut self) -> Result<(), GameError> {
        let round = self.state.begin_round();
        for board in &mut self.boards {
            board.reset();
        }

        let first = self.first_seat();
        let order = round_order(first, self.players.len());
        self.events.send(MatchEvent::RoundStarted {
            round,
            rounds: *self.state.rounds(),
            order: order
                .iter()
                .map(|&seat| self.players[seat].name().to_string())
                .collect(),
        });

        for seat in order {
            self.state.set_current(Some(seat));
            self.play_turn(seat).await?;
        }
        self.state.set_current(None);

        self.events.send(MatchEvent::RoundEnded {
            round,
            snapshot: self.snapshot(),
        });
        Ok(())
    }

    fn first_seat(&mut self) -> usize {
        match self.config.start_order() {
            StartOrder::Seated => 0,
            StartOrder::HighRoll => {
                let rolls: Vec<u32> = (0..self.players.len())
                    .map(|_| *self.dice.roll(DiceCount::Two).sum())
                    .collect();
                let first = high_roll_winner(&rolls);
                debug!(?rolls, first, "Start rolls");
                self.events.send(MatchEvent::StartRolls {
                    rolls: self
                        .players
                        .iter()
                        .zip(&rolls)
                        .map(|(p, &r)| (p.name().to_string(), r))
                        .collect(),
                    starter: self.players[first].name().to_string(),
                });
                first
            }
        }
    }

    #[instrument(skip(self), fields(player = %self.players[seat].name()))]
    async fn play_turn(&mut self, seat: usize) -> Result<TurnRecord, GameError> {
        let policy = self.config.dice_policy();
        let Self {
            config,
            players,
            boards,
            state,
            dice,
            events,
        } = self;
        let player = &mut players[seat];
        let name = player.name().to_string();
        // other seats cannot change during this turn
        let resting: Vec<Vec<Tile>> = boards.iter().map(Board::open_tiles).collect();

        events.send(MatchEvent::TurnStarted {
            player: name.clone(),
            board: boards[seat].clone(),
        });
        let mut turn = TurnEngine::new(&mut boards[seat], policy);

        while !turn.is_ended() {
            let options = turn.dice_options()?;
            let count = if options.is_choice() {
                player
                    .choose_dice(turn.board().open_set(), options)
                    .await
                    .map_err(|e| aborted(&name, e))?
            } else {
                options.counts()[0]
            };
            turn.roll(dice, count)?;

            let (roll, legal) = match turn.phase() {
                TurnPhase::MovesOffered { roll, legal } => (roll.clone(), legal.clone()),
                TurnPhase::Ended(_) => {
                    if let Some(roll) = turn.last_roll() {
                        events.send(MatchEvent::DiceRolled {
                            player: name.clone(),
                            roll: roll.clone(),
                            legal: Vec::new(),
                        });
                    }
                    break;
                }
                TurnPhase::AwaitingRoll { .. } => continue,
            };
            events.send(MatchEvent::DiceRolled {
                player: name.clone(),
                roll: roll.clone(),
                legal: legal.clone(),
            });

            let transition = loop {
                let choice = player
                    .choose_move(turn.board().open_set(), &roll, &legal)
                    .await
                    .map_err(|e| aborted(&name, e))?;
                let result = match (player.kind(), choice) {
                    (PlayerKind::Human, Choice::Shut(mv)) => turn.submit_human(mv),
                    (PlayerKind::Human, Choice::Concede) => Ok(turn.concede()?),
                    (PlayerKind::Human, Choice::Undecided) => {
                        return Err(GameError::Aborted(format!("{} gave no answer", name)));
                    }
                    (PlayerKind::Ai { .. }, Choice::Shut(mv)) => turn.submit_ai(&name, Some(mv)),
                    (PlayerKind::Ai { .. }, Choice::Undecided) => turn.submit_ai(&name, None),
                    (PlayerKind::Ai { .. }, Choice::Concede) => {
                        return Err(AiContractError::new(name.as_str(), "concede").into());
                    }
                };
                match result {
                    Ok(transition) => break transition,
                    Err(GameError::Move(e)) => {
                        warn!(player = %name, error = %e, "Move rejected");
                        events.send(MatchEvent::InvalidMove {
                            player: name.clone(),
                            reason: e.to_string(),
                        });
                        player.rejected(&e);
                    }
                    Err(e) => return Err(e),
                }
            };

            let conceded = transition == TurnTransition::Ended(TurnOutcome::Conceded);
            if let Some(mv) = turn.last_move().copied()
                && !conceded
            {
                let snapshot = build_snapshot(config, state, |other| {
                    if other == seat {
                        turn.board().open_tiles()
                    } else {
                        resting[other].clone()
                    }
                });
                events.send(MatchEvent::MoveApplied {
                    player: name.clone(),
                    mv,
                    board: turn.board().clone(),
                    snapshot,
                });
            }
        }

        let record = turn.finish()?;
        state.record_score(seat, *record.score());
        info!(player = %name, outcome = %record.outcome(), score = record.score(), "Turn over");
        events.send(MatchEvent::TurnEnded {
            player: name,
            record: record.clone(),
            snapshot: build_snapshot(config, state, |other| boards[other].open_tiles()),
        });
        Ok(record)
    }
}

/// Snapshot of every seat, reading open tiles through `open`.
fn build_snapshot(
    config: &MatchConfig,
    state: &MatchState,
    open: impl Fn(usize) -> Vec<Tile>,
) -> MatchSnapshot {
    let seats = config
        .seats()
        .iter()
        .zip(state.totals())
        .enumerate()
        .map(|(index, (seat, total))| SeatSnapshot {
            name: seat.name().clone(),
            kind: *seat.kind(),
            open: open(index),
            total,
        })
        .collect();
    MatchSnapshot {
        round: *state.round(),
        rounds: *state.rounds(),
        current: state
            .current()
            .as_ref()
            .map(|&seat| config.seats()[seat].name().clone()),
        seats,
    }
}

fn aborted(player: &str, error: anyhow::Error) -> GameError {
    warn!(player, error = %error, "Player failed");
    GameError::Aborted(format!("{}: {}", player, error))
}
