//! Explicit state machine for one player's turn.
//!
//! A turn cycles through roll → offer → apply until the player is stuck,
//! shuts the box, or concedes:
//!
//! ```text
//! AwaitingRoll ──roll──▶ MovesOffered ──submit──▶ (move applied)
//!      ▲                     │                          │
//!      └──── continues ──────┼──────────────────────────┘
//!                            ▼ no legal move / concede  ▼ box shut
//!                          Ended ◀───────────────────────┘
//! ```
//!
//! The phase is a plain value so a renderer can poll it between steps.

use crate::board::Board;
use crate::contracts::{Claim, Contract, ShutContract};
use crate::dice::{Dice, DiceCount, DiceOptions, DicePolicy, DiceRoll};
use crate::error::{AiContractError, GameError, MoveError, TurnError};
use crate::moves::{Move, legal_moves};
use crate::strategy::Strategy;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Where a turn currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the player to throw.
    AwaitingRoll {
        /// Dice counts the player may pick from.
        options: DiceOptions,
    },
    /// Dice are down and at least one legal move exists.
    MovesOffered {
        /// The roll being answered.
        roll: DiceRoll,
        /// Every legal answer.
        legal: Vec<Move>,
    },
    /// The turn is over.
    Ended(TurnOutcome),
}

impl TurnPhase {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingRoll { .. } => "awaiting a roll",
            Self::MovesOffered { .. } => "offering moves",
            Self::Ended(_) => "ended",
        }
    }
}

/// Why a turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Every tile shut; scores zero.
    ShutOut,
    /// No subset of open tiles matched this roll.
    Stuck {
        /// The roll nothing matched.
        roll: DiceRoll,
    },
    /// The player stopped while moves were still on offer.
    Conceded,
}

impl std::fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShutOut => write!(f, "shut the box"),
            Self::Stuck { roll } => write!(f, "stuck on {}", roll.sum()),
            Self::Conceded => write!(f, "stopped"),
        }
    }
}

/// Result of applying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnTransition {
    /// Tiles were shut and the player rolls again.
    Continues,
    /// The move shut the box.
    Ended(TurnOutcome),
}

/// One roll of a turn and what was done with it.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TurnStep {
    /// The throw.
    roll: DiceRoll,
    /// The tiles shut in answer, if any.
    applied: Option<Move>,
}

/// Everything that happened in a finished turn.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Rolls in order.
    steps: Vec<TurnStep>,
    /// How the turn ended.
    outcome: TurnOutcome,
    /// Sum of tiles left open.
    score: u32,
}

/// Drives one player's turn against their board.
#[derive(Debug)]
pub struct TurnEngine<'b> {
    board: &'b mut Board,
    policy: DicePolicy,
    phase: TurnPhase,
    steps: Vec<TurnStep>,
    last_move: Option<Move>,
}

impl<'b> TurnEngine<'b> {
    /// Starts a turn. A board that is already shut starts out ended.
    #[instrument(skip(board), fields(open = %board.open_set()))]
    pub fn new(board: &'b mut Board, policy: DicePolicy) -> Self {
        let phase = if board.is_complete() {
            TurnPhase::Ended(TurnOutcome::ShutOut)
        } else {
            TurnPhase::AwaitingRoll {
                options: policy.options(board.open_set()),
            }
        };
        Self {
            board,
            policy,
            phase,
            steps: Vec::new(),
            last_move: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// The board being played.
    pub fn board(&self) -> &Board {
        &*self.board
    }

    /// Most recent roll, if any.
    pub fn last_roll(&self) -> Option<&DiceRoll> {
        self.steps.last().map(TurnStep::roll)
    }

    /// Most recently applied move, if any.
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Rolls so far.
    pub fn steps(&self) -> &[TurnStep] {
        &self.steps
    }

    /// Whether the turn is over.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, TurnPhase::Ended(_))
    }

    /// Dice counts allowed for the next roll.
    ///
    /// # Errors
    ///
    /// [`TurnError::WrongPhase`] unless the turn is awaiting a roll.
    pub fn dice_options(&self) -> Result<DiceOptions, TurnError> {
        match &self.phase {
            TurnPhase::AwaitingRoll { options } => Ok(*options),
            other => Err(TurnError::WrongPhase {
                action: "choose dice",
                phase: other.name(),
            }),
        }
    }

    /// Legal moves for the current roll; empty unless moves are on offer.
    pub fn legal_moves(&self) -> &[Move] {
        match &self.phase {
            TurnPhase::MovesOffered { legal, .. } => legal,
            _ => &[],
        }
    }

    /// Throws the dice and offers the legal moves.
    ///
    /// If nothing matches the roll the turn ends stuck.
    ///
    /// # Errors
    ///
    /// [`TurnError::WrongPhase`] outside `AwaitingRoll`, or
    /// [`TurnError::DiceNotAllowed`] when the dice rule forbids `count`.
    #[instrument(skip(self, dice), fields(open = %self.board.open_set()))]
    pub fn roll(&mut self, dice: &mut Dice, count: DiceCount) -> Result<&TurnPhase, TurnError> {
        let options = self.dice_options()?;
        if !options.allows(count) {
            warn!(count = count.get(), "Dice count not allowed");
            return Err(TurnError::DiceNotAllowed(count.get()));
        }
        let roll = dice.roll(count);
        Ok(self.offer(roll))
    }

    /// Answers an externally produced roll. Used by [`TurnEngine::roll`] and
    /// by tests that script the dice.
    ///
    /// # Errors
    ///
    /// [`TurnError::WrongPhase`] outside `AwaitingRoll`.
    pub fn accept_roll(&mut self, roll: DiceRoll) -> Result<&TurnPhase, TurnError> {
        self.dice_options()?;
        Ok(self.offer(roll))
    }

    fn offer(&mut self, roll: DiceRoll) -> &TurnPhase {
        let legal = legal_moves(self.board.open_set(), *roll.sum());
        self.steps.push(TurnStep {
            roll: roll.clone(),
            applied: None,
        });
        if legal.is_empty() {
            info!(roll = %roll, open = %self.board.open_set(), "No legal move, turn over");
            self.phase = TurnPhase::Ended(TurnOutcome::Stuck { roll });
        } else {
            debug!(roll = %roll, count = legal.len(), "Moves offered");
            self.phase = TurnPhase::MovesOffered { roll, legal };
        }
        &self.phase
    }

    /// Applies a move chosen by a person.
    ///
    /// # Errors
    ///
    /// [`GameError::Move`] when the move is not legal for this roll; the turn
    /// is unchanged and the caller should ask again. [`GameError::Turn`] if no
    /// moves are on offer.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn submit_human(&mut self, mv: Move) -> Result<TurnTransition, GameError> {
        let roll = self.offered_roll("submit a move")?;
        ShutContract::pre(self.board, &Claim { mv, roll })?;
        if !self.legal_moves().contains(&mv) {
            return Err(MoveError::NotOffered(mv.to_string()).into());
        }
        Ok(self.apply(mv)?)
    }

    /// Applies a move chosen by a strategy.
    ///
    /// # Errors
    ///
    /// [`GameError::AiContract`] when the strategy answered with anything but
    /// a member of the legal set. Nothing is corrected on its behalf.
    #[instrument(skip(self, mv))]
    pub fn submit_ai(&mut self, strategy: &str, mv: Option<Move>) -> Result<TurnTransition, GameError> {
        self.offered_roll("submit a move")?;
        let Some(mv) = mv else {
            return Err(AiContractError::new(strategy, "no move").into());
        };
        if !self.legal_moves().contains(&mv) {
            warn!(strategy, mv = %mv, "Strategy returned an illegal move");
            return Err(AiContractError::new(strategy, mv.to_string()).into());
        }
        Ok(self.apply(mv)?)
    }

    /// Asks `strategy` for a move on the current offer and applies it.
    ///
    /// # Errors
    ///
    /// See [`TurnEngine::submit_ai`].
    pub fn play_strategy(&mut self, strategy: &mut dyn Strategy) -> Result<TurnTransition, GameError> {
        let roll = self.offered_roll("consult a strategy")?;
        let mv = strategy.choose_move(self.board.open_set(), self.legal_moves(), roll);
        self.submit_ai(strategy.name(), mv)
    }

    /// Ends the turn by choice while moves are on offer.
    ///
    /// # Errors
    ///
    /// [`TurnError::WrongPhase`] unless moves are on offer.
    #[instrument(skip(self))]
    pub fn concede(&mut self) -> Result<TurnTransition, TurnError> {
        self.offered_roll("concede")?;
        info!(score = self.board.score(), "Player stopped");
        self.phase = TurnPhase::Ended(TurnOutcome::Conceded);
        Ok(TurnTransition::Ended(TurnOutcome::Conceded))
    }

    /// Closes a finished turn into its record.
    ///
    /// # Errors
    ///
    /// [`TurnError::WrongPhase`] while the turn is still running.
    pub fn finish(self) -> Result<TurnRecord, TurnError> {
        match self.phase {
            TurnPhase::Ended(outcome) => Ok(TurnRecord {
                steps: self.steps,
                outcome,
                score: self.board.score(),
            }),
            other => Err(TurnError::WrongPhase {
                action: "finish the turn",
                phase: other.name(),
            }),
        }
    }

    fn offered_roll(&self, action: &'static str) -> Result<u32, TurnError> {
        match &self.phase {
            TurnPhase::MovesOffered { roll, .. } => Ok(*roll.sum()),
            other => Err(TurnError::WrongPhase {
                action,
                phase: other.name(),
            }),
        }
    }

    fn apply(&mut self, mv: Move) -> Result<TurnTransition, TurnError> {
        #[cfg(debug_assertions)]
        let before = self.board.clone();

        if let Err(e) = self.board.shut(&mv) {
            // legal moves only name open tiles
            return Err(TurnError::InvariantViolation(e.to_string()));
        }

        #[cfg(debug_assertions)]
        ShutContract::post(&before, self.board)?;

        if let Some(step) = self.steps.last_mut() {
            step.applied = Some(mv);
        }
        self.last_move = Some(mv);

        if self.board.is_complete() {
            info!("Box shut");
            self.phase = TurnPhase::Ended(TurnOutcome::ShutOut);
            Ok(TurnTransition::Ended(TurnOutcome::ShutOut))
        } else {
            debug!(open = %self.board.open_set(), "Rolling again");
            self.phase = TurnPhase::AwaitingRoll {
                options: self.policy.options(self.board.open_set()),
            };
            Ok(TurnTransition::Continues)
        }
    }
}
