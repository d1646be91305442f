//! One interactive game between a player and a learner.

use serde::{Deserialize, Serialize};

use super::rules::GameKind;
use crate::{
    Result,
    error::InvalidArgument,
    experiment::WINNING_SCORE,
    ports::Learner,
    types::{Action, Side},
};

/// What happened in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number (0-based)
    pub round: usize,
    pub user_action: Action,
    pub prediction: Action,
    /// `None` on a tie
    pub winner: Option<Side>,
    pub user_score: u32,
    pub learner_score: u32,
}

/// Game state owned by the caller: rules, learner and running scores.
///
/// The front end feeds one user action per event and renders the returned
/// [`RoundResult`]; the session decides when the game is over.
pub struct Session {
    kind: GameKind,
    learner: Box<dyn Learner>,
    target: u32,
    user_score: u32,
    learner_score: u32,
    rounds: Vec<RoundResult>,
}

impl Session {
    /// Start a game of `kind` against `learner`, first to [`WINNING_SCORE`].
    ///
    /// # Errors
    ///
    /// Fails if the learner was built for a different number of actions.
    pub fn new(kind: GameKind, learner: Box<dyn Learner>) -> Result<Self> {
        if learner.action_count() != kind.actions() {
            return Err(InvalidArgument::ActionCount {
                actions: learner.action_count(),
            }
            .into());
        }
        Ok(Self {
            kind,
            learner,
            target: WINNING_SCORE,
            user_score: 0,
            learner_score: 0,
            rounds: Vec::new(),
        })
    }

    /// Play to a score other than [`WINNING_SCORE`].
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument::TargetScore`] if `target == 0`.
    pub fn with_target_score(mut self, target: u32) -> Result<Self> {
        if target == 0 {
            return Err(InvalidArgument::TargetScore.into());
        }
        self.target = target;
        Ok(self)
    }

    /// Play one round: the learner commits to a prediction, then sees the
    /// user's action.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument::GameOver`] once a side has reached the
    /// target, or with [`InvalidArgument::ActionOutOfRange`] for an invalid
    /// action. Neither changes the session.
    pub fn play(&mut self, user_action: Action) -> Result<RoundResult> {
        if self.is_over() {
            return Err(InvalidArgument::GameOver.into());
        }
        if user_action >= self.kind.actions() {
            return Err(InvalidArgument::ActionOutOfRange {
                action: user_action,
                actions: self.kind.actions(),
            }
            .into());
        }

        let prediction = self.learner.predict();
        self.learner
            .observe_action(self.kind.learner_target(user_action))?;

        let winner = self.kind.judge(prediction, user_action);
        match winner {
            Some(Side::User) => self.user_score += 1,
            Some(Side::Learner) => self.learner_score += 1,
            None => {}
        }

        let result = RoundResult {
            round: self.rounds.len(),
            user_action,
            prediction,
            winner,
            user_score: self.user_score,
            learner_score: self.learner_score,
        };
        self.rounds.push(result);
        if self.is_over() {
            log::debug!(
                "{} finished after {} rounds: user {} learner {}",
                self.kind,
                self.rounds.len(),
                self.user_score,
                self.learner_score
            );
        }
        Ok(result)
    }

    /// Whether either side has reached the target score.
    pub fn is_over(&self) -> bool {
        self.user_score.max(self.learner_score) >= self.target
    }

    /// The side that reached the target, once the game is over.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_over() {
            None
        } else if self.user_score > self.learner_score {
            Some(Side::User)
        } else {
            Some(Side::Learner)
        }
    }

    /// `(user, learner)` scores.
    pub fn scores(&self) -> (u32, u32) {
        (self.user_score, self.learner_score)
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn target_score(&self) -> u32 {
        self.target
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn learner_name(&self) -> &str {
        self.learner.name()
    }

    /// Start over with a fresh learner state and zero scores.
    pub fn restart(&mut self) -> Result<()> {
        self.learner.reset()?;
        self.user_score = 0;
        self.learner_score = 0;
        self.rounds.clear();
        Ok(())
    }
}
