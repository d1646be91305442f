//! Offline evaluation of the expert ensemble against fixed inputs
//!
//! Three ways of scoring a learner configuration on an input sequence:
//!
//! - [`ExperimentRunner::run_single`] plays one game, first to the target
//!   score wins;
//! - [`ExperimentRunner::run_average`] averages many independent games
//!   (Monte Carlo);
//! - [`ExperimentRunner::simulate`] computes the expected final scores
//!   exactly, by summing the learner's win probability round by round instead
//!   of sampling predictions.
//!
//! [`ExperimentRunner::run`] sweeps a list of learning rates with either
//! method. Points are independent, so the sweep runs them on the rayon pool.

use std::sync::{Mutex, PoisonError};

use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    adversary::AdversarySynthesizer,
    report::{SweepPoint, SweepReport},
};
use crate::{
    Error, Result,
    ensemble::EnsembleLearner,
    error::InvalidArgument,
    ports::{Learner, Observer},
    types::{Action, ContextShape, Side},
};

/// Score at which a game ends.
pub const WINNING_SCORE: u32 = 100;

/// Most learning rates a generated range may hold.
pub const MAX_SWEEP_POINTS: u32 = 1_000_000;

/// Final scores of one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub user: u32,
    pub learner: u32,
    /// False when the input ran out before either side reached the target.
    pub concluded: bool,
}

impl GameScore {
    /// Rounds played: every round awards exactly one point.
    pub fn rounds(&self) -> u32 {
        self.user + self.learner
    }

    /// Side that reached the target first, if the game concluded.
    pub fn winner(&self) -> Option<Side> {
        match (self.concluded, self.user > self.learner) {
            (false, _) => None,
            (true, true) => Some(Side::User),
            (true, false) => Some(Side::Learner),
        }
    }
}

/// One finished Monte Carlo game, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub eta: f64,
    pub trial: usize,
    pub score: GameScore,
}

/// Mean final scores over repeated games.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageScore {
    pub user: f64,
    pub learner: f64,
    pub trials: usize,
    /// Trials whose input ran out before the game ended.
    pub unconcluded: usize,
}

/// Expected final scores from the closed-form simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimulatedScore {
    /// An expected score crossed the threshold after `rounds` rounds.
    Concluded { rounds: usize, user: f64, learner: f64 },
    /// Neither expected score crossed the threshold before the input ended;
    /// the values are the expectations after the last round.
    Unconcluded { user: f64, learner: f64 },
}

impl SimulatedScore {
    pub fn user(&self) -> f64 {
        match *self {
            SimulatedScore::Concluded { user, .. } | SimulatedScore::Unconcluded { user, .. } => {
                user
            }
        }
    }

    pub fn learner(&self) -> f64 {
        match *self {
            SimulatedScore::Concluded { learner, .. }
            | SimulatedScore::Unconcluded { learner, .. } => learner,
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self, SimulatedScore::Concluded { .. })
    }
}

/// Round-by-round expectation of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationTrace {
    /// Probability that the learner takes each round.
    pub learner_win: Vec<f64>,
    /// Cumulative expected user score after each round.
    pub user_scores: Vec<f64>,
    /// Cumulative expected learner score after each round.
    pub learner_scores: Vec<f64>,
    /// Index of the first round whose cumulative expectation crosses the
    /// threshold.
    pub stop_round: Option<usize>,
    /// Leading rounds predicted uniformly at random.
    pub warm_up: usize,
}

impl ExpectationTrace {
    /// Expected final scores at the stopping round.
    pub fn outcome(&self) -> SimulatedScore {
        match self.stop_round {
            Some(t) => SimulatedScore::Concluded {
                rounds: t + 1,
                user: self.user_scores[t],
                learner: self.learner_scores[t],
            },
            None => SimulatedScore::Unconcluded {
                user: self.user_scores.last().copied().unwrap_or(0.0),
                learner: self.learner_scores.last().copied().unwrap_or(0.0),
            },
        }
    }

    /// Expected learner mistakes over every round after warm-up, ignoring
    /// the stopping rule.
    pub fn expected_mistakes(&self) -> f64 {
        self.learner_win[self.warm_up..]
            .iter()
            .map(|p| 1.0 - p)
            .sum()
    }
}

/// Play one game of `learner` against a fixed `input`, first to `target`.
///
/// Each round the learner predicts, the prediction is scored against the next
/// input action, and the game stops as soon as either side reaches `target`.
/// Otherwise the learner observes the action and play continues.
pub fn play_game(learner: &mut dyn Learner, input: &[Action], target: u32) -> Result<GameScore> {
    let mut score = GameScore::default();
    for &action in input {
        let prediction = learner.predict();
        if prediction == action {
            score.learner += 1;
        } else {
            score.user += 1;
        }
        if score.user.max(score.learner) >= target {
            score.concluded = true;
            return Ok(score);
        }
        learner.observe_action(action)?;
    }
    Ok(score)
}

/// Experiment harness for an `(n, h)` game.
pub struct ExperimentRunner {
    shape: ContextShape,
    seed: Option<u64>,
    target: u32,
    parallel: bool,
    observers: Mutex<Vec<Box<dyn Observer>>>,
}

impl ExperimentRunner {
    /// Create a runner for `actions` choices and histories of length `depth`.
    ///
    /// # Errors
    ///
    /// Fails if the shape is invalid or its expert ensemble is too large to
    /// enumerate.
    pub fn new(actions: usize, depth: usize) -> Result<Self> {
        let shape = ContextShape::new(actions, depth)?;
        shape.expert_count()?;
        Ok(Self {
            shape,
            seed: None,
            target: WINNING_SCORE,
            parallel: true,
            observers: Mutex::new(Vec::new()),
        })
    }

    /// Make every trial reproducible. Each trial derives its own stream from
    /// this seed, its eta index and its trial index.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
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

    /// Evaluate sweep points one after another instead of on the rayon pool.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
        self
    }

    pub fn shape(&self) -> ContextShape {
        self.shape
    }

    pub fn target_score(&self) -> u32 {
        self.target
    }

    /// Play a single game with a fresh learner.
    pub fn run_single(&self, eta: f64, input: &[Action]) -> Result<GameScore> {
        self.check_input(input)?;
        self.play_trial(0, 0, eta, input)
    }

    /// Average the final scores of `count` independent games.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument::TrialCount`] if `count == 0`.
    pub fn run_average(&self, eta: f64, input: &[Action], count: usize) -> Result<AverageScore> {
        self.check_input(input)?;
        self.average_at(0, eta, input, count)
    }

    /// Expected final scores, computed without sampling.
    pub fn simulate(&self, eta: f64, input: &[Action]) -> Result<SimulatedScore> {
        Ok(self.simulate_trace(eta, input)?.outcome())
    }

    /// Round-by-round expected scores.
    ///
    /// The first `h` rounds are won by the learner with probability `1/n`.
    /// After that, the probability is the mass the learner's distribution puts
    /// on the action actually played. The stopping round is the first where
    /// either cumulative expectation exceeds the target minus one half.
    pub fn simulate_trace(&self, eta: f64, input: &[Action]) -> Result<ExpectationTrace> {
        self.check_input(input)?;
        let mut learner = EnsembleLearner::seeded(
            self.shape.actions(),
            self.shape.depth(),
            eta,
            self.seed.unwrap_or(0),
        )?;

        let uniform = 1.0 / self.shape.actions() as f64;
        let threshold = f64::from(self.target) - 0.5;
        let mut trace = ExpectationTrace {
            learner_win: Vec::with_capacity(input.len()),
            user_scores: Vec::with_capacity(input.len()),
            learner_scores: Vec::with_capacity(input.len()),
            stop_round: None,
            warm_up: self.shape.depth().min(input.len()),
        };

        let (mut user, mut learner_total) = (0.0, 0.0);
        for (round, &action) in input.iter().enumerate() {
            let p = match learner.current_history() {
                None => uniform,
                Some(history) => {
                    let context = self.shape.context_of(history)?;
                    learner.context_probabilities(context)[action]
                }
            };
            learner.observe_action(action)?;

            user += 1.0 - p;
            learner_total += p;
            trace.learner_win.push(p);
            trace.user_scores.push(user);
            trace.learner_scores.push(learner_total);
            if trace.stop_round.is_none() && (user > threshold || learner_total > threshold) {
                trace.stop_round = Some(round);
            }
        }

        if trace.stop_round.is_none() {
            log::warn!(
                "expected game did not conclude within {} rounds (eta={eta})",
                input.len()
            );
        }
        Ok(trace)
    }

    /// Expectation trace against the synthesized adversary for this shape.
    pub fn simulate_adversary(&self, eta: f64) -> Result<ExpectationTrace> {
        let adversary =
            AdversarySynthesizer::new(self.shape.actions(), self.shape.depth())?.generate();
        self.simulate_trace(eta, &adversary)
    }

    /// Evaluate every eta: Monte Carlo over `count` games when `count > 0`,
    /// exact expectation when `count == 0`.
    pub fn run(&self, etas: &[f64], input: &[Action], count: usize) -> Result<SweepReport> {
        self.check_input(input)?;
        if let Some(&eta) = etas.iter().find(|&&eta| !(eta > 0.0 && eta.is_finite())) {
            return Err(InvalidArgument::LearningRate { eta }.into());
        }

        self.notify("starting sweep", |o| o.on_sweep_start(etas.len(), count))?;

        let evaluate = |(index, &eta): (usize, &f64)| self.evaluate_point(index, eta, input, count);
        let points = if self.parallel {
            etas.par_iter()
                .enumerate()
                .map(evaluate)
                .collect::<Result<Vec<_>>>()?
        } else {
            etas.iter()
                .enumerate()
                .map(evaluate)
                .collect::<Result<Vec<_>>>()?
        };

        self.notify("ending sweep", |o| o.on_sweep_end())?;
        Ok(SweepReport::from_points(&points))
    }

    /// Sweep etas `start, start + step, ...` strictly below `end`.
    pub fn run_for_range(
        &self,
        start: f64,
        end: f64,
        step: f64,
        input: &[Action],
        count: usize,
    ) -> Result<SweepReport> {
        let etas = eta_range(start, end, step)?;
        self.run(&etas, input, count)
    }

    fn evaluate_point(
        &self,
        index: usize,
        eta: f64,
        input: &[Action],
        count: usize,
    ) -> Result<SweepPoint> {
        let point = if count == 0 {
            let simulated = self.simulate(eta, input)?;
            SweepPoint::new(
                eta,
                simulated.user(),
                simulated.learner(),
                simulated.is_concluded(),
            )
        } else {
            let average = self.average_at(index, eta, input, count)?;
            SweepPoint::new(
                eta,
                average.user,
                average.learner,
                average.unconcluded == 0,
            )
        };
        log::info!(
            "eta={:.4} user={:.2} learner={:.2} ({:.1}% learner)",
            point.eta,
            point.user_score,
            point.learner_score,
            point.learner_percent
        );
        self.notify("finishing sweep point", |o| o.on_point_end(&point))?;
        Ok(point)
    }

    fn average_at(
        &self,
        index: usize,
        eta: f64,
        input: &[Action],
        count: usize,
    ) -> Result<AverageScore> {
        if count == 0 {
            return Err(InvalidArgument::TrialCount.into());
        }
        let (mut user, mut learner, mut unconcluded) = (0u64, 0u64, 0usize);
        for trial in 0..count {
            let score = self.play_trial(index, trial, eta, input)?;
            user += u64::from(score.user);
            learner += u64::from(score.learner);
            if !score.concluded {
                unconcluded += 1;
            }
            let record = GameRecord { eta, trial, score };
            self.notify("recording game", |o| o.on_game_end(&record))?;
        }
        if unconcluded > 0 {
            log::warn!("{unconcluded}/{count} games at eta={eta} ran out of input");
        }
        Ok(AverageScore {
            user: user as f64 / count as f64,
            learner: learner as f64 / count as f64,
            trials: count,
            unconcluded,
        })
    }

    fn play_trial(&self, index: usize, trial: usize, eta: f64, input: &[Action]) -> Result<GameScore> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(trial_seed(seed, index, trial)),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut learner =
            EnsembleLearner::with_rng(self.shape.actions(), self.shape.depth(), eta, rng)?;
        play_game(&mut learner, input, self.target)
    }

    fn check_input(&self, input: &[Action]) -> Result<()> {
        if input.is_empty() {
            return Err(InvalidArgument::EmptyInput.into());
        }
        input
            .iter()
            .try_for_each(|&action| self.shape.check_action(action))
    }

    fn notify<F>(&self, context: &str, mut event: F) -> Result<()>
    where
        F: FnMut(&mut dyn Observer) -> Result<()>,
    {
        let mut observers = self.observers.lock().map_err(|_| Error::ObserverPoisoned {
            context: context.to_string(),
        })?;
        for observer in observers.iter_mut() {
            event(observer.as_mut())?;
        }
        Ok(())
    }
}

/// Learning rates `start, start + step, ...` strictly below `end`.
///
/// # Errors
///
/// Fails with [`InvalidArgument::EtaRange`] unless `0 < start < end` and
/// `step > 0`, all finite, and the range holds at most [`MAX_SWEEP_POINTS`]
/// values.
pub fn eta_range(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    let valid = [start, end, step].iter().all(|v| v.is_finite())
        && start > 0.0
        && start < end
        && step > 0.0;
    let points = ((end - start) / step).ceil();
    if !valid || points > f64::from(MAX_SWEEP_POINTS) {
        return Err(InvalidArgument::EtaRange { start, end, step }.into());
    }
    // One spare index absorbs rounding in `points`; the filter decides.
    Ok((0..=points as u32)
        .map(|i| start + f64::from(i) * step)
        .take_while(|&eta| eta < end)
        .collect())
}

/// Independent stream per (seed, point, trial), mixed with SplitMix64.
fn trial_seed(seed: u64, index: usize, trial: usize) -> u64 {
    let mut z = seed
        ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (trial as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
