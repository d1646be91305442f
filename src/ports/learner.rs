//! Learner port - abstraction over online action predictors
//!
//! The game session and the experiment harness only need a predictor that can
//! guess the next action and be told what actually happened. This trait is
//! that boundary, so a session can be played by the expert ensemble or by a
//! baseline.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Result, types::Action};

/// Online predictor of a player's next action.
///
/// Callers must alternate strictly: one [`Learner::predict`] per round,
/// followed by one [`Learner::observe_action`] with the player's real action.
///
/// # Examples
///
/// ```
/// use pennies::{EnsembleLearner, ports::Learner};
///
/// fn play_round(learner: &mut dyn Learner, action: usize) -> pennies::Result<bool> {
///     let guess = learner.predict();
///     learner.observe_action(action)?;
///     Ok(guess == action)
/// }
///
/// let mut learner = EnsembleLearner::seeded(2, 3, 0.5, 42)?;
/// play_round(&mut learner, 1)?;
/// # Ok::<(), pennies::Error>(())
/// ```
pub trait Learner: Send {
    /// Guess the player's next action.
    fn predict(&mut self) -> Action;

    /// Record the action the player actually took.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `action` is outside
    /// `[0, action_count())`; the learner is left unchanged.
    fn observe_action(&mut self, action: Action) -> Result<()>;

    /// Number of distinct actions `n`.
    fn action_count(&self) -> usize;

    /// Name used in reports.
    fn name(&self) -> &str;

    /// Return to the state of a freshly constructed learner.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for stateless learners.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Baseline that ignores history and guesses uniformly at random.
///
/// Against any player it wins a `1/n` share of rounds in expectation.
#[derive(Debug, Clone)]
pub struct UniformLearner {
    actions: usize,
    rng: StdRng,
    name: String,
}

impl UniformLearner {
    /// Create a uniform guesser over `actions` choices.
    ///
    /// # Errors
    ///
    /// Fails if `actions < 2`.
    pub fn new(actions: usize, seed: Option<u64>) -> Result<Self> {
        if actions < 2 {
            return Err(crate::error::InvalidArgument::ActionCount { actions }.into());
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            actions,
            rng,
            name: format!("Uniform(n={actions})"),
        })
    }
}

impl Learner for UniformLearner {
    fn predict(&mut self) -> Action {
        self.rng.random_range(0..self.actions)
    }

    fn observe_action(&mut self, action: Action) -> Result<()> {
        if action < self.actions {
            Ok(())
        } else {
            Err(crate::error::InvalidArgument::ActionOutOfRange {
                action,
                actions: self.actions,
            }
            .into())
        }
    }

    fn action_count(&self) -> usize {
        self.actions
    }

    fn name(&self) -> &str {
        &self.name
    }
}
