//! Multiplicative-weights learner over every context-tree expert
//!
//! The learner keeps a probability distribution over all `n^(n^h)` experts.
//! Each observed action penalizes the experts that mispredicted it by a factor
//! of `e^(-eta)`, and each prediction follows one expert drawn from the
//! distribution (randomized weighted majority).
//!
//! Weights are tracked in log space and exposed normalized, which keeps the
//! distribution well defined after arbitrarily long games.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    expert::ContextTreeExpert,
    sampling::{sample_discrete, softmax_into},
};
use crate::{
    error::{InvalidArgument, Result},
    ports::Learner,
    types::{Action, ContextShape},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Context-tree expert ensemble trained online with multiplicative weights.
///
/// All randomness comes from the injected generator `R`, so a seeded
/// generator makes every prediction reproducible.
#[derive(Debug, Clone)]
pub struct EnsembleLearner<R = StdRng> {
    shape: ContextShape,
    eta: f64,
    experts: Vec<ContextTreeExpert>,
    log_weights: Vec<f64>,
    weights: Vec<f64>,
    actions: Vec<Action>,
    predictions: Vec<Action>,
    rng: R,
    name: String,
}

impl EnsembleLearner<StdRng> {
    /// Create a learner for `actions` choices, histories of length `depth`,
    /// and learning rate `eta`, seeded from the thread RNG.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::InvalidArgument`] if `actions < 2`,
    /// `depth < 1`, `eta` is not positive and finite, or the ensemble would
    /// exceed [`ContextShape::MAX_EXPERTS`].
    pub fn new(actions: usize, depth: usize, eta: f64) -> Result<Self> {
        Self::with_rng(actions, depth, eta, build_rng(None))
    }

    /// Create a learner whose random draws are reproducible from `seed`.
    pub fn seeded(actions: usize, depth: usize, eta: f64, seed: u64) -> Result<Self> {
        Self::with_rng(actions, depth, eta, build_rng(Some(seed)))
    }

    /// Build a learner from an optional seed.
    pub fn from_seed(actions: usize, depth: usize, eta: f64, seed: Option<u64>) -> Result<Self> {
        Self::with_rng(actions, depth, eta, build_rng(seed))
    }
}

impl<R: Rng> EnsembleLearner<R> {
    /// Create a learner drawing its randomness from `rng`.
    pub fn with_rng(actions: usize, depth: usize, eta: f64, rng: R) -> Result<Self> {
        if !(eta > 0.0 && eta.is_finite()) {
            return Err(InvalidArgument::LearningRate { eta }.into());
        }
        let shape = ContextShape::new(actions, depth)?;
        let count = shape.expert_count()?;

        let experts: Vec<ContextTreeExpert> = (0..count as u64)
            .map(|index| ContextTreeExpert::from_shape(index, shape))
            .collect();
        log::debug!("enumerated {count} context-tree experts ({shape}, eta={eta})");

        Ok(Self {
            shape,
            eta,
            experts,
            log_weights: vec![0.0; count],
            weights: vec![1.0 / count as f64; count],
            actions: Vec::new(),
            predictions: Vec::new(),
            rng,
            name: format!("Experts({shape}, eta={eta})"),
        })
    }

    /// Predict the next action.
    ///
    /// Until `h` actions have been seen the prediction is uniform over
    /// `[0, n)`. Afterwards an expert is drawn from the weight distribution and
    /// its prediction for the current history is returned.
    pub fn predict(&mut self) -> Action {
        let prediction = match self.current_context() {
            None => self.rng.random_range(0..self.shape.actions()),
            Some(context) => {
                let index = sample_discrete(&self.weights, &mut self.rng);
                self.experts[index].predict_context(context)
            }
        };
        self.predictions.push(prediction);
        prediction
    }

    /// Record the player's action and penalize every expert that missed it.
    ///
    /// No weights change while fewer than `h` actions precede this one.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument::ActionOutOfRange`] (leaving the learner
    /// untouched) if `action` is not in `[0, n)`.
    pub fn observe_action(&mut self, action: Action) -> Result<()> {
        self.shape.check_action(action)?;

        if let Some(context) = self.current_context() {
            let mut mistaken = 0usize;
            for (expert, log_weight) in self.experts.iter().zip(self.log_weights.iter_mut()) {
                if expert.predict_context(context) != action {
                    *log_weight -= self.eta;
                    mistaken += 1;
                }
            }
            softmax_into(&self.log_weights, &mut self.weights);
            log::trace!(
                "round {}: action {action} penalized {mistaken}/{} experts",
                self.actions.len(),
                self.experts.len()
            );
        }

        self.actions.push(action);
        Ok(())
    }

    /// Probability of predicting each action after `history`.
    ///
    /// Sums the weight of every expert by the action it predicts for
    /// `history`, giving `n` non-negative values that sum to one.
    ///
    /// # Errors
    ///
    /// Fails if `history` is not `h` actions long or holds an out-of-range
    /// action.
    pub fn action_probabilities(&self, history: &[Action]) -> Result<Vec<f64>> {
        let context = self.shape.context_of(history)?;
        Ok(self.context_probabilities(context))
    }

    pub(crate) fn context_probabilities(&self, context: usize) -> Vec<f64> {
        let mut probs = vec![0.0; self.shape.actions()];
        for (expert, &weight) in self.experts.iter().zip(&self.weights) {
            probs[expert.predict_context(context)] += weight;
        }
        probs
    }

    /// The `h` most recent actions, once enough have been observed.
    pub fn current_history(&self) -> Option<&[Action]> {
        let depth = self.shape.depth();
        let len = self.actions.len();
        (len >= depth).then(|| &self.actions[len - depth..])
    }

    fn current_context(&self) -> Option<usize> {
        self.current_history().map(|history| {
            history
                .iter()
                .fold(0, |row, &action| row * self.shape.actions() + action)
        })
    }

    /// Whether enough history has been seen for the experts to be consulted.
    pub fn is_warmed_up(&self) -> bool {
        self.actions.len() >= self.shape.depth()
    }

    /// Game geometry.
    pub fn shape(&self) -> ContextShape {
        self.shape
    }

    /// Learning rate.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Every expert, indexed like [`Self::weights`].
    pub fn experts(&self) -> &[ContextTreeExpert] {
        &self.experts
    }

    /// Current distribution over experts.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// All actions observed so far.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// All predictions emitted so far.
    pub fn predictions(&self) -> &[Action] {
        &self.predictions
    }

    /// Index and weight of the heaviest expert (lowest index on ties).
    pub fn leading_expert(&self) -> (usize, f64) {
        self.weights
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (idx, w)| {
                if w > best.1 { (idx, w) } else { best }
            })
    }

    /// Forget the game: clear history and predictions, reset weights to uniform.
    pub fn clear(&mut self) {
        let count = self.experts.len();
        self.actions.clear();
        self.predictions.clear();
        self.log_weights.iter_mut().for_each(|lw| *lw = 0.0);
        self.weights.iter_mut().for_each(|w| *w = 1.0 / count as f64);
    }
}

impl<R: Rng + Send> Learner for EnsembleLearner<R> {
    fn predict(&mut self) -> Action {
        EnsembleLearner::predict(self)
    }

    fn observe_action(&mut self, action: Action) -> Result<()> {
        EnsembleLearner::observe_action(self, action)
    }

    fn action_count(&self) -> usize {
        self.shape.actions()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}
