//! Worst-case input synthesis
//!
//! The adversary knows the learner's context depth but not its learning rate.
//! It keeps a count of how often each action has followed each history and
//! always plays the action it has used least after the current history, so no
//! expert's lookup table is ever confirmed for long.

use serde::{Deserialize, Serialize};

use super::input::DEFAULT_INPUT_LENGTH;
use crate::{
    Result,
    error::InvalidArgument,
    types::{Action, ContextShape},
};

/// Greedy least-used-action sequence generator for an `(n, h)` game.
#[derive(Debug, Clone)]
pub struct AdversarySynthesizer {
    shape: ContextShape,
    length: usize,
}

/// A synthesized sequence together with the table that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarialSequence {
    /// Actions, starting with the `h` zeros of the initial history.
    pub actions: Vec<Action>,
    /// `counts[context][action]`: how often `action` was chosen after the
    /// history encoded by `context`.
    pub counts: Vec<Vec<usize>>,
}

impl AdversarialSequence {
    /// Largest gap between the most and least used action of any history.
    pub fn max_imbalance(&self) -> usize {
        self.counts
            .iter()
            .map(|row| {
                let max = row.iter().max().copied().unwrap_or(0);
                let min = row.iter().min().copied().unwrap_or(0);
                max - min
            })
            .max()
            .unwrap_or(0)
    }
}

impl AdversarySynthesizer {
    /// Largest history-by-action count table the synthesizer will allocate.
    pub const MAX_COUNTERS: usize = 1 << 22;

    /// Create a synthesizer for `actions` choices and histories of length
    /// `depth`, producing [`DEFAULT_INPUT_LENGTH`] actions.
    ///
    /// Only the `n^h × n` count table is allocated, so the expert limit does
    /// not apply here.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument::TooManyContexts`] when the table would
    /// exceed [`Self::MAX_COUNTERS`].
    pub fn new(actions: usize, depth: usize) -> Result<Self> {
        let shape = ContextShape::new(actions, depth)?;
        shape
            .contexts()
            .checked_mul(actions)
            .filter(|&cells| cells <= Self::MAX_COUNTERS)
            .ok_or(InvalidArgument::TooManyContexts {
                actions,
                depth,
                limit: Self::MAX_COUNTERS,
            })?;
        Ok(Self {
            shape,
            length: DEFAULT_INPUT_LENGTH,
        })
    }

    /// Override the total sequence length (never shorter than the `h`-zero
    /// prefix).
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Generate the adversarial action sequence.
    pub fn generate(&self) -> Vec<Action> {
        self.generate_with_counts().actions
    }

    /// Generate the sequence along with its per-history action counts.
    pub fn generate_with_counts(&self) -> AdversarialSequence {
        let n = self.shape.actions();
        let depth = self.shape.depth();
        let mut table = vec![0usize; self.shape.contexts() * n];

        let mut actions = vec![0; depth];
        actions.reserve(self.length.saturating_sub(depth));
        let mut context = 0usize;

        while actions.len() < self.length {
            let row = &mut table[context * n..(context + 1) * n];
            let action = least_used(row);
            row[action] += 1;
            actions.push(action);
            context = self.shape.advance(context, action);
        }

        AdversarialSequence {
            actions,
            counts: table.chunks(n).map(<[usize]>::to_vec).collect(),
        }
    }
}

/// Index of the smallest count, preferring the lowest index on ties.
fn least_used(counts: &[usize]) -> Action {
    let mut best = 0;
    for (action, &count) in counts.iter().enumerate() {
        if count < counts[best] {
            best = action;
        }
    }
    best
}
