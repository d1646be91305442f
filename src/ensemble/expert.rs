//! Context-tree experts
//!
//! An expert is a complete lookup table from history contexts to actions.
//! Expert `i` reads its table off the base-`n` digits of `i`, zero-padded to
//! `n^h` digits and read most-significant first, so enumerating every index in
//! `[0, n^(n^h))` enumerates every possible history-to-action function exactly
//! once.

use crate::{
    error::{InvalidArgument, Result},
    types::{Action, ContextShape},
};

/// A fixed, deterministic predictor keyed by the recent history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTreeExpert {
    index: u64,
    shape: ContextShape,
    /// Action predicted for each context. `n` is bounded by the expert limit,
    /// so every action fits in a byte.
    table: Box<[u8]>,
}

impl ContextTreeExpert {
    /// Build expert `index` for a game with `actions` choices and histories of
    /// length `depth`.
    ///
    /// # Errors
    ///
    /// Fails if the shape is invalid, the ensemble would exceed
    /// [`ContextShape::MAX_EXPERTS`], or `index` is not below `n^(n^h)`.
    pub fn new(index: u64, actions: usize, depth: usize) -> Result<Self> {
        let shape = ContextShape::new(actions, depth)?;
        let count = shape.expert_count()?;
        if index >= count as u64 {
            return Err(InvalidArgument::ExpertIndex { index, count }.into());
        }
        Ok(Self::from_shape(index, shape))
    }

    /// Build an expert for an already validated shape and in-range index.
    pub(crate) fn from_shape(index: u64, shape: ContextShape) -> Self {
        let radix = shape.actions() as u64;
        let mut table = vec![0u8; shape.contexts()].into_boxed_slice();
        let mut rest = index;
        for digit in table.iter_mut().rev() {
            *digit = (rest % radix) as u8;
            rest /= radix;
        }
        Self { index, shape, table }
    }

    /// Index identifying this expert.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Predict the next action after `history` (oldest action first).
    ///
    /// # Errors
    ///
    /// Fails if `history` is not exactly `h` long or contains an action outside
    /// `[0, n)`.
    pub fn predict(&self, history: &[Action]) -> Result<Action> {
        let context = self.shape.context_of(history)?;
        Ok(self.predict_context(context))
    }

    /// Predict for an encoded context. Panics if `context >= n^h`.
    #[inline]
    pub fn predict_context(&self, context: usize) -> Action {
        Action::from(self.table[context])
    }

    /// The full lookup table, one action per context.
    pub fn truth_table(&self) -> impl ExactSizeIterator<Item = Action> + '_ {
        self.table.iter().map(|&action| Action::from(action))
    }
}
