//! Core value types shared by experts, learners and experiments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidArgument, Result};

/// One of `n` discrete choices, always in `[0, n)`.
pub type Action = usize;

/// The two players of a prediction game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The human supplying actions.
    User,
    /// The predictor.
    Learner,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::User => write!(f, "user"),
            Side::Learner => write!(f, "learner"),
        }
    }
}

/// The `(n, h)` geometry of a context-tree game: `n` actions and histories of
/// depth `h`.
///
/// A history window is encoded as a base-`n` integer, the *context*. The oldest
/// action of the window is the most significant digit and the most recent
/// action the least significant one, so `[1, 0, 1]` with `n = 2` is context 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextShape {
    actions: usize,
    depth: usize,
    contexts: usize,
}

impl ContextShape {
    /// Largest expert ensemble a learner will enumerate.
    pub const MAX_EXPERTS: usize = 1_000_000;

    /// Create a shape for `actions` choices and histories of length `depth`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::ActionCount`] if `actions < 2`,
    /// [`InvalidArgument::HistoryDepth`] if `depth < 1`, and
    /// [`InvalidArgument::TooManyExperts`] if even the context count `n^h`
    /// overflows.
    pub fn new(actions: usize, depth: usize) -> Result<Self> {
        if actions < 2 {
            return Err(InvalidArgument::ActionCount { actions }.into());
        }
        if depth < 1 {
            return Err(InvalidArgument::HistoryDepth { depth }.into());
        }
        let contexts = u32::try_from(depth)
            .ok()
            .and_then(|exp| actions.checked_pow(exp))
            .ok_or(InvalidArgument::TooManyExperts {
                actions,
                depth,
                limit: Self::MAX_EXPERTS,
            })?;
        Ok(Self {
            actions,
            depth,
            contexts,
        })
    }

    /// Number of actions `n`.
    pub fn actions(&self) -> usize {
        self.actions
    }

    /// History depth `h`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of distinct histories, `n^h`.
    pub fn contexts(&self) -> usize {
        self.contexts
    }

    /// Number of context-tree experts, `n^(n^h)`, if it fits under
    /// [`Self::MAX_EXPERTS`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::TooManyExperts`] when enumeration would exceed
    /// the limit.
    pub fn expert_count(&self) -> Result<usize> {
        u32::try_from(self.contexts)
            .ok()
            .and_then(|exp| self.actions.checked_pow(exp))
            .filter(|&count| count <= Self::MAX_EXPERTS)
            .ok_or_else(|| {
                InvalidArgument::TooManyExperts {
                    actions: self.actions,
                    depth: self.depth,
                    limit: Self::MAX_EXPERTS,
                }
                .into()
            })
    }

    /// Reject actions outside `[0, n)`.
    pub fn check_action(&self, action: Action) -> Result<()> {
        if action < self.actions {
            Ok(())
        } else {
            Err(InvalidArgument::ActionOutOfRange {
                action,
                actions: self.actions,
            }
            .into())
        }
    }

    /// Encode a history window as its context.
    ///
    /// # Errors
    ///
    /// Fails if the window is not exactly `h` long or holds an out-of-range
    /// action.
    pub fn context_of(&self, history: &[Action]) -> Result<usize> {
        if history.len() != self.depth {
            return Err(InvalidArgument::HistoryLength {
                expected: self.depth,
                got: history.len(),
            }
            .into());
        }
        history.iter().try_fold(0, |row, &action| {
            self.check_action(action)?;
            Ok(row * self.actions + action)
        })
    }

    /// Decode a context back into its history window.
    pub fn history_of(&self, mut context: usize) -> Vec<Action> {
        let mut history = vec![0; self.depth];
        for slot in history.iter_mut().rev() {
            *slot = context % self.actions;
            context /= self.actions;
        }
        history
    }

    /// Context reached by appending `action` to the window encoded by
    /// `context` and dropping its oldest entry.
    pub fn advance(&self, context: usize, action: Action) -> usize {
        (context * self.actions + action) % self.contexts
    }
}

impl fmt::Display for ContextShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}, h={}", self.actions, self.depth)
    }
}
