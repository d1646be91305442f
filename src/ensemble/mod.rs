//! Context-tree expert ensemble
//!
//! - [`ContextTreeExpert`]: one deterministic history-to-action table
//! - [`EnsembleLearner`]: every such table, weighted and trained online with
//!   multiplicative weights
//!
//! ## Usage Example
//!
//! ```
//! use pennies::ensemble::EnsembleLearner;
//!
//! // matching pennies, three rounds of context, eta = 0.5
//! let mut learner = EnsembleLearner::seeded(2, 3, 0.5, 7)?;
//! for action in [0, 1, 1, 0, 1, 1, 0, 1, 1] {
//!     let _guess = learner.predict();
//!     learner.observe_action(action)?;
//! }
//! let probs = learner.action_probabilities(&[0, 1, 1])?;
//! assert!(probs[0] > probs[1]);
//! # Ok::<(), pennies::Error>(())
//! ```

pub mod expert;
pub mod learner;
pub mod sampling;

pub use expert::ContextTreeExpert;
pub use learner::EnsembleLearner;
pub use sampling::sample_discrete;
