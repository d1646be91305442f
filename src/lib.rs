//! Context-tree expert ensemble for repeated guessing games
//!
//! This crate provides:
//! - Context-tree experts: every deterministic map from the last `h` actions
//!   to a predicted next action
//! - An ensemble learner combining them with multiplicative weights
//! - Worst-case input synthesis for a given history depth
//! - Monte Carlo and exact-expectation experiments over learning rates
//! - Matching pennies and rock-paper-scissors sessions
//!
//! # Example
//!
//! ```
//! use pennies::EnsembleLearner;
//!
//! let mut learner = EnsembleLearner::seeded(2, 1, 0.5, 42)?;
//! for &action in &[0, 1, 0, 1, 0, 1] {
//!     let _guess = learner.predict();
//!     learner.observe_action(action)?;
//! }
//! // After a 0 the player has always answered 1.
//! assert!(learner.action_probabilities(&[0])?[1] > 0.5);
//! # Ok::<(), pennies::Error>(())
//! ```

pub mod app;
pub mod cli;
pub mod ensemble;
pub mod error;
pub mod experiment;
pub mod game;
pub mod ports;
pub mod types;

pub use ensemble::{ContextTreeExpert, EnsembleLearner};
pub use error::{Error, InvalidArgument, Result};
pub use experiment::{AdversarySynthesizer, ExperimentRunner};
pub use game::{GameKind, Session};
pub use ports::{Learner, Observer};
pub use types::{Action, ContextShape, Side};
