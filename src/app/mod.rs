//! Application layer: configuration for learners and experiment runners.
//!
//! # Usage
//!
//! ```
//! use pennies::app::{ExperimentConfig, LearnerConfig};
//!
//! let learner = LearnerConfig::new(2, 3).with_seed(42).build()?;
//! let runner = ExperimentConfig::new(2, 3).with_seed(42).runner()?;
//! assert_eq!(learner.shape(), runner.shape());
//! # Ok::<(), pennies::Error>(())
//! ```

pub mod config;

pub use config::{DEFAULT_ETA, ExperimentConfig, LearnerConfig};
