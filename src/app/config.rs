//! Configuration types for learners and experiments.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ensemble::EnsembleLearner,
    experiment::{ExperimentRunner, WINNING_SCORE},
    game::GameKind,
};

/// Learning rate used when none is given.
pub const DEFAULT_ETA: f64 = 0.5;

/// Configuration for creating an expert ensemble.
///
/// # Examples
///
/// ```
/// use pennies::app::LearnerConfig;
/// use pennies::game::GameKind;
///
/// let learner = LearnerConfig::for_game(GameKind::RockPaperScissors)
///     .with_eta(0.3)
///     .with_seed(42)
///     .build()?;
/// assert_eq!(learner.experts().len(), 19_683);
/// # Ok::<(), pennies::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Number of actions `n`
    pub actions: usize,
    /// History depth `h`
    pub depth: usize,
    /// Learning rate
    #[serde(default = "default_eta")]
    pub eta: f64,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_eta() -> f64 {
    DEFAULT_ETA
}

impl LearnerConfig {
    /// Configuration with the default learning rate and no seed.
    pub fn new(actions: usize, depth: usize) -> Self {
        Self {
            actions,
            depth,
            eta: DEFAULT_ETA,
            seed: None,
        }
    }

    /// Preset used by the interactive game of `kind`.
    pub fn for_game(kind: GameKind) -> Self {
        Self::new(kind.actions(), kind.default_depth())
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the learner.
    ///
    /// # Errors
    ///
    /// Any invalid parameter is reported as an invalid-argument error.
    pub fn build(&self) -> Result<EnsembleLearner> {
        EnsembleLearner::from_seed(self.actions, self.depth, self.eta, self.seed)
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Configuration for an [`ExperimentRunner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub actions: usize,
    pub depth: usize,
    /// Base seed for per-trial RNGs; `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Evaluate eta values on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_target_score")]
    pub target_score: u32,
}

fn default_parallel() -> bool {
    true
}

fn default_target_score() -> u32 {
    WINNING_SCORE
}

impl ExperimentConfig {
    pub fn new(actions: usize, depth: usize) -> Self {
        Self {
            actions,
            depth,
            seed: None,
            parallel: true,
            target_score: WINNING_SCORE,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Build a runner without observers.
    pub fn runner(&self) -> Result<ExperimentRunner> {
        let mut runner = ExperimentRunner::new(self.actions, self.depth)?
            .with_target_score(self.target_score)?;
        if let Some(seed) = self.seed {
            runner = runner.with_seed(seed);
        }
        if !self.parallel {
            runner = runner.sequential();
        }
        Ok(runner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_presets() {
        let pennies = LearnerConfig::for_game(GameKind::MatchingPennies);
        assert_eq!((pennies.actions, pennies.depth), (2, 3));
        let rps = LearnerConfig::for_game(GameKind::RockPaperScissors);
        assert_eq!((rps.actions, rps.depth), (3, 2));
        assert_eq!(rps.eta, DEFAULT_ETA);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: LearnerConfig = serde_json::from_str(r#"{"actions":2,"depth":1}"#).unwrap();
        assert_eq!(config, LearnerConfig::new(2, 1));

        let experiment: ExperimentConfig =
            serde_json::from_str(r#"{"actions":3,"depth":2,"seed":7}"#).unwrap();
        assert!(experiment.parallel);
        assert_eq!(experiment.target_score, WINNING_SCORE);
        assert_eq!(experiment.seed, Some(7));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learner.json");
        let config = LearnerConfig::new(3, 1).with_eta(0.25).with_seed(9);
        config.save(&path).unwrap();
        assert_eq!(LearnerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn invalid_config_fails_to_build() {
        let err = LearnerConfig::new(1, 1).build().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(ExperimentConfig::new(2, 0).runner().is_err());
    }

    #[test]
    fn zero_target_score_fails_to_build_runner() {
        let mut config = ExperimentConfig::new(2, 1);
        config.target_score = 0;
        assert!(matches!(
            config.runner(),
            Err(crate::Error::InvalidArgument(
                crate::error::InvalidArgument::TargetScore
            ))
        ));
    }
}
