//! Offline evaluation and tuning of the expert ensemble
//!
//! This module provides:
//! - Input sequences: cyclic patterns and parsed digit strings
//! - Worst-case input synthesis for a given `(n, h)`
//! - Single games, Monte Carlo averages and exact expectations
//! - Learning-rate sweeps with observers and JSON/CSV reports

pub mod adversary;
pub mod input;
pub mod observers;
pub mod report;
pub mod runner;

pub use adversary::{AdversarialSequence, AdversarySynthesizer};
pub use input::{DEFAULT_INPUT_LENGTH, format_actions, generate_pattern, parse_actions};
pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use report::{SweepPoint, SweepReport};
pub use runner::{
    AverageScore, ExpectationTrace, ExperimentRunner, GameRecord, GameScore, SimulatedScore,
    MAX_SWEEP_POINTS, WINNING_SCORE, eta_range, play_game,
};
