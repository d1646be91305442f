//! Common test utilities for the pennies test suite.
//!
//! This module provides input generators and statistical helpers used across
//! multiple tests.

#![allow(dead_code)]

use pennies::{Action, ContextTreeExpert};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniformly random actions in `[0, actions)`.
///
/// # Arguments
///
/// * `actions` - Number of distinct actions
/// * `len` - Sequence length
/// * `seed` - Seed for the generating RNG
pub fn random_sequence(actions: usize, len: usize, seed: u64) -> Vec<Action> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(0..actions)).collect()
}

/// `0, 1, 0, 1, ...` of length `len`.
pub fn alternating(len: usize) -> Vec<Action> {
    (0..len).map(|i| i % 2).collect()
}

/// Pearson chi-square statistic of `counts` against a uniform expectation.
pub fn chi_square_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Mistakes `expert` makes on `input` once `depth` actions of history exist.
pub fn expert_mistakes(expert: &ContextTreeExpert, input: &[Action], depth: usize) -> usize {
    input
        .windows(depth + 1)
        .filter(|window| expert.predict(&window[..depth]).unwrap() != window[depth])
        .count()
}

/// Assert two floats agree within `tolerance`.
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
