//! Categorical sampling and normalization helpers.

use rand::{Rng, distr::StandardUniform};

/// Draw an index with probability proportional to its weight.
///
/// The weights need not be normalized. A ticket `u ~ U[0, 1)` is compared
/// against the normalized cumulative distribution and the first index whose
/// cumulative mass exceeds it wins; rounding that leaves the ticket past the
/// final cumulative value falls back to the last index.
pub fn sample_discrete<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    debug_assert!(!weights.is_empty());
    let total: f64 = weights.iter().sum();
    let ticket: f64 = rng.sample(StandardUniform);
    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight / total;
        if ticket < cumulative {
            return idx;
        }
    }
    weights.len().saturating_sub(1)
}

/// Scale `weights` in place so they sum to one.
///
/// Leaves the slice untouched when its total is not a positive finite number.
pub fn normalize(weights: &mut [f64]) {
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        weights.iter_mut().for_each(|w| *w /= total);
    }
}

/// Turn log-weights into a normalized distribution, writing into `out`.
///
/// Shifting by the maximum keeps the largest term at `exp(0) = 1`, so the sum
/// never underflows to zero however far the other entries have decayed.
pub fn softmax_into(log_weights: &[f64], out: &mut [f64]) {
    debug_assert_eq!(log_weights.len(), out.len());
    let max = log_weights
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    for (w, &lw) in out.iter_mut().zip(log_weights) {
        *w = (lw - max).exp();
    }
    normalize(out);
}
