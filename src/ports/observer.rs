//! Observer port - abstraction for experiment observation and data collection
//!
//! Observers see every finished game and every completed sweep point, so
//! progress reporting, metrics and raw exports can be composed without the
//! runner knowing about any of them.

use crate::{
    Result,
    experiment::{GameRecord, SweepPoint},
};

/// Observer trait for monitoring experiment sweeps
///
/// # Event Sequence
///
/// 1. `on_sweep_start(total_points, trials_per_point)` - once
/// 2. For each eta value, in any order when the sweep runs in parallel:
///    - `on_game_end(record)` - once per Monte Carlo trial
///    - `on_point_end(point)` - once the eta value is fully evaluated
/// 3. `on_sweep_end()` - once
///
/// Expectation sweeps (`count == 0`) play no games, so only the point events
/// fire.
///
/// # Examples
///
/// ```
/// use pennies::{experiment::GameRecord, ports::Observer};
///
/// struct LongestGame {
///     rounds: u32,
/// }
///
/// impl Observer for LongestGame {
///     fn on_game_end(&mut self, record: &GameRecord) -> pennies::Result<()> {
///         self.rounds = self.rounds.max(record.score.rounds());
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called before the first eta value is evaluated.
    ///
    /// `trials_per_point` is zero for expectation sweeps.
    fn on_sweep_start(&mut self, _total_points: usize, _trials_per_point: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each simulated game finishes.
    fn on_game_end(&mut self, _record: &GameRecord) -> Result<()> {
        Ok(())
    }

    /// Called once an eta value has been fully evaluated.
    fn on_point_end(&mut self, _point: &SweepPoint) -> Result<()> {
        Ok(())
    }

    /// Called after the last eta value.
    fn on_sweep_end(&mut self) -> Result<()> {
        Ok(())
    }
}
