//! Observer adapters for experiment sweeps
//!
//! Observers allow composable data collection during a sweep without coupling
//! the runner to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::{report::SweepPoint, runner::GameRecord};
use crate::{Result, ports::Observer, types::Side};

/// Progress bar observer - Shows sweep progress
///
/// Counts games for Monte Carlo sweeps and eta values for expectation sweeps.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    per_game: bool,
    learner_wins: usize,
    user_wins: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            per_game: false,
            learner_wins: 0,
            user_wins: 0,
        }
    }

    fn message(&self) -> String {
        format!("U:{} L:{}", self.user_wins, self.learner_wins)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_sweep_start(&mut self, total_points: usize, trials_per_point: usize) -> Result<()> {
        self.per_game = trials_per_point > 0;
        let (total, unit) = if self.per_game {
            (total_points * trials_per_point, "games")
        } else {
            (total_points, "etas")
        };
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {unit} ({{msg}})"
                ))
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        match record.score.winner() {
            Some(Side::User) => self.user_wins += 1,
            Some(Side::Learner) => self.learner_wins += 1,
            None => {}
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_point_end(&mut self, _point: &SweepPoint) -> Result<()> {
        if self.per_game {
            return Ok(());
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
        Ok(())
    }

    fn on_sweep_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of sweep metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub user_wins: usize,
    pub learner_wins: usize,
    pub unconcluded: usize,
    pub total_rounds: u64,
    pub points: usize,
}

impl MetricsSummary {
    /// Share of concluded games won by the learner
    pub fn learner_win_rate(&self) -> f64 {
        let concluded = self.user_wins + self.learner_wins;
        if concluded == 0 {
            0.0
        } else {
            self.learner_wins as f64 / concluded as f64
        }
    }

    /// Get average game length
    pub fn avg_game_length(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.total_rounds as f64 / self.total_games as f64
        }
    }
}

/// Metrics observer - Tracks game outcomes across a sweep
///
/// Clones share the same counters, so keep one clone and hand the other to
/// the runner.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<MetricsSummary>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut MetricsSummary)) {
        f(&mut self.metrics.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl Observer for MetricsObserver {
    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        self.update(|m| {
            m.total_games += 1;
            m.total_rounds += u64::from(record.score.rounds());
            match record.score.winner() {
                Some(Side::User) => m.user_wins += 1,
                Some(Side::Learner) => m.learner_wins += 1,
                None => m.unconcluded += 1,
            }
        });
        Ok(())
    }

    fn on_point_end(&mut self, _point: &SweepPoint) -> Result<()> {
        self.update(|m| m.points += 1);
        Ok(())
    }
}

/// JSONL observer - Exports every finished game as one JSON line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn on_sweep_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
