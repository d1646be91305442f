//! Sweep results and their JSON/CSV exports.

use std::{fs::File, io::BufWriter, path::Path};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Final scores for a single eta value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub eta: f64,
    pub user_score: f64,
    pub learner_score: f64,
    /// `user_score + learner_score`
    pub rounds: f64,
    pub user_percent: f64,
    pub learner_percent: f64,
    /// False when at least one game (or the expectation) ran out of input
    /// before either side reached the target score.
    pub concluded: bool,
}

impl SweepPoint {
    /// Derive rounds and win shares from a pair of final scores.
    pub fn new(eta: f64, user_score: f64, learner_score: f64, concluded: bool) -> Self {
        let rounds = user_score + learner_score;
        let share = |score: f64| {
            if rounds > 0.0 {
                score / rounds * 100.0
            } else {
                0.0
            }
        };
        Self {
            eta,
            user_score,
            learner_score,
            rounds,
            user_percent: share(user_score),
            learner_percent: share(learner_score),
            concluded,
        }
    }
}

/// Results of an eta sweep as parallel sequences, one entry per eta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub etas: Vec<f64>,
    pub user_scores: Vec<f64>,
    pub learner_scores: Vec<f64>,
    pub rounds: Vec<f64>,
    pub user_percent: Vec<f64>,
    pub learner_percent: Vec<f64>,
    pub concluded: Vec<bool>,
}

impl SweepReport {
    /// Collect points (in eta order) into parallel sequences.
    pub fn from_points(points: &[SweepPoint]) -> Self {
        let mut report = Self::default();
        for point in points {
            report.etas.push(point.eta);
            report.user_scores.push(point.user_score);
            report.learner_scores.push(point.learner_score);
            report.rounds.push(point.rounds);
            report.user_percent.push(point.user_percent);
            report.learner_percent.push(point.learner_percent);
            report.concluded.push(point.concluded);
        }
        report
    }

    /// Number of eta values evaluated.
    pub fn len(&self) -> usize {
        self.etas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.etas.is_empty()
    }

    /// The report row by row.
    pub fn points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        (0..self.len()).map(|i| SweepPoint {
            eta: self.etas[i],
            user_score: self.user_scores[i],
            learner_score: self.learner_scores[i],
            rounds: self.rounds[i],
            user_percent: self.user_percent[i],
            learner_percent: self.learner_percent[i],
            concluded: self.concluded[i],
        })
    }

    /// Point with the highest learner win share among concluded points.
    pub fn best_for_learner(&self) -> Option<SweepPoint> {
        self.points()
            .filter(|p| p.concluded)
            .max_by(|a, b| a.learner_percent.total_cmp(&b.learner_percent))
    }

    /// Save report to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }

    /// Save one CSV row per eta value
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for point in self.points() {
            writer.serialize(point)?;
        }
        writer.flush()?;
        Ok(())
    }
}
