//! Sweep command - Evaluate the ensemble over a range of learning rates

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::InputArgs;
use crate::{
    app::ExperimentConfig,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    experiment::{
        DEFAULT_INPUT_LENGTH, JsonlObserver, MetricsObserver, ProgressObserver, SweepReport,
        eta_range,
    },
    types::ContextShape,
};

#[derive(Parser, Debug)]
#[command(about = "Sweep learning rates against a fixed input")]
pub struct SweepArgs {
    /// Number of actions n
    #[arg(long, short = 'n', default_value_t = 2)]
    pub actions: usize,

    /// History depth h
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Explicit learning rates (comma separated); overrides the range
    #[arg(long, value_delimiter = ',')]
    pub etas: Option<Vec<f64>>,

    /// First learning rate of the range
    #[arg(long, default_value_t = 0.05)]
    pub eta_start: f64,

    /// End of the range (exclusive)
    #[arg(long, default_value_t = 1.0)]
    pub eta_end: f64,

    /// Range step
    #[arg(long, default_value_t = 0.05)]
    pub eta_step: f64,

    #[command(flatten)]
    pub input: InputArgs,

    /// Length of generated input (--pattern, --adversary)
    #[arg(long, default_value_t = DEFAULT_INPUT_LENGTH)]
    pub length: usize,

    /// Monte Carlo games per learning rate; 0 computes the exact expectation
    #[arg(long, short = 'c', default_value_t = 0)]
    pub count: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Evaluate learning rates one after another
    #[arg(long)]
    pub sequential: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Write every simulated game as a JSON line
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Save the report as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Save the report as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn execute(args: SweepArgs) -> Result<()> {
    let shape = ContextShape::new(args.actions, args.depth)?;
    let input = args.input.resolve(args.actions, args.depth, args.length)?;
    let etas = match &args.etas {
        Some(etas) => etas.clone(),
        None => eta_range(args.eta_start, args.eta_end, args.eta_step)?,
    };

    let mut config = ExperimentConfig::new(args.actions, args.depth);
    config.seed = args.seed;
    config.parallel = !args.sequential;

    let metrics = MetricsObserver::new();
    let mut runner = config.runner()?.with_observer(Box::new(metrics.clone()));
    if args.progress {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.jsonl {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        runner = runner.with_observer(Box::new(observer));
    }

    print_section("Learning Rate Sweep");
    print_kv("Shape", &shape.to_string());
    print_kv("Experts", &format_number(shape.expert_count()?));
    print_kv("Input", &args.input.describe());
    print_kv("Input length", &format_number(input.len()));
    print_kv("Learning rates", &format_number(etas.len()));
    if args.count == 0 {
        print_kv("Mode", "exact expectation");
    } else {
        print_kv("Mode", &format!("{} games per rate", format_number(args.count)));
    }
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let report = runner.run(&etas, &input, args.count)?;

    print_report(&report);
    if args.count > 0 {
        let summary = metrics.summary();
        print_subsection("Games");
        print_kv("Total", &format_number(summary.total_games));
        print_kv("User wins", &format_number(summary.user_wins));
        print_kv("Learner wins", &format_number(summary.learner_wins));
        print_kv("Unconcluded", &format_number(summary.unconcluded));
        print_kv("Avg length", &format!("{:.1}", summary.avg_game_length()));
    }

    if let Some(path) = &args.output {
        report
            .save_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nReport saved to {}", path.display());
    }
    if let Some(path) = &args.csv {
        report
            .save_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("CSV saved to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &SweepReport) {
    print_subsection("Results");
    println!(
        "  {:>8} {:>10} {:>10} {:>8} {:>9}",
        "eta", "user", "learner", "rounds", "learner%"
    );
    for point in report.points() {
        println!(
            "  {:>8.3} {:>10.2} {:>10.2} {:>8.1} {:>8.1}%{}",
            point.eta,
            point.user_score,
            point.learner_score,
            point.rounds,
            point.learner_percent,
            if point.concluded { "" } else { "  (input ran out)" }
        );
    }
    if let Some(best) = report.best_for_learner() {
        println!(
            "\n  Best learning rate: {:.3} ({:.1}% learner)",
            best.eta, best.learner_percent
        );
    }
}
