//! Trace command - Round-by-round expectation of a single game

use anyhow::Result;
use clap::Parser;

use super::InputArgs;
use crate::{
    cli::output::{format_percent, print_kv, print_section, print_subsection},
    experiment::{DEFAULT_INPUT_LENGTH, ExperimentRunner, SimulatedScore},
};

#[derive(Parser, Debug)]
#[command(about = "Print the expected learner win probability per round")]
pub struct TraceArgs {
    /// Number of actions n
    #[arg(long, short = 'n', default_value_t = 2)]
    pub actions: usize,

    /// History depth h
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.5)]
    pub eta: f64,

    #[command(flatten)]
    pub input: InputArgs,

    /// Length of generated input (--pattern, --adversary)
    #[arg(long, default_value_t = DEFAULT_INPUT_LENGTH)]
    pub length: usize,

    /// Keep printing rounds after the expected game has ended
    #[arg(long)]
    pub all: bool,
}

pub fn execute(args: TraceArgs) -> Result<()> {
    let input = args.input.resolve(args.actions, args.depth, args.length)?;
    let runner = ExperimentRunner::new(args.actions, args.depth)?;
    let trace = runner.simulate_trace(args.eta, &input)?;

    print_section("Expectation Trace");
    print_kv("Shape", &runner.shape().to_string());
    print_kv("Learning rate", &args.eta.to_string());
    print_kv("Input", &args.input.describe());

    print_subsection("Rounds");
    println!(
        "  {:>6} {:>7} {:>10} {:>10} {:>10}",
        "round", "action", "P(learner)", "E[user]", "E[learner]"
    );
    let last = match (args.all, trace.stop_round) {
        (false, Some(stop)) => stop + 1,
        _ => trace.learner_win.len(),
    };
    for (round, &action) in input.iter().enumerate().take(last) {
        println!(
            "  {:>6} {:>7} {:>10.4} {:>10.2} {:>10.2}{}",
            round,
            action,
            trace.learner_win[round],
            trace.user_scores[round],
            trace.learner_scores[round],
            if round < trace.warm_up { "  (warm-up)" } else { "" }
        );
    }

    print_subsection("Outcome");
    match trace.outcome() {
        SimulatedScore::Concluded {
            rounds,
            user,
            learner,
        } => {
            print_kv("Rounds", &rounds.to_string());
            print_kv("Expected user", &format!("{user:.2}"));
            print_kv("Expected learner", &format!("{learner:.2}"));
            print_kv("Learner share", &format_percent(learner / (user + learner)));
        }
        SimulatedScore::Unconcluded { user, learner } => {
            println!("  Input ran out before either side reached the target.");
            print_kv("Expected user", &format!("{user:.2}"));
            print_kv("Expected learner", &format!("{learner:.2}"));
        }
    }
    print_kv(
        "Expected mistakes",
        &format!("{:.2}", trace.expected_mistakes()),
    );

    Ok(())
}
