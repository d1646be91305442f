//! Adversary command - Print the worst-case input for a history depth

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    experiment::{AdversarySynthesizer, DEFAULT_INPUT_LENGTH, format_actions},
    types::ContextShape,
};

#[derive(Parser, Debug)]
#[command(about = "Synthesize the greedy balancing adversary")]
pub struct AdversaryArgs {
    /// Number of actions n
    #[arg(long, short = 'n', default_value_t = 2)]
    pub actions: usize,

    /// History depth h
    #[arg(long, short = 'd', default_value_t = 3)]
    pub depth: usize,

    /// Sequence length, including the leading history
    #[arg(long, default_value_t = DEFAULT_INPUT_LENGTH)]
    pub length: usize,

    /// Also print how often each action followed each history
    #[arg(long)]
    pub counts: bool,
}

pub fn execute(args: AdversaryArgs) -> Result<()> {
    let shape = ContextShape::new(args.actions, args.depth)?;
    let sequence = AdversarySynthesizer::new(args.actions, args.depth)?
        .with_length(args.length)
        .generate_with_counts();

    if !args.counts {
        println!("{}", format_actions(&sequence.actions));
        return Ok(());
    }

    print_section("Adversarial Sequence");
    print_kv("Shape", &shape.to_string());
    print_kv("Length", &sequence.actions.len().to_string());
    print_kv("Max imbalance", &sequence.max_imbalance().to_string());
    println!("\n{}", format_actions(&sequence.actions));

    print_subsection("Counts per history");
    for (context, row) in sequence.counts.iter().enumerate() {
        let history = format_actions(&shape.history_of(context));
        let counts = row
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {history:>8}  {counts}");
    }

    Ok(())
}
