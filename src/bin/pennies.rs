//! pennies CLI - Context-tree expert ensemble for repeated guessing games
//!
//! This CLI provides a unified interface for:
//! - Playing matching pennies or rock-paper-scissors against the learner
//! - Sweeping learning rates against fixed or adversarial input
//! - Synthesizing the worst-case input for a history depth
//! - Tracing the expected outcome of a single game round by round

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pennies")]
#[command(version, about = "Expert ensemble for repeated guessing games", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively against the learner
    Play(pennies::cli::commands::play::PlayArgs),

    /// Evaluate learning rates against a fixed input
    Sweep(Box<pennies::cli::commands::sweep::SweepArgs>),

    /// Print the greedy balancing adversary
    Adversary(pennies::cli::commands::adversary::AdversaryArgs),

    /// Print the per-round expectation of one game
    Trace(pennies::cli::commands::trace::TraceArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Play(args) => pennies::cli::commands::play::execute(args),
        Commands::Sweep(args) => pennies::cli::commands::sweep::execute(*args),
        Commands::Adversary(args) => pennies::cli::commands::adversary::execute(args),
        Commands::Trace(args) => pennies::cli::commands::trace::execute(args),
    }
}
