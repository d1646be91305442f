//! Play command - Interactive game against the expert ensemble

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::LearnerConfig,
    cli::output::{format_number, print_kv, print_section},
    game::{GameKind, RoundResult, Session},
    ports::{Learner, UniformLearner},
    types::Side,
};

#[derive(Parser, Debug)]
#[command(about = "Play against the learner on the terminal")]
pub struct PlayArgs {
    /// Game to play (pennies, rps)
    #[arg(long, short = 'g', default_value = "pennies")]
    pub game: GameKind,

    /// History depth h (defaults to the game's preset)
    #[arg(long, short = 'd')]
    pub depth: Option<usize>,

    /// Learning rate
    #[arg(long)]
    pub eta: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Load learner settings from a JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Play against a uniform random guesser instead
    #[arg(long)]
    pub uniform: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let kind = args.game;
    let mut config = match &args.config {
        Some(path) => LearnerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => LearnerConfig::for_game(kind),
    };
    if let Some(depth) = args.depth {
        config = config.with_depth(depth);
    }
    if let Some(eta) = args.eta {
        config = config.with_eta(eta);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if config.actions != kind.actions() {
        return Err(anyhow::anyhow!(
            "config is for {} actions but {kind} has {}",
            config.actions,
            kind.actions()
        ));
    }

    let learner: Box<dyn Learner> = if args.uniform {
        Box::new(UniformLearner::new(kind.actions(), config.seed)?)
    } else {
        Box::new(config.build()?)
    };
    let mut session = Session::new(kind, learner)?;

    print_section(&format!("Playing {kind}"));
    print_kv("Opponent", session.learner_name());
    print_kv("First to", &session.target_score().to_string());
    println!("\nEnter {} (q to quit).", action_hint(kind));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.is_over() {
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;
        let Some(line) = lines.next() else { break };
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        let Some(action) = session.kind().parse_action(line) else {
            println!("Unknown move '{line}'. Enter {}.", action_hint(kind));
            continue;
        };
        let result = session.play(action)?;
        print_round(session.kind(), &result);
    }

    let (user, learner) = session.scores();
    print_section("Final Score");
    print_kv("Rounds", &format_number(session.rounds().len()));
    print_kv("You", &user.to_string());
    print_kv("Learner", &learner.to_string());
    match session.winner() {
        Some(Side::User) => println!("\nYou win!"),
        Some(Side::Learner) => println!("\nThe learner wins."),
        None => println!("\nGame abandoned."),
    }
    Ok(())
}

fn action_hint(kind: GameKind) -> String {
    (0..kind.actions())
        .map(|action| {
            let name = kind.action_name(action);
            format!("{name} ({}/{action})", &name[..1])
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_round(kind: GameKind, result: &RoundResult) {
    let verdict = match result.winner {
        Some(Side::User) => "you score",
        Some(Side::Learner) => "learner scores",
        None => "tie",
    };
    println!(
        "  you: {:<8} learner: {:<8} {:<15} [{} : {}]",
        kind.action_name(result.user_action),
        kind.action_name(result.prediction),
        verdict,
        result.user_score,
        result.learner_score
    );
}
