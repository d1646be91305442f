//! CLI subcommands

pub mod adversary;
pub mod play;
pub mod sweep;
pub mod trace;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    experiment::{AdversarySynthesizer, generate_pattern, parse_actions},
    types::Action,
};

/// Where the player's actions come from in offline experiments.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Cyclic pattern of base-n digits, repeated to the input length (e.g. 0110)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Play against the synthesized worst-case sequence
    #[arg(long)]
    pub adversary: bool,

    /// Explicit sequence of base-n digits
    #[arg(long)]
    pub input: Option<String>,
}

impl InputArgs {
    /// Build the input sequence for an `actions`-way game with history `depth`.
    pub fn resolve(&self, actions: usize, depth: usize, length: usize) -> Result<Vec<Action>> {
        if let Some(pattern) = &self.pattern {
            let cycle = parse_actions(pattern, actions).context("invalid --pattern")?;
            return Ok(generate_pattern(&cycle, length)?);
        }
        if let Some(input) = &self.input {
            return parse_actions(input, actions).context("invalid --input");
        }
        if self.adversary {
            let synthesizer = AdversarySynthesizer::new(actions, depth)?.with_length(length);
            return Ok(synthesizer.generate());
        }
        Err(anyhow::anyhow!(
            "one of --pattern, --adversary or --input is required"
        ))
    }

    /// Short description for reports.
    pub fn describe(&self) -> String {
        match (&self.pattern, &self.input) {
            (Some(pattern), _) => format!("pattern {pattern}"),
            (None, Some(_)) => "explicit input".to_string(),
            (None, None) => "adversary".to_string(),
        }
    }
}

