//! Rules of the supported guessing games.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::types::{Action, Side};

/// A repeated two-player guessing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    /// Heads (0) or tails (1); the learner scores by matching the user.
    MatchingPennies,
    /// Rock (0), paper (1) or scissors (2); the learner scores by beating the
    /// user, the user by beating the learner, anything else is a tie.
    RockPaperScissors,
}

impl GameKind {
    /// Number of actions.
    pub fn actions(self) -> usize {
        match self {
            GameKind::MatchingPennies => 2,
            GameKind::RockPaperScissors => 3,
        }
    }

    /// History depth used by the interactive game.
    pub fn default_depth(self) -> usize {
        match self {
            GameKind::MatchingPennies => 3,
            GameKind::RockPaperScissors => 2,
        }
    }

    /// Display name of an action.
    pub fn action_name(self, action: Action) -> &'static str {
        match (self, action) {
            (GameKind::MatchingPennies, 0) => "heads",
            (GameKind::MatchingPennies, 1) => "tails",
            (GameKind::RockPaperScissors, 0) => "rock",
            (GameKind::RockPaperScissors, 1) => "paper",
            (GameKind::RockPaperScissors, 2) => "scissors",
            _ => "?",
        }
    }

    /// Parse a typed action: its name, first letter, or index.
    pub fn parse_action(self, text: &str) -> Option<Action> {
        let text = text.trim().to_ascii_lowercase();
        (0..self.actions()).find(|&action| {
            let name = self.action_name(action);
            text == name || text == name[..1] || text == action.to_string()
        })
    }

    /// The action that beats `action` (rock-paper-scissors cycle).
    pub fn beats(self, action: Action) -> Action {
        (action + 1) % self.actions()
    }

    /// What the learner is trained on after the user plays `user_action`.
    ///
    /// In matching pennies the learner must match the user, so it learns the
    /// user's action itself. In rock-paper-scissors it learns the move that
    /// would have beaten the user, so its prediction is directly its play.
    pub fn learner_target(self, user_action: Action) -> Action {
        match self {
            GameKind::MatchingPennies => user_action,
            GameKind::RockPaperScissors => self.beats(user_action),
        }
    }

    /// Who takes the round, `None` on a tie.
    pub fn judge(self, prediction: Action, user_action: Action) -> Option<Side> {
        match self {
            GameKind::MatchingPennies if prediction == user_action => Some(Side::Learner),
            GameKind::MatchingPennies => Some(Side::User),
            GameKind::RockPaperScissors if prediction == self.beats(user_action) => {
                Some(Side::Learner)
            }
            GameKind::RockPaperScissors if user_action == self.beats(prediction) => {
                Some(Side::User)
            }
            GameKind::RockPaperScissors => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::MatchingPennies => write!(f, "matching pennies"),
            GameKind::RockPaperScissors => write!(f, "rock-paper-scissors"),
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pennies" | "matching-pennies" => Ok(GameKind::MatchingPennies),
            "rps" | "rock-paper-scissors" => Ok(GameKind::RockPaperScissors),
            other => Err(format!(
                "unknown game '{other}'. Expected one of: pennies, rps"
            )),
        }
    }
}
