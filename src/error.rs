//! Error types for the pennies crate

use thiserror::Error;

/// Main error type for the pennies crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("observer lock poisoned while {context}")]
    ObserverPoisoned { context: String },
}

/// Caller contract violations.
///
/// Every variant is detected before any state is touched, so an operation
/// that returns one of these has had no observable effect.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InvalidArgument {
    #[error("action count {actions} must be at least 2")]
    ActionCount { actions: usize },

    #[error("history depth {depth} must be at least 1")]
    HistoryDepth { depth: usize },

    #[error("learning rate {eta} must be positive and finite")]
    LearningRate { eta: f64 },

    #[error("{actions}^({actions}^{depth}) experts exceeds the limit of {limit}")]
    TooManyExperts {
        actions: usize,
        depth: usize,
        limit: usize,
    },

    #[error("{actions}^{depth} histories need more than {limit} counters")]
    TooManyContexts {
        actions: usize,
        depth: usize,
        limit: usize,
    },

    #[error("action {action} is out of range for {actions} actions")]
    ActionOutOfRange { action: usize, actions: usize },

    #[error("history has {got} actions, expected {expected}")]
    HistoryLength { expected: usize, got: usize },

    #[error("expert index {index} is out of range (only {count} experts)")]
    ExpertIndex { index: u64, count: usize },

    #[error("input sequence is empty")]
    EmptyInput,

    #[error("invalid symbol '{symbol}' at position {position} for {actions} actions")]
    InputSymbol {
        symbol: char,
        position: usize,
        actions: usize,
    },

    #[error("trial count must be at least 1")]
    TrialCount,

    #[error("invalid eta range: start {start}, end {end}, step {step}")]
    EtaRange { start: f64, end: f64, step: f64 },

    #[error("target score must be at least 1")]
    TargetScore,

    #[error("game already over")]
    GameOver,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error is a caller contract violation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
