//! Error types for plancal.

use thiserror::Error;

/// Errors that can occur in plancal operations.
#[derive(Error, Debug)]
pub enum PlanCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("{0}")]
    Validation(String),

    #[error("{table} row not found: {id}")]
    NotFound { table: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Wrote {written} of {total} {table} rows before failing: {source}")]
    PartialWrite {
        table: &'static str,
        written: usize,
        total: usize,
        #[source]
        source: Box<PlanCalError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlanCalError {
    fn from(e: serde_json::Error) -> Self {
        PlanCalError::Serialization(e.to_string())
    }
}

/// Result type alias for plancal operations.
pub type PlanCalResult<T> = Result<T, PlanCalError>;
