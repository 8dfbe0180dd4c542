//! Error types for the comparison engine

use thiserror::Error;

/// Result type alias using the engine Error
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types
///
/// Everything here is a configuration error: the plan/state document or an
/// address is unusable, so downstream tests would be meaningless. Expectation
/// mismatches are never errors - they become failing test cases instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    #[error("Malformed state: {0}")]
    MalformedState(String),

    #[error("Malformed address {address:?}: {reason}")]
    MalformedAddress { address: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
