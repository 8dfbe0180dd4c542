//! Error types for the runner

use thiserror::Error;

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Command failed with status {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },

    #[error("Command output is missing {0:?} section")]
    MissingSection(&'static str),

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error(transparent)]
    Core(#[from] terraspec_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
