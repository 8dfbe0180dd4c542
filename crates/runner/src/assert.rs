//! Assertion primitives
//!
//! The harness-facing equivalent of an assertion object: each primitive
//! returns `Err` with the stored message instead of throwing. The runner
//! reports failures through the harness; it never panics on a mismatch.

use serde_json::Value;
use thiserror::Error;

use terraspec_core::Check;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    pub message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type AssertResult = Result<(), AssertionError>;

pub fn is_true(actual: bool, message: &str) -> AssertResult {
    if actual {
        Ok(())
    } else {
        Err(AssertionError::new(message))
    }
}

pub fn is_not_false(actual: bool, message: &str) -> AssertResult {
    if actual {
        Ok(())
    } else {
        Err(AssertionError::new(message))
    }
}

pub fn deep_equal(actual: &Value, expected: &Value, message: &str) -> AssertResult {
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::new(format!(
            "{message}: expected {expected}, got {actual}"
        )))
    }
}

/// Dispatch a stored check through the matching primitive.
pub fn run_check(check: &Check, message: &str) -> AssertResult {
    match check {
        Check::IsTrue(actual) => is_true(*actual, message),
        Check::IsNotFalse(actual) => is_not_false(*actual, message),
        Check::DeepEqual { actual, expected } => deep_equal(actual, expected, message),
    }
}
