//! Predicate evaluation
//!
//! Runs a user-supplied predicate against an actual value. Evaluation is pure
//! and idempotent; connection checks never pass through here (the comparator
//! defers them to the runner's async path).

use serde_json::Value;

use crate::expect::{CheckOutcome, Predicate};

/// Detail used when the attribute the predicate targets does not exist.
pub const MISSING_VALUE_DETAIL: &str = "to exist in module, got undefined.";

/// Evaluate a predicate against an optional actual value. Absent values (the
/// key is missing, or the value is JSON null) skip invocation entirely and
/// synthesize a failing outcome.
pub fn evaluate(predicate: &Predicate, value: Option<&Value>) -> CheckOutcome {
    match value {
        None | Some(Value::Null) => CheckOutcome::fail(MISSING_VALUE_DETAIL),
        Some(value) => predicate.invoke(value),
    }
}
