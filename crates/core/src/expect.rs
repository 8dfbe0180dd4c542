//! Expectation trees
//!
//! User-authored expectations mirror the shape being tested. Every expected
//! value is a tagged variant resolved at authoring time - the comparator never
//! sniffs function shapes at runtime.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;

/// Ordered attribute expectations. Declaration order drives test output order.
pub type ExpectMap = IndexMap<String, Expect>;

/// An expected value for one attribute key.
#[derive(Debug, Clone)]
pub enum Expect {
    /// Literal value, compared with deepEqual semantics.
    Value(Value),

    /// Synchronous predicate invoked against the actual value.
    Check(Predicate),

    /// Asynchronous reachability probe, deferred to the runner's
    /// connection-test path instead of being invoked inline.
    Connection(ConnectionCheck),

    /// Nested attribute expectations; drives the single-element-array-of-map
    /// collapsing rule used by state representations.
    Block(ExpectMap),
}

impl Expect {
    pub fn value(value: impl Into<Value>) -> Self {
        Expect::Value(value.into())
    }

    pub fn check(func: impl Fn(&Value) -> CheckOutcome + Send + Sync + 'static) -> Self {
        Expect::Check(Predicate::new(func))
    }

    pub fn block(entries: impl IntoIterator<Item = (String, Expect)>) -> Self {
        Expect::Block(entries.into_iter().collect())
    }
}

impl From<Value> for Expect {
    fn from(value: Value) -> Self {
        Expect::Value(value)
    }
}

/// Result contract for predicate functions: did the actual value match, and
/// what to append to the assertion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub expected: bool,
    pub detail: String,
}

impl CheckOutcome {
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            expected: true,
            detail: detail.into(),
        }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            expected: false,
            detail: detail.into(),
        }
    }
}

type PredicateFn = dyn Fn(&Value) -> CheckOutcome + Send + Sync;

/// A user-supplied synchronous predicate.
#[derive(Clone)]
pub struct Predicate {
    func: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new(func: impl Fn(&Value) -> CheckOutcome + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }

    pub(crate) fn invoke(&self, value: &Value) -> CheckOutcome {
        (self.func)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

type ProbeFn =
    dyn Fn(Value) -> BoxFuture<'static, std::result::Result<(), String>> + Send + Sync;

/// A named asynchronous connectivity probe (ping, UDP, ...). The comparator
/// never runs these; it surfaces them as connection-test descriptors for the
/// runner's async path.
#[derive(Clone)]
pub struct ConnectionCheck {
    pub name: String,
    probe: Arc<ProbeFn>,
}

impl ConnectionCheck {
    pub fn new(
        name: impl Into<String>,
        probe: impl Fn(Value) -> BoxFuture<'static, std::result::Result<(), String>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            probe: Arc::new(probe),
        }
    }

    /// Run the probe against the captured actual value.
    pub async fn run(&self, arg: Value) -> std::result::Result<(), String> {
        (self.probe)(arg).await
    }
}

impl fmt::Debug for ConnectionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
