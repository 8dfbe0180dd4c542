//! Deterministic assertion messages
//!
//! Downstream consumers match on message text, so every message is derived
//! mechanically from the comparison context. No free-form formatting anywhere
//! else in the engine.

use serde_json::Value;

/// Which artifact the comparison runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Plan,
    State,
}

impl Mode {
    fn noun(self) -> &'static str {
        match self {
            Mode::Plan => "plan",
            Mode::State => "state",
        }
    }
}

/// Context a comparator invocation carries: resource address, optional
/// instance index, and the attribute being recursed into after a
/// single-element collapse.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub mode: Mode,
    pub address: String,
    pub attribute: Option<String>,
    pub index: Option<String>,
}

impl MessageContext {
    pub fn new(mode: Mode, address: impl Into<String>) -> Self {
        Self {
            mode,
            address: address.into(),
            attribute: None,
            index: None,
        }
    }

    pub fn with_index(mut self, key: &str) -> Self {
        self.index = Some(key.to_string());
        self
    }

    /// Context for recursing into a collapsed `attribute[0]` block.
    pub fn nested(&self, attribute: &str) -> Self {
        Self {
            mode: self.mode,
            address: self.address.clone(),
            attribute: Some(attribute.to_string()),
            index: self.index.clone(),
        }
    }

    /// Short key label used in test names: `key`, or `attribute[0].key`
    /// inside a collapsed block.
    pub fn label(&self, key: &str) -> String {
        match &self.attribute {
            Some(attribute) => format!("{attribute}[0].{key}"),
            None => key.to_string(),
        }
    }

    /// Full subject of an assertion: address, instance index, collapsed
    /// attribute, then key.
    pub fn subject(&self, key: &str) -> String {
        let mut subject = self.address.clone();
        if let Some(index) = &self.index {
            subject.push_str(&format!("[{index}]"));
        }
        subject.push('.');
        subject.push_str(&self.label(key));
        subject
    }

    pub fn missing_key(&self, key: &str) -> String {
        format!(
            "{} should be present in {} values",
            self.subject(key),
            self.mode.noun()
        )
    }

    pub fn predicate(&self, key: &str, detail: &str) -> String {
        format!("expected {} {}", self.subject(key), detail)
    }

    pub fn equals(&self, key: &str, expected: &Value) -> String {
        format!("{} should equal {}", self.subject(key), render(expected))
    }

    pub fn block(&self, key: &str) -> String {
        format!(
            "{} should contain a single nested block",
            self.subject(key)
        )
    }
}

/// Canonical rendering of an expected value: compact JSON for everything,
/// which keeps primitives readable and non-primitives unambiguous.
fn render(expected: &Value) -> String {
    expected.to_string()
}
