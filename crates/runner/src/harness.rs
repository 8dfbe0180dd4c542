//! Harness capability consumed by the tree runner
//!
//! The external test framework is injected through this trait instead of
//! living in ambient globals, so the engine stays runner-agnostic and
//! independently testable.

use async_trait::async_trait;
use tracing::{error, info};

use crate::assert::AssertionError;

/// Result of one executed test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(AssertionError),
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

/// Describe/it capability of an external test framework.
#[async_trait]
pub trait Harness: Send {
    async fn describe_start(&mut self, name: &str);
    async fn describe_end(&mut self, name: &str);
    async fn case(&mut self, name: &str, outcome: &CaseOutcome);
}

/// Every event a harness can observe, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessEvent {
    DescribeStart(String),
    DescribeEnd(String),
    Case {
        name: String,
        passed: bool,
        message: Option<String>,
    },
}

/// Records events for inspection; the harness used by unit tests.
#[derive(Debug, Default)]
pub struct RecordingHarness {
    pub events: Vec<HarnessEvent>,
}

impl RecordingHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HarnessEvent::Case { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Harness for RecordingHarness {
    async fn describe_start(&mut self, name: &str) {
        self.events.push(HarnessEvent::DescribeStart(name.to_string()));
    }

    async fn describe_end(&mut self, name: &str) {
        self.events.push(HarnessEvent::DescribeEnd(name.to_string()));
    }

    async fn case(&mut self, name: &str, outcome: &CaseOutcome) {
        self.events.push(HarnessEvent::Case {
            name: name.to_string(),
            passed: outcome.passed(),
            message: match outcome {
                CaseOutcome::Passed => None,
                CaseOutcome::Failed(e) => Some(e.message.clone()),
            },
        });
    }
}

/// Logs through tracing, indented by describe depth.
#[derive(Debug, Default)]
pub struct ConsoleHarness {
    depth: usize,
}

impl ConsoleHarness {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

#[async_trait]
impl Harness for ConsoleHarness {
    async fn describe_start(&mut self, name: &str) {
        info!("{}{}", self.indent(), name);
        self.depth += 1;
    }

    async fn describe_end(&mut self, _name: &str) {
        self.depth = self.depth.saturating_sub(1);
    }

    async fn case(&mut self, name: &str, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => info!("{}✓ {}", self.indent(), name),
            CaseOutcome::Failed(e) => error!("{}✗ {} - {}", self.indent(), name, e),
        }
    }
}
