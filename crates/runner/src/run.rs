//! Test tree runner
//!
//! Depth-first async walk of an assembled test tree. Each subtree is a future
//! awaited to completion before its sibling starts, so registration and
//! execution stay strictly sequential and output order is deterministic.

use futures::future::BoxFuture;
use tracing::{debug, info};

use terraspec_core::{TestCase, TestGroup, TestNode};

use crate::assert::{run_check, AssertionError};
use crate::error::{RunnerError, RunnerResult};
use crate::harness::{CaseOutcome, Harness};

/// Aggregate counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Walks a test tree against an injected harness.
pub struct TreeRunner<H: Harness> {
    harness: H,
    before: Option<BoxFuture<'static, RunnerResult<()>>>,
}

impl<H: Harness> TreeRunner<H> {
    pub fn new(harness: H) -> Self {
        Self {
            harness,
            before: None,
        }
    }

    /// Register a one-shot setup future, awaited ahead of the walk. Setup
    /// failure aborts the run; nothing is registered with the harness.
    pub fn with_before(mut self, setup: BoxFuture<'static, RunnerResult<()>>) -> Self {
        self.before = Some(setup);
        self
    }

    /// Run the whole tree and return aggregate counts. Assertion failures are
    /// reported through the harness, never raised.
    pub async fn run(&mut self, node: &TestNode) -> RunnerResult<RunSummary> {
        if let Some(setup) = self.before.take() {
            debug!("Running setup");
            setup
                .await
                .map_err(|e| RunnerError::Setup(e.to_string()))?;
        }

        let mut summary = RunSummary::default();
        self.walk(node, &mut summary).await;

        info!(
            "Test results: {} passed, {} failed ({} total)",
            summary.passed, summary.failed, summary.total
        );
        Ok(summary)
    }

    /// Recover the harness (with whatever it recorded) after a run.
    pub fn into_harness(self) -> H {
        self.harness
    }

    fn walk<'a>(
        &'a mut self,
        node: &'a TestNode,
        summary: &'a mut RunSummary,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            match node {
                TestNode::Case(case) => self.run_case(case, summary).await,
                TestNode::Group(group) => self.run_group(group, summary).await,
            }
        })
    }

    async fn run_group(&mut self, group: &TestGroup, summary: &mut RunSummary) {
        self.harness.describe_start(&group.describe).await;

        // Connection tests go first, in their own nested describe block,
        // through the async path.
        if !group.connection_tests.is_empty() {
            let describe = format!("{} connection tests", group.describe);
            self.harness.describe_start(&describe).await;
            for test in &group.connection_tests {
                let outcome = match test.check.run(test.arg.clone()).await {
                    Ok(()) => CaseOutcome::Passed,
                    Err(reason) => CaseOutcome::Failed(AssertionError::new(reason)),
                };
                summary.record(outcome.passed());
                self.harness.case(&test.name, &outcome).await;
            }
            self.harness.describe_end(&describe).await;
        }

        for child in &group.tests {
            self.walk(child, summary).await;
        }

        self.harness.describe_end(&group.describe).await;
    }

    async fn run_case(&mut self, case: &TestCase, summary: &mut RunSummary) {
        let outcome = match run_check(&case.check, &case.message) {
            Ok(()) => CaseOutcome::Passed,
            Err(e) => CaseOutcome::Failed(e),
        };
        summary.record(outcome.passed());
        self.harness.case(&case.name, &outcome).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{HarnessEvent, RecordingHarness};
    use serde_json::json;
    use terraspec_core::{ConnectionCheck, ConnectionTest};

    fn leaf(name: &str, passes: bool) -> TestNode {
        TestNode::Case(TestCase::is_true(name, passes, format!("{name} message")))
    }

    #[tokio::test]
    async fn test_walk_is_depth_first_and_ordered() {
        let mut inner = TestGroup::new("inner");
        inner.push(leaf("b", true));

        let mut outer = TestGroup::new("outer");
        outer.push(leaf("a", true));
        outer.push(TestNode::Group(inner));
        outer.push(leaf("c", false));

        let mut runner = TreeRunner::new(RecordingHarness::new());
        let summary = runner.run(&TestNode::Group(outer)).await.unwrap();

        assert_eq!(summary, RunSummary { total: 3, passed: 2, failed: 1 });

        let harness = runner.into_harness();
        assert_eq!(harness.case_names(), ["a", "b", "c"]);
        assert_eq!(
            harness.events.first(),
            Some(&HarnessEvent::DescribeStart("outer".to_string()))
        );
        assert_eq!(
            harness.events.last(),
            Some(&HarnessEvent::DescribeEnd("outer".to_string()))
        );
    }

    #[tokio::test]
    async fn test_failure_message_is_reported() {
        let node = TestNode::Case(TestCase::deep_equal(
            "value",
            json!(1),
            json!(2),
            "x should equal 2",
        ));

        let mut runner = TreeRunner::new(RecordingHarness::new());
        runner.run(&node).await.unwrap();

        let harness = runner.into_harness();
        match &harness.events[0] {
            HarnessEvent::Case { passed, message, .. } => {
                assert!(!passed);
                assert_eq!(
                    message.as_deref(),
                    Some("x should equal 2: expected 2, got 1")
                );
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_tests_run_first_in_dedicated_block() {
        let mut group = TestGroup::new("resource web");
        group.push(leaf("a", true));
        group.connection_tests.push(ConnectionTest {
            name: "ping host".to_string(),
            arg: json!("10.0.0.1"),
            check: ConnectionCheck::new("ping host", |arg| {
                Box::pin(async move {
                    if arg == json!("10.0.0.1") {
                        Ok(())
                    } else {
                        Err(format!("unreachable: {arg}"))
                    }
                })
            }),
        });

        let mut runner = TreeRunner::new(RecordingHarness::new());
        let summary = runner.run(&TestNode::Group(group)).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 0);

        let harness = runner.into_harness();
        assert_eq!(
            harness.events[..3],
            [
                HarnessEvent::DescribeStart("resource web".to_string()),
                HarnessEvent::DescribeStart("resource web connection tests".to_string()),
                HarnessEvent::Case {
                    name: "ping host".to_string(),
                    passed: true,
                    message: None
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_probe_is_a_failing_case() {
        let mut group = TestGroup::new("resource web");
        group.connection_tests.push(ConnectionTest {
            name: "udp 53".to_string(),
            arg: json!("10.0.0.9"),
            check: ConnectionCheck::new("udp 53", |arg| {
                Box::pin(async move { Err(format!("no route to {arg}")) })
            }),
        });

        let mut runner = TreeRunner::new(RecordingHarness::new());
        let summary = runner.run(&TestNode::Group(group)).await.unwrap();
        assert_eq!(summary.failed, 1);

        let harness = runner.into_harness();
        match &harness.events[2] {
            HarnessEvent::Case { message, .. } => {
                assert_eq!(message.as_deref(), Some("no route to \"10.0.0.9\""));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_before_runs_ahead_of_walk() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let mut runner = TreeRunner::new(RecordingHarness::new()).with_before(Box::pin(
            async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
        ));
        runner.run(&leaf("a", true)).await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failing_before_aborts_run() {
        let mut runner = TreeRunner::new(RecordingHarness::new()).with_before(Box::pin(
            async { Err(RunnerError::Setup("plan command failed".to_string())) },
        ));
        let err = runner.run(&leaf("a", true)).await.unwrap_err();
        assert!(err.to_string().contains("plan command failed"));

        // nothing was registered
        assert!(runner.into_harness().events.is_empty());
    }
}
