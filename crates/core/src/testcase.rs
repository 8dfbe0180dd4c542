//! Test case records and the assembled test tree
//!
//! Built bottom-up by the assembler, consumed top-down by the runner. Nothing
//! here is mutated after assembly completes.

use std::fmt;

use serde_json::Value;

use crate::expect::ConnectionCheck;

/// Assertion kind with its ordered arguments (actual before expected).
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    IsTrue(bool),
    IsNotFalse(bool),
    DeepEqual { actual: Value, expected: Value },
}

/// One uniform test case: a name for the runner, the assertion to perform,
/// and the human-readable message reported on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub check: Check,
    pub message: String,
}

impl TestCase {
    pub fn is_true(name: impl Into<String>, actual: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check: Check::IsTrue(actual),
            message: message.into(),
        }
    }

    pub fn is_not_false(
        name: impl Into<String>,
        actual: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            check: Check::IsNotFalse(actual),
            message: message.into(),
        }
    }

    pub fn deep_equal(
        name: impl Into<String>,
        actual: Value,
        expected: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            check: Check::DeepEqual { actual, expected },
            message: message.into(),
        }
    }

    /// Whether the stored assertion holds.
    pub fn passes(&self) -> bool {
        match &self.check {
            Check::IsTrue(actual) | Check::IsNotFalse(actual) => *actual,
            Check::DeepEqual { actual, expected } => actual == expected,
        }
    }
}

/// A node in the assembled test tree.
#[derive(Debug, Clone)]
pub enum TestNode {
    Case(TestCase),
    Group(TestGroup),
}

impl TestNode {
    /// Flattened view of every leaf case, depth-first. Connection tests are
    /// not included; they run on the async path.
    pub fn cases(&self) -> Vec<&TestCase> {
        let mut cases = Vec::new();
        self.collect_cases(&mut cases);
        cases
    }

    fn collect_cases<'a>(&'a self, out: &mut Vec<&'a TestCase>) {
        match self {
            TestNode::Case(case) => out.push(case),
            TestNode::Group(group) => {
                for child in &group.tests {
                    child.collect_cases(out);
                }
            }
        }
    }
}

/// A describe block with ordered children and any deferred connection tests
/// collected from its subtree during assembly.
#[derive(Debug, Clone, Default)]
pub struct TestGroup {
    pub describe: String,
    pub tests: Vec<TestNode>,
    pub connection_tests: Vec<ConnectionTest>,
}

impl TestGroup {
    pub fn new(describe: impl Into<String>) -> Self {
        Self {
            describe: describe.into(),
            tests: Vec::new(),
            connection_tests: Vec::new(),
        }
    }

    pub fn push(&mut self, node: TestNode) {
        self.tests.push(node);
    }

    pub fn push_case(&mut self, case: TestCase) {
        self.tests.push(TestNode::Case(case));
    }
}

/// Deferred connection test: the probe plus the actual value captured for it.
#[derive(Clone)]
pub struct ConnectionTest {
    pub name: String,
    pub arg: Value,
    pub check: ConnectionCheck,
}

impl fmt::Debug for ConnectionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTest")
            .field("name", &self.name)
            .field("arg", &self.arg)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pass_semantics() {
        assert!(TestCase::is_true("t", true, "m").passes());
        assert!(!TestCase::is_not_false("t", false, "m").passes());
        assert!(TestCase::deep_equal("t", json!(3), json!(3), "m").passes());
        assert!(!TestCase::deep_equal("t", json!([1]), json!([2]), "m").passes());
    }

    #[test]
    fn test_cases_flattening_is_depth_first() {
        let mut inner = TestGroup::new("inner");
        inner.push_case(TestCase::is_true("b", true, "m"));

        let mut outer = TestGroup::new("outer");
        outer.push_case(TestCase::is_true("a", true, "m"));
        outer.push(TestNode::Group(inner));
        outer.push_case(TestCase::is_true("c", true, "m"));

        let node = TestNode::Group(outer);
        let names: Vec<&str> = node
            .cases()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
