//! Attribute comparison
//!
//! Compares an expectation map against an actual attribute object, producing
//! one test case per declared key. Three value kinds are handled: literals,
//! predicates, and nested blocks behind the single-element-array-of-map
//! collapsing rule. Mismatches are failing test cases, never errors.

use serde_json::{Map, Value};

use crate::expect::{Expect, ExpectMap};
use crate::message::MessageContext;
use crate::predicate;
use crate::testcase::{ConnectionTest, TestCase};

/// Output of one comparator pass: ordinary cases plus deferred connection
/// tests surfaced for the runner's async path.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub tests: Vec<TestCase>,
    pub connection_tests: Vec<ConnectionTest>,
}

/// Compare every declared key against `data`, in declaration order.
pub fn compare_attributes(
    ctx: &MessageContext,
    values: &ExpectMap,
    data: &Map<String, Value>,
) -> Comparison {
    let mut out = Comparison::default();
    for (key, expect) in values {
        compare_key(ctx, key, expect, data, &mut out);
    }
    out
}

fn compare_key(
    ctx: &MessageContext,
    key: &str,
    expect: &Expect,
    data: &Map<String, Value>,
    out: &mut Comparison,
) {
    let Some(actual) = data.get(key) else {
        // Fails informatively instead of aborting the run
        out.tests.push(TestCase::is_not_false(
            format!("should contain {}", ctx.label(key)),
            false,
            ctx.missing_key(key),
        ));
        return;
    };

    match expect {
        Expect::Check(check) => {
            let outcome = predicate::evaluate(check, Some(actual));
            out.tests.push(TestCase::is_true(
                format!("should satisfy check for {}", ctx.label(key)),
                outcome.expected,
                ctx.predicate(key, &outcome.detail),
            ));
        }
        Expect::Connection(check) => {
            out.connection_tests.push(ConnectionTest {
                name: check.name.clone(),
                arg: actual.clone(),
                check: check.clone(),
            });
        }
        Expect::Block(nested) => match single_block(actual) {
            Some(inner) => {
                out.tests.push(TestCase::is_not_false(
                    format!("should contain {}", ctx.label(key)),
                    true,
                    ctx.missing_key(key),
                ));
                let nested_ctx = ctx.nested(key);
                let inner_comparison = compare_attributes(&nested_ctx, nested, inner);
                out.tests.extend(inner_comparison.tests);
                out.connection_tests.extend(inner_comparison.connection_tests);
            }
            None => {
                out.tests.push(TestCase::is_not_false(
                    format!("should contain a nested block in {}", ctx.label(key)),
                    false,
                    ctx.block(key),
                ));
            }
        },
        Expect::Value(expected) => {
            out.tests.push(TestCase::deep_equal(
                format!("should have correct value for {}", ctx.label(key)),
                actual.clone(),
                expected.clone(),
                ctx.equals(key, expected),
            ));
        }
    }
}

/// The collapsing heuristic: exactly one element AND that element is a map.
/// A longer array, or a single non-map element, never collapses.
fn single_block(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Array(items) if items.len() == 1 => items[0].as_object(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::CheckOutcome;
    use crate::message::Mode;
    use crate::testcase::Check;
    use indexmap::IndexMap;
    use serde_json::json;

    fn ctx() -> MessageContext {
        MessageContext::new(Mode::Plan, "null_resource.web")
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_literal_match_produces_deep_equal() {
        let values: ExpectMap = IndexMap::from([("x".to_string(), Expect::value(3))]);
        let out = compare_attributes(&ctx(), &values, &data(json!({"x": 3})));

        assert_eq!(out.tests.len(), 1);
        let case = &out.tests[0];
        assert_eq!(
            case.check,
            Check::DeepEqual {
                actual: json!(3),
                expected: json!(3)
            }
        );
        assert!(case.message.contains('x'));
        assert!(case.passes());
    }

    #[test]
    fn test_missing_key_produces_failing_is_not_false() {
        let values: ExpectMap = IndexMap::from([("y".to_string(), Expect::value(1))]);
        let out = compare_attributes(&ctx(), &values, &data(json!({"x": 3})));

        assert_eq!(out.tests.len(), 1);
        let case = &out.tests[0];
        assert_eq!(case.check, Check::IsNotFalse(false));
        assert!(case.message.contains('y'));
        assert!(!case.passes());
    }

    #[test]
    fn test_predicate_wrapped_as_is_true() {
        let values: ExpectMap = IndexMap::from([(
            "x".to_string(),
            Expect::check(|v| {
                if v == &json!(3) {
                    CheckOutcome::pass("to equal three.")
                } else {
                    CheckOutcome::fail("to equal three.")
                }
            }),
        )]);
        let out = compare_attributes(&ctx(), &values, &data(json!({"x": 3})));

        assert_eq!(out.tests.len(), 1);
        assert_eq!(out.tests[0].check, Check::IsTrue(true));
        assert_eq!(
            out.tests[0].message,
            "expected null_resource.web.x to equal three."
        );
    }

    #[test]
    fn test_single_element_block_collapses_once() {
        let values: ExpectMap = IndexMap::from([(
            "network".to_string(),
            Expect::block([
                ("cidr".to_string(), Expect::value("10.0.0.0/16")),
                ("nat".to_string(), Expect::value(true)),
            ]),
        )]);
        let out = compare_attributes(
            &ctx(),
            &values,
            &data(json!({"network": [{"cidr": "10.0.0.0/16", "nat": false}]})),
        );

        // presence test followed by exactly one case per nested key
        assert_eq!(out.tests.len(), 3);
        assert_eq!(out.tests[0].check, Check::IsNotFalse(true));
        assert_eq!(out.tests[1].name, "should have correct value for network[0].cidr");
        assert!(out.tests[1].passes());
        assert_eq!(out.tests[2].name, "should have correct value for network[0].nat");
        assert!(!out.tests[2].passes());
    }

    #[test]
    fn test_two_element_array_does_not_collapse() {
        let values: ExpectMap = IndexMap::from([(
            "network".to_string(),
            Expect::block([("cidr".to_string(), Expect::value("10.0.0.0/16"))]),
        )]);
        let out = compare_attributes(
            &ctx(),
            &values,
            &data(json!({"network": [{"cidr": "a"}, {"cidr": "b"}]})),
        );

        assert_eq!(out.tests.len(), 1);
        assert_eq!(out.tests[0].check, Check::IsNotFalse(false));
        assert!(out.tests[0].message.contains("nested block"));
    }

    #[test]
    fn test_literal_array_of_one_map_is_not_collapsed() {
        // Literal expectations bypass the heuristic entirely: the author asked
        // for a whole-value comparison.
        let values: ExpectMap = IndexMap::from([(
            "network".to_string(),
            Expect::value(json!([{"cidr": "10.0.0.0/16"}])),
        )]);
        let out = compare_attributes(
            &ctx(),
            &values,
            &data(json!({"network": [{"cidr": "10.0.0.0/16"}]})),
        );

        assert_eq!(out.tests.len(), 1);
        assert!(matches!(out.tests[0].check, Check::DeepEqual { .. }));
        assert!(out.tests[0].passes());
    }

    #[test]
    fn test_connection_check_is_deferred() {
        use crate::expect::ConnectionCheck;

        let check = ConnectionCheck::new("ping host", |_arg| Box::pin(async { Ok(()) }));
        let values: ExpectMap =
            IndexMap::from([("host".to_string(), Expect::Connection(check))]);
        let out = compare_attributes(&ctx(), &values, &data(json!({"host": "10.0.0.1"})));

        assert!(out.tests.is_empty());
        assert_eq!(out.connection_tests.len(), 1);
        assert_eq!(out.connection_tests[0].name, "ping host");
        assert_eq!(out.connection_tests[0].arg, json!("10.0.0.1"));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let values: ExpectMap = IndexMap::from([
            ("z".to_string(), Expect::value(1)),
            ("a".to_string(), Expect::value(2)),
            ("m".to_string(), Expect::value(3)),
        ]);
        let out = compare_attributes(&ctx(), &values, &data(json!({"z": 1, "a": 2, "m": 3})));

        let names: Vec<&str> = out.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "should have correct value for z",
                "should have correct value for a",
                "should have correct value for m"
            ]
        );
    }
}
