//! Module/resource test assembly
//!
//! Orchestrates the locator and comparator to build a full nested test tree
//! for one module's declared resources (plan mode) or one state's declared
//! instances (state mode). The tree shape is stable regardless of lookup
//! success: a missing module still yields the declared resource existence
//! tests, just failing ones.

use serde_json::{json, Value};

use crate::address::ModuleAddress;
use crate::compare::compare_attributes;
use crate::error::Result;
use crate::expect::ExpectMap;
use crate::locate::{lookup_module, ModuleLookup};
use crate::message::{MessageContext, Mode};
use crate::plan::Plan;
use crate::state::State;
use crate::testcase::{TestCase, TestGroup, TestNode};

/// Declared expectations for one planned resource.
#[derive(Debug, Clone)]
pub struct ResourceExpectation {
    pub name: String,
    pub address: String,
    pub values: ExpectMap,
}

/// Declared expectations for one state resource and its instances.
#[derive(Debug, Clone)]
pub struct StateExpectation {
    pub name: String,
    pub address: String,
    pub instances: Vec<InstanceExpectation>,
}

/// Expectations for one instance, resolved by key (index_key equality first,
/// positional fallback second).
#[derive(Debug, Clone)]
pub struct InstanceExpectation {
    pub key: String,
    pub values: ExpectMap,
}

/// Build the test tree for one module of a plan.
pub fn build_module_test(
    plan: &Plan,
    module_address: &str,
    resources: &[ResourceExpectation],
) -> Result<TestNode> {
    let target = ModuleAddress::parse(module_address)?;
    let lookup = lookup_module(plan, &target);

    let mut group = TestGroup::new(format!("Module {module_address}"));
    group.push_case(TestCase::is_true(
        "should exist in plan",
        lookup.found,
        format!("module {module_address} should exist in plan"),
    ));

    for expectation in resources {
        group.push(build_resource_test(&lookup, module_address, expectation));
    }

    if let Some(module) = lookup.module {
        let declared: Vec<Value> =
            resources.iter().map(|r| json!(r.address)).collect();
        match module.resources.as_deref() {
            Some(module_resources) => {
                // Addresses present in the module but not declared; matched
                // relative to the module path.
                let additional: Vec<Value> = module_resources
                    .iter()
                    .filter(|r| {
                        !resources.iter().any(|e| {
                            r.address == e.address || r.address == lookup.qualify(&e.address)
                        })
                    })
                    .map(|r| json!(r.address))
                    .collect();
                group.push_case(TestCase::deep_equal(
                    "should not contain additional resources",
                    Value::Array(additional),
                    Value::Array(declared),
                    format!("module {module_address} should not contain additional resources"),
                ));
            }
            None => {
                group.push_case(TestCase::deep_equal(
                    "should contain specified resources",
                    json!([]),
                    Value::Array(declared),
                    format!("module {module_address} should contain specified resources"),
                ));
            }
        }
    }

    Ok(TestNode::Group(group))
}

fn build_resource_test(
    lookup: &ModuleLookup<'_>,
    module_address: &str,
    expectation: &ResourceExpectation,
) -> TestNode {
    let mut group = TestGroup::new(expectation.name.clone());
    let qualified = lookup.qualify(&expectation.address);
    let resource = lookup.module.and_then(|module| {
        module
            .resource(&qualified)
            .or_else(|| module.resource(&expectation.address))
    });

    // Emitted even when the module itself was not found, so the tree shape is
    // stable across lookup outcomes.
    group.push_case(TestCase::is_not_false(
        "should be declared in module",
        resource.is_some(),
        format!("resource {qualified} should be declared in module {module_address}"),
    ));

    if let Some(resource) = resource {
        let ctx = MessageContext::new(Mode::Plan, qualified);
        let comparison = compare_attributes(&ctx, &expectation.values, &resource.values);
        for case in comparison.tests {
            group.push_case(case);
        }
        group.connection_tests.extend(comparison.connection_tests);
    }

    TestNode::Group(group)
}

/// Build the test tree for a set of state resource expectations.
pub fn build_state_test(state: &State, expectations: &[StateExpectation]) -> TestNode {
    let mut group = TestGroup::new("state resources");
    for expectation in expectations {
        group.push(build_instance_test(state, expectation));
    }
    TestNode::Group(group)
}

/// Build the test tree for one state resource and its declared instances.
/// Connection tests collected across instances land on this resource's group.
pub fn build_instance_test(state: &State, expectation: &StateExpectation) -> TestNode {
    let mut group = TestGroup::new(expectation.name.clone());
    let resource = state.resource(&expectation.address);

    group.push_case(TestCase::is_true(
        "should exist in state",
        resource.is_some(),
        format!("resource {} should exist in state", expectation.address),
    ));

    for instance_expectation in &expectation.instances {
        let instance =
            resource.and_then(|r| r.find_instance(&instance_expectation.key));

        group.push_case(TestCase::is_not_false(
            format!("should have instance [{}]", instance_expectation.key),
            instance.is_some(),
            format!(
                "resource {}[{}] should exist in state",
                expectation.address, instance_expectation.key
            ),
        ));

        if let Some(instance) = instance {
            let ctx = MessageContext::new(Mode::State, expectation.address.clone())
                .with_index(&instance_expectation.key);
            let comparison =
                compare_attributes(&ctx, &instance_expectation.values, &instance.attributes);
            for case in comparison.tests {
                group.push_case(case);
            }
            group.connection_tests.extend(comparison.connection_tests);
        }
    }

    TestNode::Group(group)
}
