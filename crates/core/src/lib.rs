//! Terraspec comparison engine
//!
//! Converts plan/state output from a Terraform-style CLI into a structured
//! tree of assertions. The engine locates resources by composed address
//! (nested modules, indexed/keyed instances), diffs their attributes against
//! a user-authored expectation tree, and emits deterministic pass/fail test
//! cases - including detection of unexpected extra resources.
//!
//! # Architecture
//!
//! ```text
//! plan/state JSON + expectation tree
//!        │
//!        ├── locate:   module / resource / instance by composed address
//!        ├── compare:  per-key diff (literal | predicate | nested block)
//!        └── assemble: nested TestGroup tree + deferred connection tests
//!        │
//!        ▼
//! TestNode tree → terraspec-runner → harness (describe/it + assertions)
//! ```
//!
//! Expectation mismatches never raise errors: they become failing test cases
//! with deterministic messages. Only malformed plan/state documents and
//! malformed addresses are fatal.

pub mod address;
pub mod assemble;
pub mod compare;
pub mod error;
pub mod expect;
pub mod locate;
pub mod message;
pub mod plan;
pub mod predicate;
pub mod state;
pub mod testcase;

// Re-export commonly used types
pub use address::ModuleAddress;
pub use assemble::{
    build_instance_test, build_module_test, build_state_test, InstanceExpectation,
    ResourceExpectation, StateExpectation,
};
pub use compare::{compare_attributes, Comparison};
pub use error::{Error, Result};
pub use expect::{CheckOutcome, ConnectionCheck, Expect, ExpectMap, Predicate};
pub use locate::{lookup_module, ModuleLookup};
pub use message::{MessageContext, Mode};
pub use plan::{Plan, PlanModule, PlanResource};
pub use state::{IndexKey, State, StateInstance, StateResource};
pub use testcase::{Check, ConnectionTest, TestCase, TestGroup, TestNode};
