//! Terraspec test tree runner
//!
//! Consumes the test trees assembled by `terraspec-core` and drives an
//! injected harness capability (describe/it plus assertion primitives)
//! through a strictly sequential, depth-first async walk. Also owns plan/state
//! acquisition from the external CLI.
//!
//! ```no_run
//! use terraspec_core::build_module_test;
//! use terraspec_runner::{load_plan, ConsoleHarness, TreeRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = load_plan("terraform show -json plan.out").await?;
//! let tree = build_module_test(&plan, "root_module", &[])?;
//!
//! let mut runner = TreeRunner::new(ConsoleHarness::new());
//! let summary = runner.run(&tree).await?;
//! assert_eq!(summary.failed, 0);
//! # Ok(())
//! # }
//! ```

pub mod assert;
pub mod error;
pub mod harness;
pub mod run;
pub mod source;

pub use assert::{deep_equal, is_not_false, is_true, AssertionError};
pub use error::{RunnerError, RunnerResult};
pub use harness::{CaseOutcome, ConsoleHarness, Harness, HarnessEvent, RecordingHarness};
pub use run::{RunSummary, TreeRunner};
pub use source::{exec, load_plan, load_state, plan_from_show, state_from_document, ExecOutput};
