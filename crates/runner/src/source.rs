//! Plan/state acquisition from the external CLI
//!
//! The CLI is a black box invoked through the shell; it returns JSON text on
//! success and failure text on stderr. Acquisition is fully awaited before
//! assembly starts - everything downstream is synchronous and pure.

use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use terraspec_core::{Plan, State};

use crate::error::{RunnerError, RunnerResult};

/// Captured output of one command invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a shell command and capture its output. Non-zero exit is a fatal
/// configuration error carrying stderr.
pub async fn exec(command: &str) -> RunnerResult<ExecOutput> {
    debug!("Executing: {command}");
    let output = Command::new("sh").arg("-c").arg(command).output().await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(RunnerError::CommandFailed {
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(ExecOutput { stdout, stderr })
}

/// Extract the planned-values tree from a `show -json` document.
pub fn plan_from_show(json: &str) -> RunnerResult<Plan> {
    let document: Value = serde_json::from_str(json)?;
    let planned = document
        .get("planned_values")
        .cloned()
        .ok_or(RunnerError::MissingSection("planned_values"))?;
    Ok(Plan::from_value(planned)?)
}

/// Parse a raw state document.
pub fn state_from_document(json: &str) -> RunnerResult<State> {
    let document: Value = serde_json::from_str(json)?;
    Ok(State::from_value(document)?)
}

/// Run a command and parse its stdout as a plan show document.
pub async fn load_plan(command: &str) -> RunnerResult<Plan> {
    let output = exec(command).await?;
    plan_from_show(&output.stdout)
}

/// Run a command and parse its stdout as a state document.
pub async fn load_state(command: &str) -> RunnerResult<State> {
    let output = exec(command).await?;
    state_from_document(&output.stdout)
}
