//! Planned-values tree
//!
//! The hierarchical, pre-apply representation of intended resource state as
//! emitted by the external CLI (`planned_values` in the show output).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::address::ROOT_MODULE;
use crate::error::{Error, Result};

/// A full planned-values document.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub root_module: PlanModule,
}

/// One module node. The root module carries no `address` field in the wire
/// format; it defaults to the `root_module` sentinel. `resources` stays
/// `None` when the field is absent entirely - the assembler distinguishes an
/// empty module from one with no resources section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanModule {
    #[serde(default = "root_address")]
    pub address: String,

    #[serde(default)]
    pub resources: Option<Vec<PlanResource>>,

    #[serde(default)]
    pub child_modules: Vec<PlanModule>,
}

/// A planned resource with its attribute values.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResource {
    pub address: String,

    #[serde(default)]
    pub values: Map<String, Value>,
}

fn root_address() -> String {
    ROOT_MODULE.to_string()
}

impl Plan {
    /// Parse a planned-values document. A document without `root_module` is a
    /// fatal configuration error: the CLI produced unusable output.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.get("root_module").is_none() {
            return Err(Error::MalformedPlan(
                "planned values are missing \"root_module\"".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedPlan(e.to_string()))
    }
}

impl PlanModule {
    /// Find a resource by fully qualified address within this module.
    pub fn resource(&self, address: &str) -> Option<&PlanResource> {
        self.resources
            .as_deref()
            .and_then(|resources| resources.iter().find(|r| r.address == address))
    }
}
