//! State tree
//!
//! The flat, post-apply representation of actual resource instances. Each
//! resource identifies itself by module path, mode, type, and name; their
//! concatenation yields the composed address tests are keyed by.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Mode marker for data sources. Managed resources omit the mode from their
/// composed address to match conventional addressing.
pub const DATA_MODE: &str = "data";

/// A full state document.
#[derive(Debug, Clone, Deserialize)]
pub struct State {
    pub resources: Vec<StateResource>,
}

/// One resource entry in the flat state list.
#[derive(Debug, Clone, Deserialize)]
pub struct StateResource {
    #[serde(default)]
    pub module: Option<String>,

    pub mode: String,

    #[serde(rename = "type")]
    pub resource_type: String,

    pub name: String,

    #[serde(default)]
    pub instances: Vec<StateInstance>,
}

/// One concrete instance of a resource. Multi-instance resources carry either
/// a string `index_key` (for_each) or rely on list position (count).
#[derive(Debug, Clone, Deserialize)]
pub struct StateInstance {
    #[serde(default)]
    pub index_key: Option<IndexKey>,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Instance key as serialized in state: map-style string or count-style int.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IndexKey {
    Int(i64),
    Str(String),
}

impl IndexKey {
    /// Compare against a declared key, which is always authored as a string.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            IndexKey::Str(s) => s == key,
            IndexKey::Int(i) => key.parse::<i64>().map(|k| k == *i).unwrap_or(false),
        }
    }
}

impl State {
    /// Parse a state document. A document without `resources` is a fatal
    /// configuration error.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.get("resources").is_none() {
            return Err(Error::MalformedState(
                "state document is missing \"resources\"".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedState(e.to_string()))
    }

    /// Find a resource by its composed address.
    pub fn resource(&self, address: &str) -> Option<&StateResource> {
        self.resources.iter().find(|r| r.composed_address() == address)
    }
}

impl StateResource {
    /// Composed address: module path (if any), mode (only for data sources),
    /// type, and name joined with `.`.
    pub fn composed_address(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(module) = self.module.as_deref() {
            if !module.is_empty() {
                parts.push(module);
            }
        }
        if self.mode == DATA_MODE {
            parts.push(&self.mode);
        }
        parts.push(&self.resource_type);
        parts.push(&self.name);
        parts.join(".")
    }

    /// Resolve an instance by declared key: `index_key` equality first, then
    /// positional fallback when the key parses as an integer. `None` is a
    /// normal not-found outcome, never an error.
    pub fn find_instance(&self, key: &str) -> Option<&StateInstance> {
        if let Some(instance) = self
            .instances
            .iter()
            .find(|i| i.index_key.as_ref().is_some_and(|k| k.matches(key)))
        {
            return Some(instance);
        }
        key.parse::<usize>().ok().and_then(|i| self.instances.get(i))
    }
}
