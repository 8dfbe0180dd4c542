//! Resource locator
//!
//! Finds a module node in a plan tree by composed address, across the root
//! module, nested modules, and indexed instances. Not finding a module is a
//! normal outcome reported through `found` - callers turn it into a failing
//! existence test, never an error.

use tracing::debug;

use crate::address::ModuleAddress;
use crate::plan::{Plan, PlanModule};

/// Result of a module lookup.
#[derive(Debug)]
pub struct ModuleLookup<'a> {
    pub found: bool,
    pub module: Option<&'a PlanModule>,
    /// Address prefix qualifying resource addresses inside the module; empty
    /// for the root module.
    pub prefix: String,
}

impl<'a> ModuleLookup<'a> {
    fn found(module: &'a PlanModule, prefix: String) -> Self {
        Self {
            found: true,
            module: Some(module),
            prefix,
        }
    }

    fn not_found() -> Self {
        Self {
            found: false,
            module: None,
            prefix: String::new(),
        }
    }

    /// Qualify a declared resource address with this module's prefix.
    pub fn qualify(&self, resource_address: &str) -> String {
        if self.prefix.is_empty() {
            resource_address.to_string()
        } else {
            format!("{}.{}", self.prefix, resource_address)
        }
    }
}

/// Locate a module by structured address. The root sentinel resolves to the
/// root module node directly with an empty prefix.
pub fn lookup_module<'a>(plan: &'a Plan, target: &ModuleAddress) -> ModuleLookup<'a> {
    if target.is_root() {
        return ModuleLookup::found(&plan.root_module, String::new());
    }

    let mut current = &plan.root_module;
    loop {
        let mut descended = false;
        for child in &current.child_modules {
            // A child's address embeds its full path from the root, so match
            // structurally against the whole remaining target.
            let Ok(child_address) = ModuleAddress::parse(&child.address) else {
                debug!("Skipping child with unparseable address: {}", child.address);
                continue;
            };
            if child_address == *target {
                return ModuleLookup::found(child, target.to_string());
            }
            if child_address.is_prefix_of(target) {
                current = child;
                descended = true;
                break;
            }
        }
        if !descended {
            debug!("Module not found in plan: {target}");
            return ModuleLookup::not_found();
        }
    }
}
