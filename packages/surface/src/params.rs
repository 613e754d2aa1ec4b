//! Surface parameter store (the variable registry)
//!
//! Both fields are host-supplied configuration read at conversion time.
//! Absent or empty values degrade to permissive defaults: every name is
//! valid, no label remapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Allow-list of valid variable names; `None` or empty disables the check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_valid: Option<Vec<String>>,

    /// Variable name → display label; `None` disables substitution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_mappers: Option<BTreeMap<String, String>>,
}

impl Params {
    /// Exact membership test against the allow-list
    pub fn is_valid(&self, name: &str) -> bool {
        match &self.variable_valid {
            Some(valid) if !valid.is_empty() => valid.iter().any(|entry| entry == name),
            _ => true,
        }
    }

    /// Display label for a name: mapped label if present, the name itself otherwise
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.variable_mappers
            .as_ref()
            .and_then(|mappers| mappers.get(name))
            .map(String::as_str)
            .unwrap_or(name)
    }
}
