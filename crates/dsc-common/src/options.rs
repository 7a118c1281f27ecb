//! Per-compilation model options.
//!
//! Options are plain data deserialized from JSON. Missing fields fall back to
//! the defaults in [`crate::limits`].

use crate::limits;
use serde::{Deserialize, Serialize};

/// Tunable limits for building and specializing descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelOptions {
    /// Deepest allowed containment chain (module at depth 0).
    pub max_containment_depth: usize,
    /// Deepest allowed type nesting while substituting.
    pub max_substitution_depth: u32,
    /// Largest accepted type-argument list.
    pub max_type_arguments: usize,
    /// Pre-intern common names when creating a type interner.
    pub intern_common_names: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            max_containment_depth: limits::MAX_CONTAINMENT_DEPTH,
            max_substitution_depth: limits::MAX_SUBSTITUTION_DEPTH,
            max_type_arguments: limits::MAX_TYPE_ARGUMENTS,
            intern_common_names: true,
        }
    }
}

impl ModelOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize options back to pretty JSON (used by `--show-options`).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
