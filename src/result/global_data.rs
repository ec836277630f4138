//! Global data patches
//!
//! A patch is a shallow key/value map applied to the per-call shared state.

use super::ResultError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shallow patch for the per-call global data store.
///
/// Within one result, later merges overwrite earlier keys. Patches coming
/// from different results accumulate in the session store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalStateMerge(Map<String, Value>);

impl GlobalStateMerge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a JSON object into this patch, last write wins per key.
    ///
    /// The whole patch is checked before any key is applied, so a rejected
    /// patch leaves `self` untouched.
    pub fn merge(&mut self, patch: Value) -> Result<(), ResultError> {
        let Value::Object(entries) = patch else {
            return Err(ResultError::payload(
                "update_global_data",
                "patch must be a JSON object",
            ));
        };
        if entries.keys().any(|k| k.trim().is_empty()) {
            return Err(ResultError::payload(
                "update_global_data",
                "patch keys must not be empty",
            ));
        }
        self.0.extend(entries);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
