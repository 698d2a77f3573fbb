//! Result store: task name -> resolved value.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Append-only mapping of resolved task values.
///
/// Invariant: a name is written at most once. Only the scheduler writes, and
/// only between waves or during the scan, never from a running task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    values: HashMap<String, Value>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            values: HashMap::with_capacity(n),
        }
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        let prev = self.values.insert(name.to_string(), value);
        debug_assert!(prev.is_none(), "task {name} resolved twice");
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn into_map(self) -> HashMap<String, Value> {
        self.values
    }
}

impl std::ops::Index<&str> for ResultStore {
    type Output = Value;

    /// Missing names index to `null`, like `serde_json::Value` does.
    fn index(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(name).unwrap_or(&NULL)
    }
}

impl IntoIterator for ResultStore {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
