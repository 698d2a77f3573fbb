//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Settings for a [`Resolver`](crate::Resolver).
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Label recorded on the `resolve` tracing span.
    pub label: Option<String>,

    /// Parameter names that mark the completion callback of an injected task.
    pub callback_names: Vec<String>,
}

impl ResolverConfig {
    pub fn is_callback_name(&self, name: &str) -> bool {
        self.callback_names.iter().any(|n| n == name)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            label: None,
            callback_names: vec!["callback".to_string(), "cb".to_string()],
        }
    }
}
