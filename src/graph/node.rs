// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::errors::PluginConfigurationError;

/// Ordered, plugin-specific string options of a node.
///
/// Keeps insertion order so plugins and logs see options the way they were
/// declared in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig(Vec<(String, String)>);

impl NodeConfig {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert an option, replacing (in place) any earlier value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get an option the plugin cannot work without
    pub fn require(&self, key: &str) -> Result<&str, PluginConfigurationError> {
        self.get(key)
            .ok_or_else(|| PluginConfigurationError::MissingOption {
                key: key.to_string(),
            })
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, PluginConfigurationError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(PluginConfigurationError::invalid(key, value, "expected a boolean")),
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NodeConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = NodeConfig::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

/// Declarative descriptor of one pipeline stage.
///
/// Immutable once created; the graph keeps adjacency and the compiler keeps
/// its own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    plugin_name: String,
    config: NodeConfig,
}

impl Node {
    pub fn new(name: impl Into<String>, plugin_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin_name: plugin_name.into(),
            config: NodeConfig::new(),
        }
    }

    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

/// Process-level metadata carried with a graph for logging and audit.
///
/// Not interpreted by the compiler. Unknown fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logs: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProcessMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_config_keeps_insertion_order() {
        let mut config = NodeConfig::new();
        config.insert("zeta", "1");
        config.insert("alpha", "2");
        config.insert("mid", "3");

        let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_node_config_replaces_in_place() {
        let mut config: NodeConfig = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(config.insert("a", "10"), Some("1".to_string()));

        let entries: Vec<(&str, &str)> = config.iter().collect();
        assert_eq!(entries, vec![("a", "10"), ("b", "2")]);
    }

    #[test]
    fn test_require_missing_option() {
        let config = NodeConfig::new();
        assert_eq!(
            config.require("path"),
            Err(PluginConfigurationError::MissingOption {
                key: "path".to_string()
            })
        );
    }

    #[test]
    fn test_get_bool() {
        let config: NodeConfig = [("on", "true"), ("off", "0"), ("bad", "maybe")]
            .into_iter()
            .collect();

        assert_eq!(config.get_bool("on", false), Ok(true));
        assert_eq!(config.get_bool("off", true), Ok(false));
        assert_eq!(config.get_bool("absent", true), Ok(true));
        assert!(config.get_bool("bad", false).is_err());
    }

    #[test]
    fn test_node_builder() {
        let node = Node::new("extract", "emit").with_option("values", "a,b");
        assert_eq!(node.name(), "extract");
        assert_eq!(node.plugin_name(), "emit");
        assert_eq!(node.config().get("values"), Some("a,b"));
    }
}
