// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::local::builtin_plugins;
use crate::errors::{PluginNotFoundError, RegistryError};
use crate::observability::messages::plugin::{DuplicatePluginRejected, PluginRegistered};
use crate::observability::messages::StructuredLog;
use crate::traits::Plugin;

/// Name-keyed registry of the plugins available to a compilation.
///
/// The registry is an ordinary value: build it at process start, register
/// plugins, then hand it to [`PipelineCompiler`](crate::engine::PipelineCompiler)
/// by reference. Names match exactly, case included.
///
/// A second registration under a taken name is rejected and the first plugin
/// stays in place.
///
/// # Examples
///
/// ```
/// use the_dagstream::config::PluginRegistry;
///
/// let registry = PluginRegistry::with_builtins();
///
/// assert!(registry.resolve("identity").is_ok());
/// assert!(registry.resolve("Identity").is_err());
/// ```
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<&'static str, Arc<dyn Plugin>>,
    order: Vec<&'static str>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every plugin in [`crate::backends::local`]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for plugin in builtin_plugins() {
            // Built-in names are distinct; a clash is logged by `register`
            let _ = registry.register(plugin);
        }
        registry
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), RegistryError> {
        let name = plugin.name();
        if self.plugins.contains_key(name) {
            DuplicatePluginRejected { plugin: name }.log();
            return Err(RegistryError::DuplicatePlugin {
                name: name.to_string(),
            });
        }

        self.plugins.insert(name, plugin);
        self.order.push(name);
        PluginRegistered {
            plugin: name,
            registry_size: self.order.len(),
        }
        .log();
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginNotFoundError> {
        self.plugins
            .get(name)
            .cloned()
            .ok_or_else(|| PluginNotFoundError {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugin_count", &self.order.len())
            .field("plugin_names", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::plugins::{Merge, ReverseText};

    #[test]
    fn test_register_and_resolve() {
        let mut registry = PluginRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Merge::identity())).unwrap();
        registry.register(Arc::new(ReverseText)).unwrap();

        assert_eq!(registry.names(), &["identity", "reverse_text"]);
        assert_eq!(registry.resolve("reverse_text").unwrap().name(), "reverse_text");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Merge::identity())).unwrap();

        let result = registry.register(Arc::new(Merge::identity()));
        assert_eq!(
            result,
            Err(RegistryError::DuplicatePlugin {
                name: "identity".to_string()
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let registry = PluginRegistry::with_builtins();
        let cases = vec!["", "IDENTITY", "identity ", "ident"];

        for name in cases {
            match registry.resolve(name) {
                Ok(plugin) => panic!("'{}' resolved to '{}'", name, plugin.name()),
                Err(error) => assert_eq!(error.name, name),
            }
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = PluginRegistry::with_builtins();
        for name in [
            "emit",
            "read_lines",
            "identity",
            "merge",
            "concat",
            "change_text_case",
            "reverse_text",
            "prefix_suffix_adder",
            "token_counter",
            "log",
            "write_lines",
        ] {
            assert!(registry.contains(name), "missing builtin '{}'", name);
        }
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Merge::identity())).unwrap();
        let debug = format!("{:?}", registry);
        assert!(debug.contains("plugin_count: 1"));
        assert!(debug.contains("identity"));
    }
}
