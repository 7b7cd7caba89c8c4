// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::plugins::*;
use crate::config::PluginRegistry;
use crate::errors::RegistryError;
use crate::traits::Plugin;

/// One instance of every built-in plugin, in registration order.
pub fn builtin_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![
        // Sources
        Arc::new(Emit),
        Arc::new(ReadLines),
        // Combinators
        Arc::new(Merge::identity()),
        Arc::new(Merge::new()),
        Arc::new(Concat),
        // Text transforms
        Arc::new(ChangeTextCase),
        Arc::new(ReverseText),
        Arc::new(PrefixSuffixAdder),
        Arc::new(TokenCounter),
        // Sinks
        Arc::new(LogItems),
        Arc::new(WriteLines),
    ]
}

/// Add the built-ins to an existing registry.
///
/// Stops at the first name already taken, leaving earlier built-ins registered.
pub fn register_builtins(registry: &mut PluginRegistry) -> Result<(), RegistryError> {
    for plugin in builtin_plugins() {
        registry.register(plugin)?;
    }
    Ok(())
}
