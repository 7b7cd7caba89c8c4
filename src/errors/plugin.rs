// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for plugin registration, lookup, and configuration.

use thiserror::Error;

/// No plugin is registered under the requested name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No plugin registered under the name '{name}'")]
pub struct PluginNotFoundError {
    pub name: String,
}

/// A plugin rejected the configuration it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginConfigurationError {
    #[error("missing required option '{key}'")]
    MissingOption { key: String },

    #[error("invalid value '{value}' for option '{key}': {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    #[error("plugin accepts {expected} input stream(s) but the node has {actual}")]
    InputArity { expected: String, actual: usize },
}

impl PluginConfigurationError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while populating a plugin registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A plugin named '{name}' is already registered")]
    DuplicatePlugin { name: String },
}
