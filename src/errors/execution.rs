// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use super::{ConfigurationError, PluginConfigurationError, PluginNotFoundError};

/// Errors that abort compilation before any data flows.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Node '{node}' cannot be compiled: {source}")]
    PluginNotFound {
        node: String,
        #[source]
        source: PluginNotFoundError,
    },

    #[error("Node '{node}' rejected its configuration for plugin '{plugin}': {source}")]
    PluginConfiguration {
        node: String,
        plugin: String,
        #[source]
        source: PluginConfigurationError,
    },

    /// A single-consumer stage was asked for its output twice
    #[error("Output of stage '{node}' was already consumed")]
    StageAlreadyConsumed { node: String },
}

impl CompileError {
    /// Name of the node the error is attributed to, if any
    pub fn node(&self) -> Option<&str> {
        match self {
            CompileError::Configuration(_) => None,
            CompileError::PluginNotFound { node, .. }
            | CompileError::PluginConfiguration { node, .. }
            | CompileError::StageAlreadyConsumed { node } => Some(node),
        }
    }
}

/// A plugin failed while processing an item at run time.
///
/// Travels in-band through the pipeline and terminates the branch that raised
/// it. `Clone` so a fan-out stage can replay it to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamProcessingError {
    pub stage: Option<String>,
    pub message: String,
}

impl StreamProcessingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            stage: None,
            message: message.into(),
        }
    }

    /// Attribute the error to a stage unless an upstream stage already claimed it
    pub fn in_stage(mut self, stage: &str) -> Self {
        if self.stage.is_none() {
            self.stage = Some(stage.to_string());
        }
        self
    }
}

impl fmt::Display for StreamProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            Some(stage) => write!(f, "Stage '{}' failed: {}", stage, self.message),
            None => write!(f, "Stream processing failed: {}", self.message),
        }
    }
}

impl std::error::Error for StreamProcessingError {}

/// How the execution controller reacts to a failing branch.
///
/// * `FailFast` - the first failure ends the run and cancels every other branch
/// * `ContinueOnError` - other branches keep running; all failures are reported
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    FailFast,
    ContinueOnError,
}
