// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a pipeline graph invalid.
///
/// All of these are detected while the graph is built, before any plugin is
/// resolved or bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two nodes share the same name
    #[error("Duplicate node name: '{name}'")]
    DuplicateNode { name: String },

    /// An edge references a node that does not exist
    #[error("Edges of '{edge_source}' reference unknown node '{missing}'")]
    UnknownNode { edge_source: String, missing: String },

    /// The same target is listed twice for one source
    #[error("Edge '{source_node}' -> '{target_node}' is declared more than once")]
    DuplicateEdge {
        source_node: String,
        target_node: String,
    },

    /// The graph contains a cycle; the path ends on the node that closes it
    #[error("Cyclic dependency detected: {}", cycle.join(" -> "))]
    CyclicGraph { cycle: Vec<String> },

    /// An executor option is out of range
    #[error("Invalid executor option '{option}': {reason}")]
    InvalidExecutorOption { option: String, reason: String },
}

/// Errors raised while reading a configuration file into a graph.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
