// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph construction and validation.
//!
//! This module contains message types for logging events related to:
//! * Graph linking (node, edge, root and terminal counts)
//! * Validation failures (duplicates, dangling references)
//! * Cycle detection

use crate::errors::ConfigurationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Graph definition validated and linked.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::validation::GraphBuilt;
///
/// let msg = GraphBuilt {
///     process_name: "ingest",
///     node_count: 4,
///     edge_count: 4,
///     root_count: 1,
///     terminal_count: 1,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct GraphBuilt<'a> {
    pub process_name: &'a str,
    pub node_count: usize,
    pub edge_count: usize,
    pub root_count: usize,
    pub terminal_count: usize,
}

impl Display for GraphBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built graph '{}': {} nodes, {} edges, {} roots, {} terminals",
            self.process_name, self.node_count, self.edge_count, self.root_count, self.terminal_count
        )
    }
}

impl StructuredLog for GraphBuilt<'_> {
    fn log(&self) {
        tracing::debug!(
            process_name = self.process_name,
            node_count = self.node_count,
            edge_count = self.edge_count,
            root_count = self.root_count,
            terminal_count = self.terminal_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_built",
            span_name = name,
            process_name = self.process_name,
            node_count = self.node_count,
        )
    }
}

/// Graph definition rejected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct GraphValidationFailed<'a> {
    pub error: &'a ConfigurationError,
}

impl Display for GraphValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph validation failed: {}", self.error)
    }
}

impl StructuredLog for GraphValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("graph_validation_failed", span_name = name, error = %self.error)
    }
}

/// Cycle found in a graph definition.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::validation::CycleDetected;
///
/// let cycle = vec!["tokenize", "tag", "tokenize"];
/// let msg = CycleDetected { cycle: &cycle };
///
/// assert_eq!(msg.to_string(), "Cycle detected: tokenize -> tag -> tokenize");
/// ```
pub struct CycleDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cycle detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CycleDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cycle_detected",
            span_name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}
