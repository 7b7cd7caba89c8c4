// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline compilation.
//!
//! This module contains message types for logging events related to:
//! * Compilation lifecycle (start, completion, failure)
//! * Per-stage plugin binding

use crate::errors::CompileError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Compilation of a graph started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::compiler::CompilationStarted;
///
/// let msg = CompilationStarted {
///     process_name: "ingest",
///     node_count: 6,
///     root_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct CompilationStarted<'a> {
    pub process_name: &'a str,
    pub node_count: usize,
    pub root_count: usize,
}

impl Display for CompilationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiling pipeline '{}': {} nodes from {} roots",
            self.process_name, self.node_count, self.root_count
        )
    }
}

impl StructuredLog for CompilationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            process_name = self.process_name,
            node_count = self.node_count,
            root_count = self.root_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "compilation",
            span_name = name,
            process_name = self.process_name,
            node_count = self.node_count,
        )
    }
}

/// A node's plugin was configured and bound.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct StageCompiled<'a> {
    pub node: &'a str,
    pub plugin: &'a str,
    pub input_count: usize,
    pub output_count: usize,
}

impl StageCompiled<'_> {
    fn shape(&self) -> &'static str {
        match (self.input_count, self.output_count) {
            (0, _) => "source",
            (_, 0) => "terminal",
            (_, n) if n > 1 => "shared",
            _ => "single",
        }
    }
}

impl Display for StageCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled {} stage '{}' (plugin '{}'): {} inputs, {} outputs",
            self.shape(),
            self.node,
            self.plugin,
            self.input_count,
            self.output_count
        )
    }
}

impl StructuredLog for StageCompiled<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            plugin = self.plugin,
            input_count = self.input_count,
            output_count = self.output_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage",
            span_name = name,
            node = self.node,
            plugin = self.plugin,
        )
    }
}

/// Compilation finished; every node has a stage.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::compiler::CompilationCompleted;
/// use std::time::Duration;
///
/// let msg = CompilationCompleted {
///     stage_count: 6,
///     terminal_count: 2,
///     shared_count: 1,
///     duration: Duration::from_micros(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct CompilationCompleted {
    pub stage_count: usize,
    pub terminal_count: usize,
    pub shared_count: usize,
    pub duration: Duration,
}

impl Display for CompilationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled {} stages ({} terminal, {} shared) in {:?}",
            self.stage_count, self.terminal_count, self.shared_count, self.duration
        )
    }
}

impl StructuredLog for CompilationCompleted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            terminal_count = self.terminal_count,
            shared_count = self.shared_count,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "compilation_completed",
            span_name = name,
            stage_count = self.stage_count,
            duration = ?self.duration,
        )
    }
}

/// Compilation aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct CompilationFailed<'a> {
    pub error: &'a CompileError,
}

impl Display for CompilationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline compilation failed: {}", self.error)
    }
}

impl StructuredLog for CompilationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.error.node().unwrap_or(""),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("compilation_failed", span_name = name, error = %self.error)
    }
}
