// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline execution lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Execution lifecycle (start, completion, failure, cancellation)
//! * Per-branch failures and task panics

use crate::errors::{FailureStrategy, StreamProcessingError};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::errors::FailureStrategy;
/// use the_dagstream::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     process_name: "ingest",
///     branch_count: 2,
///     strategy: FailureStrategy::FailFast,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub process_name: &'a str,
    pub branch_count: usize,
    pub strategy: FailureStrategy,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline '{}': {} terminal branches, {:?}",
            self.process_name, self.branch_count, self.strategy
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            process_name = self.process_name,
            branch_count = self.branch_count,
            strategy = ?self.strategy,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            process_name = self.process_name,
            branch_count = self.branch_count,
        )
    }
}

/// Execution completed with every branch exhausted.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::engine::ExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = ExecutionCompleted {
///     process_name: "ingest",
///     items: 42,
///     duration: Duration::from_millis(150),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionCompleted<'a> {
    pub process_name: &'a str,
    pub items: u64,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' completed: {} items in {:?}",
            self.process_name, self.items, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            process_name = self.process_name,
            items = self.items,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            process_name = self.process_name,
            duration = ?self.duration,
        )
    }
}

/// Execution finished with at least one failed branch.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub process_name: &'a str,
    pub failure_count: usize,
    pub items: u64,
    pub duration: Duration,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' failed: {} failures after {} items in {:?}",
            self.process_name, self.failure_count, self.items, self.duration
        )
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            process_name = self.process_name,
            failure_count = self.failure_count,
            items = self.items,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            process_name = self.process_name,
            failure_count = self.failure_count,
        )
    }
}

/// A terminal branch surfaced an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct BranchFailed<'a> {
    pub branch: &'a str,
    pub error: &'a StreamProcessingError,
}

impl Display for BranchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Branch '{}' failed: {}", self.branch, self.error)
    }
}

impl StructuredLog for BranchFailed<'_> {
    fn log(&self) {
        tracing::error!(
            branch = self.branch,
            stage = self.error.stage.as_deref().unwrap_or(""),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("branch_failed", span_name = name, branch = self.branch)
    }
}

/// Execution cancelled before every branch finished.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct ExecutionCancelled<'a> {
    pub process_name: &'a str,
    pub reason: &'a str,
}

impl Display for ExecutionCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline '{}' cancelled: {}", self.process_name, self.reason)
    }
}

impl StructuredLog for ExecutionCancelled<'_> {
    fn log(&self) {
        tracing::warn!(process_name = self.process_name, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "execution_cancelled",
            span_name = name,
            process_name = self.process_name,
        )
    }
}

/// A spawned pipeline task panicked.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TaskPanicked<'a> {
    pub task: &'a str,
    pub message: &'a str,
}

impl Display for TaskPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' panicked: {}", self.task, self.message)
    }
}

impl StructuredLog for TaskPanicked<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, panic = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("task_panicked", span_name = name, task = self.task)
    }
}
