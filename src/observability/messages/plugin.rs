// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for plugin registration and stage runtime events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Plugin added to a registry.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct PluginRegistered<'a> {
    pub plugin: &'a str,
    pub registry_size: usize,
}

impl Display for PluginRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered plugin '{}' ({} registered)",
            self.plugin, self.registry_size
        )
    }
}

impl StructuredLog for PluginRegistered<'_> {
    fn log(&self) {
        tracing::debug!(plugin = self.plugin, registry_size = self.registry_size, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("plugin_registered", span_name = name, plugin = self.plugin)
    }
}

/// Second registration under an existing plugin name refused.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct DuplicatePluginRejected<'a> {
    pub plugin: &'a str,
}

impl Display for DuplicatePluginRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Plugin '{}' is already registered; keeping the first registration",
            self.plugin
        )
    }
}

impl StructuredLog for DuplicatePluginRejected<'_> {
    fn log(&self) {
        tracing::warn!(plugin = self.plugin, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("duplicate_plugin", span_name = name, plugin = self.plugin)
    }
}

/// A stage's output stream finished.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use the_dagstream::observability::messages::plugin::StageFinished;
///
/// let msg = StageFinished {
///     stage: "tokenize",
///     items: 120,
///     failed: false,
/// };
///
/// assert_eq!(msg.to_string(), "Stage 'tokenize' finished after 120 items");
/// ```
pub struct StageFinished<'a> {
    pub stage: &'a str,
    pub items: u64,
    pub failed: bool,
}

impl Display for StageFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.failed {
            write!(f, "Stage '{}' failed after {} items", self.stage, self.items)
        } else {
            write!(f, "Stage '{}' finished after {} items", self.stage, self.items)
        }
    }
}

impl StructuredLog for StageFinished<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, items = self.items, failed = self.failed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("stage_finished", span_name = name, stage = self.stage)
    }
}

/// A bounded buffer discarded items because its consumer fell behind.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct BufferOverflow<'a> {
    pub buffer: &'a str,
    pub dropped: u64,
    pub capacity: usize,
    pub overflow: &'a str,
}

impl Display for BufferOverflow<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Buffer '{}' dropped {} items (capacity {}, overflow policy {})",
            self.buffer, self.dropped, self.capacity, self.overflow
        )
    }
}

impl StructuredLog for BufferOverflow<'_> {
    fn log(&self) {
        tracing::warn!(
            buffer = self.buffer,
            dropped = self.dropped,
            capacity = self.capacity,
            overflow = self.overflow,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("buffer_overflow", span_name = name, buffer = self.buffer)
    }
}
