// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its designated level with structured fields.
//!
//! * `validation` - graph construction and validation
//! * `compiler` - plugin resolution and stage compilation
//! * `engine` - execution lifecycle
//! * `plugin` - registry and stage runtime events

use std::fmt::Display;
use tracing::Span;

pub mod compiler;
pub mod engine;
pub mod plugin;
pub mod validation;

/// Emit a message at its designated level, with its fields attached.
pub trait StructuredLog: Display {
    /// Log the message as a single event
    fn log(&self);

    /// A span carrying the message's fields, for work done on its behalf
    fn span(&self, name: &str) -> Span;
}
