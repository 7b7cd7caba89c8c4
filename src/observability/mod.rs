// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the pipeline compiler and runtime. Message types are
//! plain structs with a `Display` implementation, which:
//!
//! * Eliminates magic strings scattered throughout the codebase
//! * Keeps field names consistent between human-readable text and structured fields
//! * Provides consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::validation` - graph construction and validation
//! * `messages::compiler` - plugin resolution and stage compilation
//! * `messages::engine` - run lifecycle, branch failures, cancellation
//! * `messages::plugin` - registry and per-stage runtime events
//!
//! # Usage
//!
//! ```rust
//! use the_dagstream::observability::messages::engine::BranchFailed;
//! use the_dagstream::observability::messages::StructuredLog;
//! use the_dagstream::errors::StreamProcessingError;
//!
//! let error = StreamProcessingError::new("bad item").in_stage("tokenize");
//! BranchFailed {
//!     branch: "tokenize",
//!     error: &error,
//! }
//! .log();
//! ```

pub mod messages;
