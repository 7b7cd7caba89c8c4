// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plugin implementations for The DAGstream.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process plugins registered by [`crate::config::PluginRegistry::with_builtins`]:
//! - **Sources**: `emit`, `read_lines`
//! - **Combinators**: `identity`, `merge`, `concat`
//! - **Text Transformation**: `change_text_case`, `reverse_text`, `prefix_suffix_adder`
//! - **Text Analysis**: `token_counter`
//! - **Sinks**: `log`, `write_lines`
//!
//! ## Stub Backend (Test-Only)
//! Plugins with observable side effects for compiler and controller tests:
//! sources, recorders, failing, panicking and never-ending stages.
//! **Note**: NOT available in production builds.
//!
//! # Architecture
//!
//! ```text
//! Registry → Plugin::configure(NodeConfig) → ConfiguredPlugin::bind(inputs) → ItemStream
//! ```
//!
//! # Examples
//!
//! ```rust
//! use the_dagstream::backends::local::register_builtins;
//! use the_dagstream::config::PluginRegistry;
//!
//! let mut registry = PluginRegistry::new();
//! register_builtins(&mut registry)?;
//! assert!(registry.contains("change_text_case"));
//! # Ok::<(), the_dagstream::errors::RegistryError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
