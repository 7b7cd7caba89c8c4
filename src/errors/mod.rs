// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod plugin;

pub use config::{ConfigurationError, LoadError};
pub use execution::{CompileError, FailureStrategy, StreamProcessingError};
pub use plugin::{PluginConfigurationError, PluginNotFoundError, RegistryError};
