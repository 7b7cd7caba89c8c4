// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod registry;
mod runtime;
mod validation;

pub mod consts;

pub use loader::{
    load_config, load_config_or_packaged, packaged_config, parse_config, Config, ConfigFormat,
    ExecutorOptions, NodeEntry, OrderedTable,
};
pub use registry::PluginRegistry;
pub use runtime::PipelineRuntime;
pub use validation::validate_definition;
