// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use crate::config::consts::FALLBACK_WORKER_THREADS;
use crate::engine::{BackpressurePolicy, ControllerOptions};
use crate::errors::{ConfigurationError, FailureStrategy, LoadError};
use crate::graph::{Graph, GraphDefinition, Node, NodeConfig, ProcessMetadata};

/// Configurations compiled into the binary, looked up by file name.
const PACKAGED_CONFIGS: &[(&str, &str)] = &[(
    "config.json",
    include_str!("../../resources/config.json"),
)];

/// A job description: process metadata, executor options, nodes and edges.
///
/// Loaded from JSON, or YAML when the file ends in `.yaml`/`.yml`. Node and
/// edge tables keep their declaration order.
///
/// # Fields
/// * `process` - Opaque metadata (`name`, `logs`, anything else), passed through for logging
/// * `executor` - Failure strategy, buffering and worker threads (optional)
/// * `nodes` - Node name to plugin name and plugin options
/// * `edges` - Source node name to the ordered list of its targets
///
/// # Example
/// ```json
/// {
///   "process": { "name": "shout", "logs": "logs/shout" },
///   "executor": { "failure_strategy": "continue_on_error" },
///   "nodes": {
///     "read":  { "plugin": "emit", "config": { "values": "hello,world" } },
///     "upper": { "plugin": "change_text_case", "config": { "case": "upper" } }
///   },
///   "edges": { "read": ["upper"] }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub process: ProcessMetadata,
    #[serde(default)]
    pub executor: ExecutorOptions,
    #[serde(default)]
    pub nodes: OrderedTable<NodeEntry>,
    #[serde(default)]
    pub edges: OrderedTable<Vec<String>>,
}

/// Executor options.
///
/// # Fields
/// * `failure_strategy` - `fail_fast` (default) or `continue_on_error`
/// * `backpressure` - Buffer capacity (`null` for unbounded) and overflow policy
/// * `worker_threads` - Tokio worker threads; defaults to the available parallelism
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ExecutorOptions {
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub backpressure: BackpressurePolicy,
    pub worker_threads: Option<usize>,
}

impl ExecutorOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.backpressure.capacity == Some(0) {
            return Err(ConfigurationError::InvalidExecutorOption {
                option: "backpressure.capacity".to_string(),
                reason: "must be at least 1, or null for unbounded".to_string(),
            });
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigurationError::InvalidExecutorOption {
                option: "worker_threads".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKER_THREADS)
        })
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            failure_strategy: self.failure_strategy,
            backpressure: self.backpressure,
        }
    }
}

/// One entry of the `nodes` table.
///
/// Option values may be any JSON/YAML value; non-strings are kept as their
/// JSON text, so `"items": [1, 2]` reaches the plugin as `[1,2]`.
#[derive(Debug, Deserialize)]
pub struct NodeEntry {
    pub plugin: String,
    #[serde(default)]
    pub config: OrderedTable<serde_json::Value>,
}

impl NodeEntry {
    fn node_config(self) -> NodeConfig {
        self.config
            .0
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect()
    }
}

/// A mapping that keeps its entries in document order, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedTable<T>(pub Vec<(String, T)>);

impl<T> Default for OrderedTable<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for TableVisitor<T> {
            type Value = OrderedTable<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of named entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}

impl Config {
    /// Build and validate the graph this configuration describes.
    pub fn into_graph(self) -> Result<Graph, ConfigurationError> {
        self.into_parts().map(|(graph, _)| graph)
    }

    /// The graph plus the executor options that go with it.
    pub fn into_parts(self) -> Result<(Graph, ExecutorOptions), ConfigurationError> {
        self.executor.validate()?;

        let mut definition = GraphDefinition::new(self.process);
        for (name, entry) in self.nodes.0 {
            let plugin = entry.plugin.clone();
            definition.add_node(Node::new(name, plugin).with_config(entry.node_config()));
        }
        for (source, targets) in self.edges.0 {
            definition.add_edges(source, targets);
        }

        Ok((definition.build()?, self.executor))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// YAML for `.yaml`/`.yml` files, JSON otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse configuration text and check its executor options.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<Config, LoadError> {
    let config: Config = match format {
        ConfigFormat::Json => serde_json::from_str(text)?,
        ConfigFormat::Yaml => serde_yaml::from_str(text)?,
    };
    config.executor.validate()?;
    Ok(config)
}

/// Load a configuration file from disk.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, ConfigFormat::from_path(path))
}

/// Load `path`, or the packaged configuration of the same file name when
/// `path` is not a file.
pub fn load_config_or_packaged<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let path = path.as_ref();
    if path.is_file() {
        return load_config(path);
    }

    let packaged = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(packaged_config);

    match packaged {
        Some(text) => {
            tracing::info!(
                path = %path.display(),
                "Configuration file not found; using the packaged copy"
            );
            parse_config(text, ConfigFormat::from_path(path))
        }
        None => load_config(path),
    }
}

/// Text of a packaged configuration, by file name
pub fn packaged_config(file_name: &str) -> Option<&'static str> {
    PACKAGED_CONFIGS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, text)| *text)
}
