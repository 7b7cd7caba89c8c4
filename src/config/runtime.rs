// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, ExecutorOptions, PluginRegistry};
use crate::engine::{CompiledPipeline, ExecutionController, PipelineCompiler, RunReport};
use crate::errors::{CompileError, ConfigurationError};
use crate::graph::Graph;

/// A validated graph with the executor options it should run under.
///
/// Ties the loader to the engine: build it from a [`Config`], then compile and
/// run it against a [`PluginRegistry`].
///
/// # Examples
///
/// ```
/// use the_dagstream::config::{parse_config, ConfigFormat, PipelineRuntime, PluginRegistry};
///
/// let config = parse_config(
///     r#"{
///         "nodes": {
///             "numbers": { "plugin": "emit", "config": { "items": [1, 2, 3] } },
///             "pass": { "plugin": "identity" }
///         },
///         "edges": { "numbers": ["pass"] }
///     }"#,
///     ConfigFormat::Json,
/// )
/// .unwrap();
///
/// let runtime = PipelineRuntime::from_config(config).unwrap();
/// let registry = PluginRegistry::with_builtins();
///
/// let report = tokio::runtime::Runtime::new()
///     .unwrap()
///     .block_on(runtime.run(&registry))
///     .unwrap();
/// assert_eq!(report.items, 3);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineRuntime {
    graph: Graph,
    options: ExecutorOptions,
}

impl PipelineRuntime {
    pub fn new(graph: Graph, options: ExecutorOptions) -> Self {
        Self { graph, options }
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigurationError> {
        let (graph, options) = config.into_parts()?;
        Ok(Self::new(graph, options))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Replace the graph, e.g. after prepend/append surgery
    pub fn map_graph<F>(self, f: F) -> Result<Self, ConfigurationError>
    where
        F: FnOnce(Graph) -> Result<Graph, ConfigurationError>,
    {
        Ok(Self {
            graph: f(self.graph)?,
            options: self.options,
        })
    }

    pub fn check(&self, registry: &PluginRegistry) -> Result<(), Vec<CompileError>> {
        PipelineCompiler::new(registry).check(&self.graph)
    }

    pub fn compile(&self, registry: &PluginRegistry) -> Result<CompiledPipeline, CompileError> {
        PipelineCompiler::new(registry)
            .with_backpressure(self.options.backpressure)
            .compile(&self.graph)
    }

    /// A controller configured from the executor options, ready for observers
    pub fn controller(&self) -> ExecutionController {
        ExecutionController::new(self.options.controller_options())
    }

    /// Compile and run to completion with no observers attached.
    pub async fn run(&self, registry: &PluginRegistry) -> Result<RunReport, CompileError> {
        self.run_with(registry, self.controller()).await
    }

    pub async fn run_with(
        &self,
        registry: &PluginRegistry,
        controller: ExecutionController,
    ) -> Result<RunReport, CompileError> {
        let pipeline = self.compile(registry)?;
        Ok(controller.run(pipeline).await)
    }
}
