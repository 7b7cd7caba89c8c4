// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph-to-pipeline compiler.
//!
//! Turns a validated [`Graph`] into bound stream stages by walking it
//! depth-first from its roots. Each node is compiled at most once per session;
//! the session memo maps node index to the node's output:
//!
//! ```text
//!   stages[i] = Single(stream)   one successor takes the stream
//!             | Shared(multicast) each successor subscribes
//!             | Terminal          output joined the terminal list
//! ```
//!
//! # Algorithm
//!
//! `compile_node(n)`:
//! 1. return if `n` is memoized
//! 2. compile every predecessor of `n`, then re-check the memo, since a
//!    predecessor compiled in step 2 may have compiled `n` through its own
//!    successors
//! 3. resolve and configure the plugin, check its arity
//! 4. take one input per predecessor, in declared predecessor order
//! 5. bind, wrap the output in the stage tap, memoize
//! 6. terminal nodes join the terminal list; otherwise compile each successor
//!
//! A node reachable along several paths is compiled on the first path that
//! reaches it. Multicast pumps are returned as drivers and only run once the
//! execution controller connects the pipeline.

use futures::future::BoxFuture;
use futures::StreamExt;
use std::time::Instant;

use super::multicast::Multicast;
use super::queue::BackpressurePolicy;
use crate::config::PluginRegistry;
use crate::errors::{CompileError, PluginConfigurationError};
use crate::graph::{Graph, Node, ProcessMetadata};
use crate::observability::messages::compiler::{
    CompilationCompleted, CompilationFailed, CompilationStarted, StageCompiled,
};
use crate::observability::messages::plugin::StageFinished;
use crate::observability::messages::StructuredLog;
use crate::traits::{ConfiguredPlugin, ItemStream};

/// Shape of one compiled stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub name: String,
    pub plugin: String,
    pub inputs: usize,
    pub outputs: usize,
}

impl StageSummary {
    pub fn is_shared(&self) -> bool {
        self.outputs > 1
    }
}

/// Output of a terminal stage, to be merged into the run's result stream.
pub struct TerminalStream {
    pub node: String,
    pub stream: ItemStream,
}

/// Pump of a shared stage; must be polled for its subscribers to see data.
pub struct StageDriver {
    pub node: String,
    pub future: BoxFuture<'static, ()>,
}

/// A compiled, not yet running pipeline.
///
/// Nothing flows until [`ExecutionController::run`](super::ExecutionController::run)
/// connects it.
pub struct CompiledPipeline {
    process: ProcessMetadata,
    stages: Vec<StageSummary>,
    terminals: Vec<TerminalStream>,
    drivers: Vec<StageDriver>,
}

impl CompiledPipeline {
    pub fn process(&self) -> &ProcessMetadata {
        &self.process
    }

    /// Stages in compilation order
    pub fn stages(&self) -> &[StageSummary] {
        &self.stages
    }

    pub fn stage(&self, name: &str) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn terminal_names(&self) -> Vec<&str> {
        self.terminals.iter().map(|t| t.node.as_str()).collect()
    }

    pub fn shared_stage_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn into_parts(self) -> (ProcessMetadata, Vec<TerminalStream>, Vec<StageDriver>) {
        (self.process, self.terminals, self.drivers)
    }
}

enum StageOutput {
    Single(Option<ItemStream>),
    Shared(Multicast),
    Terminal,
}

pub struct PipelineCompiler<'r> {
    registry: &'r PluginRegistry,
    backpressure: BackpressurePolicy,
}

impl<'r> PipelineCompiler<'r> {
    pub fn new(registry: &'r PluginRegistry) -> Self {
        Self {
            registry,
            backpressure: BackpressurePolicy::default(),
        }
    }

    /// Buffering applied to the subscriber queues of shared stages
    pub fn with_backpressure(mut self, policy: BackpressurePolicy) -> Self {
        self.backpressure = policy;
        self
    }

    pub fn compile(&self, graph: &Graph) -> Result<CompiledPipeline, CompileError> {
        let started = Instant::now();
        CompilationStarted {
            process_name: &graph.process().name,
            node_count: graph.len(),
            root_count: graph.root_indices().len(),
        }
        .log();

        let mut session = CompileSession {
            graph,
            registry: self.registry,
            backpressure: self.backpressure,
            stages: (0..graph.len()).map(|_| None).collect(),
            summaries: Vec::with_capacity(graph.len()),
            terminals: Vec::new(),
        };

        for &root in graph.root_indices() {
            if let Err(error) = session.compile_node(root) {
                CompilationFailed { error: &error }.log();
                return Err(error);
            }
        }

        let pipeline = session.finish();
        CompilationCompleted {
            stage_count: pipeline.stages.len(),
            terminal_count: pipeline.terminals.len(),
            shared_count: pipeline.drivers.len(),
            duration: started.elapsed(),
        }
        .log();

        Ok(pipeline)
    }

    /// Resolve and configure every node and check its arity without binding.
    ///
    /// Reports every problem rather than stopping at the first.
    pub fn check(&self, graph: &Graph) -> Result<(), Vec<CompileError>> {
        let errors: Vec<CompileError> = graph
            .nodes()
            .filter_map(|node| {
                let input_count = graph.predecessors(node.name()).len();
                configure_node(self.registry, node, input_count).err()
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn configure_node(
    registry: &PluginRegistry,
    node: &Node,
    input_count: usize,
) -> Result<Box<dyn ConfiguredPlugin>, CompileError> {
    let plugin = registry
        .resolve(node.plugin_name())
        .map_err(|source| CompileError::PluginNotFound {
            node: node.name().to_string(),
            source,
        })?;

    let configuration_error = |source| CompileError::PluginConfiguration {
        node: node.name().to_string(),
        plugin: node.plugin_name().to_string(),
        source,
    };

    let arity = plugin.arity();
    if !arity.accepts(input_count) {
        return Err(configuration_error(PluginConfigurationError::InputArity {
            expected: arity.to_string(),
            actual: input_count,
        }));
    }

    plugin.configure(node.config()).map_err(configuration_error)
}

struct CompileSession<'a> {
    graph: &'a Graph,
    registry: &'a PluginRegistry,
    backpressure: BackpressurePolicy,
    stages: Vec<Option<StageOutput>>,
    summaries: Vec<StageSummary>,
    terminals: Vec<TerminalStream>,
}

impl CompileSession<'_> {
    fn compile_node(&mut self, index: usize) -> Result<(), CompileError> {
        if self.stages[index].is_some() {
            return Ok(());
        }

        let graph = self.graph;
        let predecessors = graph.predecessor_indices(index);
        for &predecessor in predecessors {
            self.compile_node(predecessor)?;
        }
        if self.stages[index].is_some() {
            return Ok(());
        }

        let node = graph.node_at(index);
        let configured = configure_node(self.registry, node, predecessors.len())?;

        let mut inputs = Vec::with_capacity(predecessors.len());
        for &predecessor in predecessors {
            inputs.push(self.take_output(predecessor)?);
        }

        let stream = stage_tap(node.name().to_string(), configured.bind(inputs));

        let successors = graph.successor_indices(index);
        let output = match successors.len() {
            0 => {
                self.terminals.push(TerminalStream {
                    node: node.name().to_string(),
                    stream,
                });
                StageOutput::Terminal
            }
            1 => StageOutput::Single(Some(stream)),
            _ => StageOutput::Shared(Multicast::new(node.name(), stream, self.backpressure)),
        };
        self.stages[index] = Some(output);

        let summary = StageSummary {
            name: node.name().to_string(),
            plugin: node.plugin_name().to_string(),
            inputs: predecessors.len(),
            outputs: successors.len(),
        };
        StageCompiled {
            node: &summary.name,
            plugin: &summary.plugin,
            input_count: summary.inputs,
            output_count: summary.outputs,
        }
        .log();
        self.summaries.push(summary);

        for &successor in successors {
            self.compile_node(successor)?;
        }
        Ok(())
    }

    fn take_output(&mut self, index: usize) -> Result<ItemStream, CompileError> {
        match &mut self.stages[index] {
            Some(StageOutput::Single(slot)) => slot.take(),
            Some(StageOutput::Shared(multicast)) => Some(multicast.subscribe()),
            Some(StageOutput::Terminal) | None => None,
        }
        .ok_or_else(|| CompileError::StageAlreadyConsumed {
            node: self.graph.node_at(index).name().to_string(),
        })
    }

    fn finish(self) -> CompiledPipeline {
        let drivers = self
            .stages
            .into_iter()
            .flatten()
            .filter_map(|output| match output {
                StageOutput::Shared(multicast) => Some(StageDriver {
                    node: multicast.node().to_string(),
                    future: multicast.into_driver(),
                }),
                _ => None,
            })
            .collect();

        CompiledPipeline {
            process: self.graph.process().clone(),
            stages: self.summaries,
            terminals: self.terminals,
            drivers,
        }
    }
}

/// Stamps errors with the stage name and ends the stream after the first one.
fn stage_tap(node: String, mut inner: ItemStream) -> ItemStream {
    async_stream::stream! {
        let mut items = 0u64;
        while let Some(element) = inner.next().await {
            match element {
                Ok(item) => {
                    items += 1;
                    yield Ok(item);
                }
                Err(error) => {
                    StageFinished { stage: &node, items, failed: true }.log();
                    yield Err(error.in_stage(&node));
                    return;
                }
            }
        }
        StageFinished { stage: &node, items, failed: false }.log();
    }
    .boxed()
}
