// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline compilation and execution.
//!
//! * [`PipelineCompiler`] binds every node of a [`Graph`](crate::graph::Graph)
//!   to a configured plugin, producing a [`CompiledPipeline`]
//! * [`ExecutionController`] runs a compiled pipeline to completion and
//!   returns a [`RunReport`]
//!
//! Buffers between concurrently running tasks are [`queue`]s governed by a
//! [`BackpressurePolicy`].

pub mod completion;
pub mod compiler;
pub mod controller;
pub mod multicast;
pub mod queue;

pub use completion::{CompletionSignal, CompletionTracker};
pub use compiler::{CompiledPipeline, PipelineCompiler, StageSummary, TerminalStream};
pub use controller::{ControllerOptions, ExecutionController, RunReport};
pub use multicast::Multicast;
pub use queue::{BackpressurePolicy, OverflowPolicy};
