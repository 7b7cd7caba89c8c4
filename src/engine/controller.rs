// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run-to-completion execution of a compiled pipeline.
//!
//! # Execution Flow
//!
//! 1. **Merge**: every terminal stream gets a forwarding task feeding one shared
//!    merge queue; items from different branches interleave in arrival order
//! 2. **Tap**: a single completion tap consumes the merge queue, notifies the
//!    caller's observers and applies the [`FailureStrategy`]
//! 3. **Connect**: only once the tap and every observer are in place are the
//!    branch and multicast pump tasks spawned on the tokio worker pool
//! 4. **Wait**: the caller waits on a [`CompletionTracker`] expecting the tap's
//!    one signal
//! 5. **Report**: leftover tasks are cancelled and joined; a [`RunReport`] is
//!    returned
//!
//! # Failure Handling
//!
//! - **FailFast**: the first error ends the merged stream and cancels every
//!   other task
//! - **ContinueOnError**: the failing branch ends, the others run to completion
//!
//! Each failing stage is reported once, however many branches it feeds.
//!
//! A panic inside a branch or pump task is caught and delivered to the tap as a
//! [`StreamProcessingError`] attributed to that task's node.
//!
//! # Cancellation
//!
//! [`ExecutionController::cancellation_token`] hands out a token; cancelling it
//! stops every task, dropping their streams and the plugin resources they own.

use futures::future::{join_all, BoxFuture};
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::compiler::{CompiledPipeline, StageDriver, TerminalStream};
use super::completion::{CompletionSignal, CompletionTracker};
use super::queue::{queue, BackpressurePolicy, QueueReceiver, QueueSender};
use crate::errors::{FailureStrategy, StreamProcessingError};
use crate::observability::messages::engine::{
    BranchFailed, ExecutionCancelled, ExecutionCompleted, ExecutionFailed, ExecutionStarted,
    TaskPanicked,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ItemStream, PipelineObserver};

/// Knobs applied to one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    pub failure_strategy: FailureStrategy,
    /// Buffering of the merge queue between branches and the completion tap
    pub backpressure: BackpressurePolicy,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Result items delivered to the observers
    pub items: u64,
    pub failures: Vec<StreamProcessingError>,
    pub cancelled: bool,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

#[derive(Default)]
struct TapOutcome {
    items: u64,
    failures: Vec<StreamProcessingError>,
}

pub struct ExecutionController {
    options: ControllerOptions,
    observers: Vec<Box<dyn PipelineObserver>>,
    cancellation: CancellationToken,
}

impl ExecutionController {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            observers: Vec::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Attach an observer of the merged result stream.
    pub fn with_observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Token that cancels the run from outside
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub async fn run(self, pipeline: CompiledPipeline) -> RunReport {
        let started = Instant::now();
        let ExecutionController {
            options,
            observers,
            cancellation,
        } = self;
        // Child token: a fail-fast stop must not look like an external cancel
        let run_token = cancellation.child_token();

        let (process, terminals, drivers) = pipeline.into_parts();
        let start_message = ExecutionStarted {
            process_name: &process.name,
            branch_count: terminals.len(),
            strategy: options.failure_strategy,
        };
        start_message.log();
        let span = start_message.span("run");

        let tracker = CompletionTracker::new(usize::from(!terminals.is_empty()));
        let (merge_sender, merge_receiver) = queue("merge", options.backpressure);

        let tap = tokio::spawn(
            completion_tap(
                merge_receiver,
                observers,
                options.failure_strategy,
                run_token.clone(),
                tracker.signal(),
            )
            .instrument(span.clone()),
        );

        let handles = connect(terminals, drivers, &merge_sender, &run_token, &span);
        drop(merge_sender);

        tracker.wait().await;
        run_token.cancel();
        join_all(handles).await;

        let outcome = match tap.await {
            Ok(outcome) => outcome,
            Err(join_error) => TapOutcome {
                items: 0,
                failures: vec![StreamProcessingError::new(format!(
                    "completion tap stopped: {}",
                    join_error
                ))],
            },
        };

        let report = RunReport {
            items: outcome.items,
            failures: outcome.failures,
            cancelled: cancellation.is_cancelled(),
            duration: started.elapsed(),
        };

        if report.cancelled {
            ExecutionCancelled {
                process_name: &process.name,
                reason: "cancellation requested",
            }
            .log();
        } else if report.failures.is_empty() {
            ExecutionCompleted {
                process_name: &process.name,
                items: report.items,
                duration: report.duration,
            }
            .log();
        } else {
            ExecutionFailed {
                process_name: &process.name,
                failure_count: report.failures.len(),
                items: report.items,
                duration: report.duration,
            }
            .log();
        }

        report
    }
}

/// Spawn every branch and pump task. Each holds a merge sender so a panic can
/// still be reported, and each stops when `token` is cancelled.
fn connect(
    terminals: Vec<TerminalStream>,
    drivers: Vec<StageDriver>,
    merge_sender: &QueueSender,
    token: &CancellationToken,
    span: &tracing::Span,
) -> Vec<JoinHandle<()>> {
    let branches = terminals.into_iter().map(|terminal| {
        let forward = forward_branch(terminal.stream, merge_sender.clone());
        (terminal.node, forward)
    });
    let pumps = drivers
        .into_iter()
        .map(|driver| (driver.node, driver.future));

    branches
        .chain(pumps)
        .map(|(node, task)| {
            tokio::spawn(
                guarded(node, task, merge_sender.clone(), token.clone()).instrument(span.clone()),
            )
        })
        .collect()
}

fn forward_branch(mut stream: ItemStream, sender: QueueSender) -> BoxFuture<'static, ()> {
    async move {
        while let Some(element) = stream.next().await {
            if sender.send(element).await.is_err() {
                break;
            }
        }
    }
    .boxed()
}

async fn guarded(
    node: String,
    task: BoxFuture<'static, ()>,
    panic_sink: QueueSender,
    token: CancellationToken,
) {
    tokio::select! {
        _ = token.cancelled() => {}
        result = AssertUnwindSafe(task).catch_unwind() => {
            if let Err(payload) = result {
                let message = panic_message(payload.as_ref());
                TaskPanicked { task: &node, message: &message }.log();
                let error = StreamProcessingError::new(format!("task panicked: {}", message))
                    .in_stage(&node);
                let _ = panic_sink.send(Err(error)).await;
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

async fn completion_tap(
    receiver: QueueReceiver,
    mut observers: Vec<Box<dyn PipelineObserver>>,
    strategy: FailureStrategy,
    token: CancellationToken,
    signal: CompletionSignal,
) -> TapOutcome {
    let mut merged = receiver.into_stream();
    let mut outcome = TapOutcome::default();
    let mut failed_stages = HashSet::new();

    while let Some(element) = merged.next().await {
        match element {
            Ok(item) => {
                outcome.items += 1;
                for observer in observers.iter_mut() {
                    observer.on_item(&item);
                }
            }
            Err(error) => {
                // A shared stage replays its failure to every subscriber
                if let Some(stage) = &error.stage {
                    if !failed_stages.insert(stage.clone()) {
                        continue;
                    }
                }
                BranchFailed {
                    branch: error.stage.as_deref().unwrap_or("unknown"),
                    error: &error,
                }
                .log();
                for observer in observers.iter_mut() {
                    observer.on_error(&error);
                }
                outcome.failures.push(error);

                if strategy == FailureStrategy::FailFast {
                    token.cancel();
                    break;
                }
            }
        }
    }

    for observer in observers.iter_mut() {
        observer.on_complete();
    }
    signal.complete();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_success() {
        let cases = vec![
            (RunReport::default(), true),
            (
                RunReport {
                    cancelled: true,
                    ..RunReport::default()
                },
                false,
            ),
            (
                RunReport {
                    failures: vec![StreamProcessingError::new("x")],
                    ..RunReport::default()
                },
                false,
            ),
        ];

        for (report, expected) in cases {
            assert_eq!(report.is_success(), expected, "{:?}", report);
        }
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
