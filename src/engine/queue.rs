// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded buffer between two pipeline tasks.
//!
//! Every hand-off between concurrently running tasks (multicast subscriber
//! queues and the controller's merge queue) goes through one of these queues,
//! so a single [`BackpressurePolicy`] governs how much a fast producer may run
//! ahead of a slow consumer.
//!
//! # Overflow
//!
//! When a bounded queue is full:
//! - **Block**: the producer waits until the consumer takes an item
//! - **DropOldest**: the oldest buffered item is discarded to make room
//! - **DropNewest**: the incoming item is discarded
//!
//! Errors are never discarded: an `Err` element is always enqueued, even past
//! capacity, so a failing branch is still observed downstream. Discarded item
//! counts are logged once the consumer side goes away.
//!
//! The queue is multi-producer, single-consumer. It closes once every
//! [`QueueSender`] is dropped; sends fail once the [`QueueReceiver`] is dropped.

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

use crate::config::consts::DEFAULT_BUFFER_CAPACITY;
use crate::observability::messages::plugin::BufferOverflow;
use crate::observability::messages::StructuredLog;
use crate::traits::{ItemResult, ItemStream};

/// What a full queue does with the next item.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    #[default]
    Block,
    DropOldest,
    DropNewest,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Block => "block",
            OverflowPolicy::DropOldest => "drop_oldest",
            OverflowPolicy::DropNewest => "drop_newest",
        }
    }
}

/// Buffering contract applied to every inter-task queue of a run.
///
/// `capacity: None` (`null` in a configuration file) makes queues unbounded,
/// in which case `overflow` never applies.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct BackpressurePolicy {
    #[serde(default = "default_capacity")]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_capacity() -> Option<usize> {
    Some(DEFAULT_BUFFER_CAPACITY)
}

impl Default for BackpressurePolicy {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl BackpressurePolicy {
    pub fn bounded(capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            capacity: Some(capacity),
            overflow,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            overflow: OverflowPolicy::Block,
        }
    }
}

struct State {
    items: VecDeque<ItemResult>,
    senders: usize,
    receiver_alive: bool,
    dropped: u64,
}

struct Shared {
    name: String,
    policy: BackpressurePolicy,
    state: Mutex<State>,
    /// Wakes the consumer; a stored permit covers a push that races its check.
    readable: Notify,
    /// Wakes every blocked producer when room appears or the consumer leaves.
    writable: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create a queue named `name` (used in overflow logs) governed by `policy`.
pub fn queue(name: impl Into<String>, policy: BackpressurePolicy) -> (QueueSender, QueueReceiver) {
    let shared = Arc::new(Shared {
        name: name.into(),
        policy,
        state: Mutex::new(State {
            items: VecDeque::new(),
            senders: 1,
            receiver_alive: true,
            dropped: 0,
        }),
        readable: Notify::new(),
        writable: Notify::new(),
    });

    (
        QueueSender {
            shared: shared.clone(),
        },
        QueueReceiver { shared },
    )
}

pub struct QueueSender {
    shared: Arc<Shared>,
}

impl QueueSender {
    /// Enqueue `item` according to the queue's policy.
    ///
    /// Returns the item back once the receiver is gone; the caller should stop
    /// producing for this queue.
    pub async fn send(&self, item: ItemResult) -> Result<(), ItemResult> {
        loop {
            let writable = self.shared.writable.notified();
            tokio::pin!(writable);
            writable.as_mut().enable();

            {
                let mut state = self.shared.lock();
                if !state.receiver_alive {
                    return Err(item);
                }

                let has_room = match self.shared.policy.capacity {
                    None => true,
                    Some(capacity) => state.items.len() < capacity,
                };

                if has_room || item.is_err() {
                    state.items.push_back(item);
                    drop(state);
                    self.shared.readable.notify_one();
                    return Ok(());
                }

                match self.shared.policy.overflow {
                    OverflowPolicy::Block => {}
                    OverflowPolicy::DropOldest => {
                        let oldest = state.items.iter().position(|queued| queued.is_ok());
                        match oldest {
                            Some(position) => {
                                state.items.remove(position);
                                state.dropped += 1;
                                state.items.push_back(item);
                            }
                            // Only errors are buffered; keep them and drop the newcomer
                            None => state.dropped += 1,
                        }
                        drop(state);
                        self.shared.readable.notify_one();
                        return Ok(());
                    }
                    OverflowPolicy::DropNewest => {
                        state.dropped += 1;
                        return Ok(());
                    }
                }
            }

            writable.await;
        }
    }
}

impl Clone for QueueSender {
    fn clone(&self) -> Self {
        self.shared.lock().senders += 1;
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl Drop for QueueSender {
    fn drop(&mut self) {
        let remaining = {
            let mut state = self.shared.lock();
            state.senders -= 1;
            state.senders
        };
        if remaining == 0 {
            self.shared.readable.notify_one();
        }
    }
}

pub struct QueueReceiver {
    shared: Arc<Shared>,
}

impl QueueReceiver {
    /// Next buffered element, or `None` once the queue is drained and every
    /// sender has been dropped.
    pub async fn recv(&mut self) -> Option<ItemResult> {
        loop {
            let readable = self.shared.readable.notified();

            {
                let mut state = self.shared.lock();
                if let Some(item) = state.items.pop_front() {
                    drop(state);
                    self.shared.writable.notify_waiters();
                    return Some(item);
                }
                if state.senders == 0 {
                    return None;
                }
            }

            readable.await;
        }
    }

    /// Items discarded by the overflow policy so far
    pub fn dropped(&self) -> u64 {
        self.shared.lock().dropped
    }

    pub fn into_stream(self) -> ItemStream {
        stream::unfold(self, |mut receiver| async move {
            receiver.recv().await.map(|item| (item, receiver))
        })
        .boxed()
    }
}

impl Drop for QueueReceiver {
    fn drop(&mut self) {
        let dropped = {
            let mut state = self.shared.lock();
            state.receiver_alive = false;
            state.items.clear();
            state.dropped
        };
        self.shared.writable.notify_waiters();

        if dropped > 0 {
            BufferOverflow {
                buffer: &self.shared.name,
                dropped,
                capacity: self.shared.policy.capacity.unwrap_or(0),
                overflow: self.shared.policy.overflow.as_str(),
            }
            .log();
        }
    }
}
