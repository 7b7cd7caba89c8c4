// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Publish-once, subscribe-many adapter for fan-out stages.
//!
//! A stage with several successors is polled by a single pump task. Each
//! successor reads from its own [`queue`](super::queue), created when it
//! subscribes; all subscriptions exist before the pump starts, so no subscriber
//! misses the head of the stream. The upstream plugin therefore processes every
//! item once, however many successors it has.

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};

use super::queue::{queue, BackpressurePolicy, QueueSender};
use crate::traits::ItemStream;

pub struct Multicast {
    node: String,
    source: ItemStream,
    policy: BackpressurePolicy,
    subscribers: Vec<QueueSender>,
}

impl Multicast {
    pub fn new(node: impl Into<String>, source: ItemStream, policy: BackpressurePolicy) -> Self {
        Self {
            node: node.into(),
            source,
            policy,
            subscribers: Vec::new(),
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    /// A new stream replaying every element the source will produce
    pub fn subscribe(&mut self) -> ItemStream {
        let name = format!("{}#{}", self.node, self.subscribers.len());
        let (sender, receiver) = queue(name, self.policy);
        self.subscribers.push(sender);
        receiver.into_stream()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// The pump: pulls the source and hands a copy of each element to every
    /// live subscriber, in source order.
    ///
    /// Stops at the source's end, after forwarding an error, or once every
    /// subscriber has gone away. Dropping the pump closes all subscriptions.
    pub fn into_driver(self) -> BoxFuture<'static, ()> {
        let Multicast {
            node,
            mut source,
            subscribers,
            ..
        } = self;

        async move {
            let mut live = subscribers;
            while let Some(element) = source.next().await {
                let is_error = element.is_err();

                let mut still_live = Vec::with_capacity(live.len());
                for subscriber in live {
                    if subscriber.send(element.clone()).await.is_ok() {
                        still_live.push(subscriber);
                    }
                }
                live = still_live;

                if live.is_empty() {
                    tracing::debug!(node = %node, "Every subscriber left; stopping shared stage");
                    break;
                }
                if is_error {
                    break;
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OverflowPolicy;
    use futures::stream;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_every_subscriber_sees_every_item_once_produced() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = pulls.clone();
        let source = stream::iter(1..=3)
            .map(move |n| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(json!(n))
            })
            .boxed();

        let mut multicast = Multicast::new("a", source, BackpressurePolicy::default());
        let left = multicast.subscribe();
        let right = multicast.subscribe();
        assert_eq!(multicast.subscriber_count(), 2);

        let pump = tokio::spawn(multicast.into_driver());
        let (left, right) = tokio::join!(
            left.collect::<Vec<_>>(),
            right.collect::<Vec<_>>()
        );
        pump.await.unwrap();

        let expected = vec![Ok(json!(1)), Ok(json!(2)), Ok(json!(3))];
        assert_eq!(left, expected);
        assert_eq!(right, expected);
        assert_eq!(pulls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pump_continues_for_remaining_subscriber() {
        let source = stream::iter(0..100).map(|n| Ok(json!(n))).boxed();
        let mut multicast = Multicast::new(
            "a",
            source,
            BackpressurePolicy::bounded(4, OverflowPolicy::Block),
        );
        let kept = multicast.subscribe();
        drop(multicast.subscribe());

        let pump = tokio::spawn(multicast.into_driver());
        let items: Vec<_> = kept.collect().await;
        pump.await.unwrap();

        assert_eq!(items.len(), 100);
    }
}
