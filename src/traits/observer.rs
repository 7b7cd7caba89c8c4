// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::StreamProcessingError;
use crate::traits::plugin::Item;

/// Caller-supplied observer of a pipeline's merged result stream.
///
/// Observers are attached before the pipeline is connected, so they see every
/// item from the first one on.
pub trait PipelineObserver: Send {
    fn on_item(&mut self, item: &Item);

    fn on_error(&mut self, _error: &StreamProcessingError) {}

    fn on_complete(&mut self) {}
}

/// Shared view of the items gathered by a [`CollectingObserver`].
#[derive(Debug, Clone, Default)]
pub struct CollectedItems(Arc<Mutex<Vec<Item>>>);

impl CollectedItems {
    pub fn snapshot(&self) -> Vec<Item> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps every result item in memory.
pub struct CollectingObserver {
    items: CollectedItems,
}

impl CollectingObserver {
    pub fn new() -> (Self, CollectedItems) {
        let items = CollectedItems::default();
        (
            Self {
                items: items.clone(),
            },
            items,
        )
    }
}

impl PipelineObserver for CollectingObserver {
    fn on_item(&mut self, item: &Item) {
        self.items
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.clone());
    }
}

/// Prints each result item to stdout as one JSON line.
#[derive(Default)]
pub struct JsonLinesObserver;

impl PipelineObserver for JsonLinesObserver {
    fn on_item(&mut self, item: &Item) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", item) {
            tracing::warn!(error = %e, "Failed to write result item to stdout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collecting_observer_shares_items() {
        let (mut observer, items) = CollectingObserver::new();
        assert!(items.is_empty());

        observer.on_item(&json!("a"));
        observer.on_item(&json!(2));
        observer.on_error(&StreamProcessingError::new("ignored"));
        observer.on_complete();

        assert_eq!(items.snapshot(), vec![json!("a"), json!(2)]);
        assert_eq!(items.len(), 2);
    }
}
