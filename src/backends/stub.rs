// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::PluginRegistry;
use crate::errors::{PluginConfigurationError, StreamProcessingError};
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemResult, ItemStream, Plugin};

/// Counters shared by every stub plugin built from the same probe.
#[derive(Clone, Default)]
pub struct Probe {
    configures: Arc<AtomicUsize>,
    binds: Arc<AtomicUsize>,
    emissions: Arc<AtomicUsize>,
    seen: Arc<Mutex<HashMap<String, Vec<Item>>>>,
}

impl Probe {
    pub fn configures(&self) -> usize {
        self.configures.load(Ordering::SeqCst)
    }

    pub fn binds(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }

    /// Items produced by source stubs, counted as they are pulled
    pub fn emissions(&self) -> usize {
        self.emissions.load(Ordering::SeqCst)
    }

    /// Items a recorder labelled `label` passed through
    pub fn seen(&self, label: &str) -> Vec<Item> {
        self.seen
            .lock()
            .unwrap()
            .get(label)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy)]
enum Behavior {
    /// Emits the JSON array in `items`
    Source,
    /// Merges its inputs, recording each item under `label`
    Record,
    /// Forwards `after` items, then fails
    FailAfter,
    /// Refuses every configuration
    Reject,
    /// Panics when first polled
    Panic,
    /// Never produces and never ends
    Pending,
}

/// Test-only plugin with observable side effects.
pub struct StubPlugin {
    name: &'static str,
    behavior: Behavior,
    probe: Probe,
}

impl StubPlugin {
    pub fn source(probe: &Probe) -> Self {
        Self::new("stub_source", Behavior::Source, probe)
    }

    pub fn recorder(probe: &Probe) -> Self {
        Self::new("stub_record", Behavior::Record, probe)
    }

    pub fn failing(probe: &Probe) -> Self {
        Self::new("stub_fail", Behavior::FailAfter, probe)
    }

    pub fn rejecting(probe: &Probe) -> Self {
        Self::new("stub_reject", Behavior::Reject, probe)
    }

    pub fn panicking(probe: &Probe) -> Self {
        Self::new("stub_panic", Behavior::Panic, probe)
    }

    pub fn pending(probe: &Probe) -> Self {
        Self::new("stub_pending", Behavior::Pending, probe)
    }

    fn new(name: &'static str, behavior: Behavior, probe: &Probe) -> Self {
        Self {
            name,
            behavior,
            probe: probe.clone(),
        }
    }
}

impl Plugin for StubPlugin {
    fn name(&self) -> &'static str {
        self.name
    }

    fn arity(&self) -> Arity {
        match self.behavior {
            Behavior::Source | Behavior::Pending => Arity::Exactly(0),
            Behavior::Record => Arity::AtLeast(1),
            Behavior::FailAfter | Behavior::Reject | Behavior::Panic => Arity::Any,
        }
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        self.probe.configures.fetch_add(1, Ordering::SeqCst);

        let items: Vec<Item> = match config.get("items") {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| PluginConfigurationError::invalid("items", raw, e.to_string()))?,
            None => Vec::new(),
        };
        let after: usize = match config.get("after") {
            Some(raw) => raw
                .parse()
                .map_err(|_| PluginConfigurationError::invalid("after", raw, "not a count"))?,
            None => 0,
        };

        if let Behavior::Reject = self.behavior {
            return Err(PluginConfigurationError::MissingOption {
                key: "anything".to_string(),
            });
        }

        Ok(Box::new(ConfiguredStub {
            behavior: self.behavior,
            probe: self.probe.clone(),
            label: config.get("label").unwrap_or_default().to_string(),
            items,
            after,
        }))
    }
}

struct ConfiguredStub {
    behavior: Behavior,
    probe: Probe,
    label: String,
    items: Vec<Item>,
    after: usize,
}

impl ConfiguredPlugin for ConfiguredStub {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        self.probe.binds.fetch_add(1, Ordering::SeqCst);
        let ConfiguredStub {
            behavior,
            probe,
            label,
            items,
            after,
        } = *self;

        match behavior {
            Behavior::Source => {
                let emissions = probe.emissions.clone();
                stream::iter(items)
                    .map(move |item| {
                        emissions.fetch_add(1, Ordering::SeqCst);
                        Ok(item)
                    })
                    .boxed()
            }
            Behavior::Record => {
                let seen = probe.seen.clone();
                stream::select_all(inputs)
                    .map(move |element| {
                        if let Ok(item) = &element {
                            seen.lock()
                                .unwrap()
                                .entry(label.clone())
                                .or_default()
                                .push(item.clone());
                        }
                        element
                    })
                    .boxed()
            }
            Behavior::FailAfter => stream::select_all(inputs)
                .take(after)
                .chain(stream::once(async {
                    Err(StreamProcessingError::new("stub failure"))
                }))
                .boxed(),
            Behavior::Panic => stream::poll_fn(|_| -> std::task::Poll<Option<ItemResult>> {
                panic!("stub panic")
            })
            .boxed(),
            Behavior::Pending => stream::pending().boxed(),
            Behavior::Reject => stream::empty().boxed(),
        }
    }
}

/// A registry holding one of each stub, all reporting to `probe`.
pub fn stub_registry(probe: &Probe) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(StubPlugin::source(probe))).unwrap();
    registry.register(Arc::new(StubPlugin::recorder(probe))).unwrap();
    registry.register(Arc::new(StubPlugin::failing(probe))).unwrap();
    registry.register(Arc::new(StubPlugin::rejecting(probe))).unwrap();
    registry.register(Arc::new(StubPlugin::panicking(probe))).unwrap();
    registry.register(Arc::new(StubPlugin::pending(probe))).unwrap();
    registry
}
