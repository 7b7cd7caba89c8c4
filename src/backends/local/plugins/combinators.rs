// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_stream::stream;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;

use super::merged;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemResult, ItemStream, Plugin};

/// Interleaves its inputs as items arrive.
///
/// Registered twice: as `merge`, and as `identity`, the pass-through a single
/// input graph reads more naturally with.
pub struct Merge {
    name: &'static str,
}

impl Merge {
    pub fn new() -> Self {
        Self { name: "merge" }
    }

    pub fn identity() -> Self {
        Self { name: "identity" }
    }
}

impl Default for Merge {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for Merge {
    fn name(&self) -> &'static str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn configure(
        &self,
        _config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredMerge))
    }
}

struct ConfiguredMerge;

impl ConfiguredPlugin for ConfiguredMerge {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        merged(inputs)
    }
}

/// Emits its inputs one after another, in predecessor order.
///
/// Every input is pulled as soon as it has data; items of an input whose turn
/// has not come yet are held here. Inputs sharing an upstream stage therefore
/// never stall that stage's other subscribers. An error from any input is
/// emitted at once and ends the stream.
pub struct Concat;

impl Plugin for Concat {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn configure(
        &self,
        _config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredConcat))
    }
}

struct ConfiguredConcat;

impl ConfiguredPlugin for ConfiguredConcat {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        let count = inputs.len();
        // `None` marks the end of input `index`
        let mut tagged = stream::select_all(inputs.into_iter().enumerate().map(|(index, input)| {
            input
                .map(move |element| (index, Some(element)))
                .chain(stream::once(async move { (index, None::<ItemResult>) }))
                .boxed()
        }));

        stream! {
            let mut held: Vec<VecDeque<Item>> = (0..count).map(|_| VecDeque::new()).collect();
            let mut finished = vec![false; count];
            let mut current = 0;

            while let Some((index, element)) = tagged.next().await {
                match element {
                    Some(Err(error)) => {
                        yield Err(error);
                        return;
                    }
                    Some(Ok(item)) if index == current => {
                        yield Ok(item);
                    }
                    Some(Ok(item)) => held[index].push_back(item),
                    None => {
                        finished[index] = true;
                        while current < count && finished[current] {
                            current += 1;
                            if current < count {
                                while let Some(item) = held[current].pop_front() {
                                    yield Ok(item);
                                }
                            }
                        }
                    }
                }
            }
        }
        .boxed()
    }
}
