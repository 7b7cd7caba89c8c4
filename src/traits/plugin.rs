// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::stream::BoxStream;
use std::fmt;

use crate::errors::{PluginConfigurationError, StreamProcessingError};
use crate::graph::NodeConfig;

/// The unit of data flowing between stages.
pub type Item = serde_json::Value;

/// One element of a stage stream: an item, or the failure that ends the branch.
pub type ItemResult = Result<Item, StreamProcessingError>;

/// A bound, runnable stage output.
pub type ItemStream = BoxStream<'static, ItemResult>;

/// Number of input streams a plugin can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(&self, inputs: usize) -> bool {
        match *self {
            Arity::Exactly(n) => inputs == n,
            Arity::AtLeast(n) => inputs >= n,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// A named, pluggable unit of stream logic.
///
/// Implementations are registered once in a [`PluginRegistry`] and looked up by
/// [`Plugin::name`]. Every node naming the plugin gets its own configured
/// instance through [`Plugin::configure`].
///
/// [`PluginRegistry`]: crate::config::PluginRegistry
pub trait Plugin: Send + Sync {
    /// Stable registry key
    fn name(&self) -> &'static str;

    /// Input streams the plugin can be bound to. Checked by the compiler before binding.
    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError>;
}

/// A plugin instance configured for one node.
///
/// `bind` consumes the instance, so each stage is bound exactly once. The
/// inputs arrive in the node's declared predecessor order; a source stage is
/// bound with no inputs and must not produce anything until its stream is polled.
/// Resources a stage acquires should be owned by the returned stream so that
/// dropping it (completion, failure or cancellation) releases them.
pub trait ConfiguredPlugin: Send {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream;
}
