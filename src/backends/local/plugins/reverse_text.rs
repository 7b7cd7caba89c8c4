// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::map_text;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemStream, Plugin};

/// Reverses text items character by character.
pub struct ReverseText;

impl Plugin for ReverseText {
    fn name(&self) -> &'static str {
        "reverse_text"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn configure(
        &self,
        _config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredReverseText))
    }
}

struct ConfiguredReverseText;

impl ConfiguredPlugin for ConfiguredReverseText {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        map_text("reverse_text", inputs, |text| {
            Item::String(text.chars().rev().collect())
        })
    }
}
