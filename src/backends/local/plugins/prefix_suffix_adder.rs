// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::map_text;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemStream, Plugin};

const DEFAULT_PREFIX: &str = "[";
const DEFAULT_SUFFIX: &str = "]";

/// Wraps text items in `prefix` and `suffix` (default `[` and `]`).
pub struct PrefixSuffixAdder;

impl Plugin for PrefixSuffixAdder {
    fn name(&self) -> &'static str {
        "prefix_suffix_adder"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredPrefixSuffixAdder {
            prefix: config.get("prefix").unwrap_or(DEFAULT_PREFIX).to_string(),
            suffix: config.get("suffix").unwrap_or(DEFAULT_SUFFIX).to_string(),
        }))
    }
}

struct ConfiguredPrefixSuffixAdder {
    prefix: String,
    suffix: String,
}

impl ConfiguredPlugin for ConfiguredPrefixSuffixAdder {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        let ConfiguredPrefixSuffixAdder { prefix, suffix } = *self;
        map_text("prefix_suffix_adder", inputs, move |text| {
            Item::String(format!("{}{}{}", prefix, text, suffix))
        })
    }
}
