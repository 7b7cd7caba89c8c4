// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use super::map_text;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, ItemStream, Plugin};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TokenCounts {
    pub char_count: usize,
    pub word_count: usize,
    pub line_count: usize,
}

impl TokenCounts {
    pub fn of(text: &str) -> Self {
        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            // An empty text is still one (empty) line
            line_count: text.lines().count().max(1),
        }
    }
}

/// Replaces each text item with its character, word and line counts.
pub struct TokenCounter;

impl Plugin for TokenCounter {
    fn name(&self) -> &'static str {
        "token_counter"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn configure(
        &self,
        _config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredTokenCounter))
    }
}

struct ConfiguredTokenCounter;

impl ConfiguredPlugin for ConfiguredTokenCounter {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        map_text("token_counter", inputs, |text| {
            let counts = TokenCounts::of(text);
            serde_json::json!({
                "char_count": counts.char_count,
                "word_count": counts.word_count,
                "line_count": counts.line_count,
            })
        })
    }
}
