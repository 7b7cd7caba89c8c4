// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::StreamExt;
use tracing::{debug, error, info, trace, warn, Level};

use super::merged;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, ItemStream, Plugin};

/// Logs every item it sees at `level` (default `info`) and forwards it.
///
/// `label` (default `log`) is attached to each event so several log stages
/// can be told apart.
pub struct LogItems;

impl Plugin for LogItems {
    fn name(&self) -> &'static str {
        "log"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        let level = match config.get("level") {
            None => Level::INFO,
            Some(raw) => raw
                .parse::<Level>()
                .map_err(|e| PluginConfigurationError::invalid("level", raw, e.to_string()))?,
        };

        Ok(Box::new(ConfiguredLogItems {
            level,
            label: config.get("label").unwrap_or("log").to_string(),
        }))
    }
}

struct ConfiguredLogItems {
    level: Level,
    label: String,
}

impl ConfiguredPlugin for ConfiguredLogItems {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        let ConfiguredLogItems { level, label } = *self;
        merged(inputs)
            .inspect(move |element| {
                if let Ok(item) = element {
                    match level {
                        Level::TRACE => trace!(label = %label, item = %item, "Item"),
                        Level::DEBUG => debug!(label = %label, item = %item, "Item"),
                        Level::INFO => info!(label = %label, item = %item, "Item"),
                        Level::WARN => warn!(label = %label, item = %item, "Item"),
                        _ => error!(label = %label, item = %item, "Item"),
                    }
                }
            })
            .boxed()
    }
}
