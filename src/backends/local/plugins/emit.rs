// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::stream::{self, StreamExt};

use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemStream, Plugin};

/// Source emitting a fixed list of items.
///
/// Options (one of):
/// * `items` - a JSON array, each element becomes an item
/// * `values` - comma separated text, each trimmed value becomes a string item
pub struct Emit;

impl Plugin for Emit {
    fn name(&self) -> &'static str {
        "emit"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        let items = match (config.get("items"), config.get("values")) {
            (Some(raw), _) => match serde_json::from_str::<Item>(raw) {
                Ok(Item::Array(items)) => items,
                Ok(_) => {
                    return Err(PluginConfigurationError::invalid(
                        "items",
                        raw,
                        "expected a JSON array",
                    ))
                }
                Err(e) => return Err(PluginConfigurationError::invalid("items", raw, e.to_string())),
            },
            (None, Some(values)) => values
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| Item::String(value.to_string()))
                .collect(),
            (None, None) => {
                return Err(PluginConfigurationError::MissingOption {
                    key: "items".to_string(),
                })
            }
        };

        Ok(Box::new(ConfiguredEmit { items }))
    }
}

struct ConfiguredEmit {
    items: Vec<Item>,
}

impl ConfiguredPlugin for ConfiguredEmit {
    fn bind(self: Box<Self>, _inputs: Vec<ItemStream>) -> ItemStream {
        stream::iter(self.items.into_iter().map(Ok)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::plugins::test_support::run;
    use serde_json::json;

    #[tokio::test]
    async fn test_emit_options_table_driven() {
        let cases = vec![
            ("items", "[1, \"two\", {\"three\": 3}]", vec![json!(1), json!("two"), json!({"three": 3})]),
            ("values", "a, b ,,c", vec![json!("a"), json!("b"), json!("c")]),
            ("items", "[]", vec![]),
        ];

        for (key, value, expected) in cases {
            let output = run(&Emit, &[(key, value)], vec![]).await;
            let items: Vec<Item> = output.into_iter().map(Result::unwrap).collect();
            assert_eq!(items, expected, "{}={}", key, value);
        }
    }

    #[test]
    fn test_emit_rejects_bad_options() {
        let cases = vec![
            (vec![], "missing"),
            (vec![("items", "{\"not\": \"array\"}")], "not an array"),
            (vec![("items", "[1,")], "malformed"),
        ];

        for (options, name) in cases {
            let config: NodeConfig = options.into_iter().collect();
            assert!(Emit.configure(&config).is_err(), "{}", name);
        }
    }
}
