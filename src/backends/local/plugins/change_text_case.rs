// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::str::FromStr;

use super::map_text;
use crate::errors::PluginConfigurationError;
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemStream, Plugin};

/// Words kept lower case inside a title, unless they open it
const TITLE_SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Upper,
    Lower,
    /// First letter of every word capitalized
    Proper,
    /// Proper case, except for short articles, conjunctions and prepositions
    Title,
}

impl FromStr for TextCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(TextCase::Upper),
            "lower" => Ok(TextCase::Lower),
            "proper" => Ok(TextCase::Proper),
            "title" => Ok(TextCase::Title),
            other => Err(format!(
                "unknown case '{}', expected upper, lower, proper or title",
                other
            )),
        }
    }
}

impl TextCase {
    pub fn apply(&self, input: &str) -> String {
        match self {
            TextCase::Upper => input.to_uppercase(),
            TextCase::Lower => input.to_lowercase(),
            TextCase::Proper => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            TextCase::Title => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower_word = word.to_lowercase();
                    if i > 0 && TITLE_SMALL_WORDS.contains(&lower_word.as_str()) {
                        lower_word
                    } else {
                        capitalize(word)
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// Converts text items to the configured `case`.
pub struct ChangeTextCase;

impl Plugin for ChangeTextCase {
    fn name(&self) -> &'static str {
        "change_text_case"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        let raw = config.require("case")?;
        let case = raw
            .parse::<TextCase>()
            .map_err(|reason| PluginConfigurationError::invalid("case", raw, reason))?;
        Ok(Box::new(ConfiguredChangeTextCase { case }))
    }
}

struct ConfiguredChangeTextCase {
    case: TextCase,
}

impl ConfiguredPlugin for ConfiguredChangeTextCase {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        let case = self.case;
        map_text("change_text_case", inputs, move |text| {
            Item::String(case.apply(text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::plugins::test_support::run;
    use serde_json::json;

    #[test]
    fn test_case_conversions() {
        let test_cases = vec![
            (TextCase::Upper, "hello", "HELLO"),
            (TextCase::Lower, "HELLO", "hello"),
            (TextCase::Proper, "hello wORLD", "Hello World"),
            (TextCase::Title, "the quick brown fox", "The Quick Brown Fox"),
            (TextCase::Title, "war and peace in the east", "War and Peace in the East"),
            (TextCase::Proper, "", ""),
        ];

        for (case, input, expected) in test_cases {
            assert_eq!(case.apply(input), expected, "{:?} of '{}'", case, input);
        }
    }

    #[test]
    fn test_unknown_case_rejected() {
        let config: NodeConfig = [("case", "sideways")].into_iter().collect();
        let error = ChangeTextCase.configure(&config).err().unwrap();
        assert!(matches!(error, PluginConfigurationError::InvalidOption { .. }));

        let error = ChangeTextCase.configure(&NodeConfig::new()).err().unwrap();
        assert!(matches!(error, PluginConfigurationError::MissingOption { .. }));
    }

    #[tokio::test]
    async fn test_non_text_item_fails_branch() {
        let output = run(
            &ChangeTextCase,
            &[("case", "upper")],
            vec![vec![json!("ok"), json!(42)]],
        )
        .await;

        assert_eq!(output[0], Ok(json!("OK")));
        let error = output[1].clone().unwrap_err();
        assert!(error.message.contains("change_text_case expects text items"));
    }
}
