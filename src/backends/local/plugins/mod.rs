// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in plugins.
//!
//! * Sources: [`Emit`], [`ReadLines`]
//! * Combinators: [`Merge`] (also registered as `identity`), [`Concat`]
//! * Text transforms: [`ChangeTextCase`], [`ReverseText`], [`PrefixSuffixAdder`], [`TokenCounter`]
//! * Sinks that forward what they consume: [`LogItems`], [`WriteLines`]
//!
//! Text transforms fail their branch on any item that is not a JSON string.

mod change_text_case;
mod combinators;
mod emit;
mod log_items;
mod prefix_suffix_adder;
mod read_lines;
mod reverse_text;
mod token_counter;
mod write_lines;

pub use change_text_case::{ChangeTextCase, TextCase};
pub use combinators::{Concat, Merge};
pub use emit::Emit;
pub use log_items::LogItems;
pub use prefix_suffix_adder::PrefixSuffixAdder;
pub use read_lines::ReadLines;
pub use reverse_text::ReverseText;
pub use token_counter::TokenCounter;
pub use write_lines::WriteLines;

use futures::stream::{self, StreamExt};

use crate::errors::StreamProcessingError;
use crate::traits::{Item, ItemStream};

/// One stream from many: the single input itself, or all of them interleaved.
fn merged(mut inputs: Vec<ItemStream>) -> ItemStream {
    if inputs.len() == 1 {
        if let Some(input) = inputs.pop() {
            return input;
        }
    }
    stream::select_all(inputs).boxed()
}

/// Apply `transform` to every string item; anything else fails the branch.
fn map_text<F>(plugin: &'static str, inputs: Vec<ItemStream>, transform: F) -> ItemStream
where
    F: Fn(&str) -> Item + Send + 'static,
{
    merged(inputs)
        .map(move |element| {
            element.and_then(|item| match item.as_str() {
                Some(text) => Ok(transform(text)),
                None => Err(StreamProcessingError::new(format!(
                    "{} expects text items, got {}",
                    plugin, item
                ))),
            })
        })
        .boxed()
}
