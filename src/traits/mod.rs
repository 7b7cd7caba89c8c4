// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod observer;
pub mod plugin;

pub use observer::{CollectedItems, CollectingObserver, JsonLinesObserver, PipelineObserver};
pub use plugin::{Arity, ConfiguredPlugin, Item, ItemResult, ItemStream, Plugin};
