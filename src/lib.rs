// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // plugin implementations
pub mod config;     // config + registry
pub mod engine;     // compiler + execution controller
pub mod errors;     // error handling
pub mod graph;      // job description model
pub mod observability;
pub mod traits;     // unified abstractions
