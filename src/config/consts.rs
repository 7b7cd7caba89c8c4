// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Configuration file read when none is named on the command line
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
/// Items buffered between two tasks before the overflow policy applies
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;
/// Worker threads used when the machine's parallelism cannot be determined
pub const FALLBACK_WORKER_THREADS: usize = 4;
/// `EnvFilter` directive used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "the_dagstream=info";
