// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph model for pipeline job descriptions.
//!
//! A [`GraphDefinition`] collects nodes and edges as they are declared.
//! [`GraphDefinition::build`] validates them (unique names, resolvable edges,
//! no cycles) and links them into a [`Graph`], whose roots and terminals are
//! derived from the edges and recomputed on every mutation.
//!
//! ```
//! use the_dagstream::graph::{GraphDefinition, Node, ProcessMetadata};
//!
//! let mut definition = GraphDefinition::new(ProcessMetadata::named("demo"));
//! definition
//!     .add_node(Node::new("source", "emit").with_option("items", "[1, 2, 3]"))
//!     .add_node(Node::new("left", "identity"))
//!     .add_node(Node::new("right", "identity"))
//!     .add_edges("source", ["left", "right"]);
//!
//! let graph = definition.build().unwrap();
//! assert_eq!(graph.roots().len(), 1);
//! assert_eq!(graph.terminals().len(), 2);
//! ```

mod model;
mod node;

pub use model::{Graph, GraphDefinition};
pub use node::{Node, NodeConfig, ProcessMetadata};
