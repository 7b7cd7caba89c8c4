// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of graph definitions.
//!
//! Every [`GraphDefinition`] passes through [`validate_definition`] before it is
//! linked into a [`Graph`](crate::graph::Graph). The checks run in a fixed order:
//!
//! 1. **Uniqueness**: every node name is declared once
//! 2. **References**: every edge source and target names a declared node, and no
//!    target is listed twice for the same source
//! 3. **Acyclicity**: DFS with a recursion stack finds any cycle
//!
//! Cycle detection needs a structurally sound graph, so it only runs when the
//! first two checks pass. Errors from the first two checks are accumulated so a
//! user sees every problem in one pass.
//!
//! # Cycle Detection
//!
//! Classic three-colour DFS:
//! - **White**: not visited yet
//! - **Gray**: on the current recursion stack
//! - **Black**: fully explored
//!
//! Reaching a gray node closes a cycle. The reported path runs from the
//! revisited node through the current DFS path and back to it, e.g.
//! `b -> c -> d -> b`. Time O(V + E), space O(V).
//!
//! Traversal starts from nodes in declaration order, so the reported cycle is
//! deterministic for a given definition.
//!
//! # Example
//!
//! ```rust
//! use the_dagstream::config::validate_definition;
//! use the_dagstream::errors::ConfigurationError;
//! use the_dagstream::graph::{GraphDefinition, Node, ProcessMetadata};
//!
//! let mut definition = GraphDefinition::new(ProcessMetadata::default());
//! definition
//!     .add_node(Node::new("a", "identity"))
//!     .add_node(Node::new("b", "identity"))
//!     .add_edge("a", "b")
//!     .add_edge("b", "a");
//!
//! match validate_definition(&definition) {
//!     Err(errors) => assert!(matches!(errors[0], ConfigurationError::CyclicGraph { .. })),
//!     Ok(()) => unreachable!(),
//! }
//! ```

use std::collections::{HashMap, HashSet};

use crate::errors::ConfigurationError;
use crate::graph::GraphDefinition;
use crate::observability::messages::validation::CycleDetected;
use crate::observability::messages::StructuredLog;

/// Validate a definition's structure.
///
/// # Returns
///
/// * `Ok(())` - the definition can be linked into a graph
/// * `Err(Vec<ConfigurationError>)` - every problem found, never empty
pub fn validate_definition(definition: &GraphDefinition) -> Result<(), Vec<ConfigurationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_node_names(definition) {
        errors.extend(duplicate_errors);
    }

    if let Err(reference_errors) = validate_edge_references(definition) {
        errors.extend(reference_errors);
    }

    // Cycle detection needs every edge to resolve
    if errors.is_empty() {
        if let Err(cycle_error) = validate_acyclic_graph(definition) {
            errors.push(cycle_error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_node_names(definition: &GraphDefinition) -> Result<(), Vec<ConfigurationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for node in definition.nodes() {
        if !seen.insert(node.name()) {
            errors.push(ConfigurationError::DuplicateNode {
                name: node.name().to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that both ends of every edge exist and that no edge is repeated.
///
/// An unknown source is reported once per edge entry; an unknown target once
/// per occurrence.
fn validate_edge_references(definition: &GraphDefinition) -> Result<(), Vec<ConfigurationError>> {
    let names: HashSet<&str> = definition.nodes().iter().map(|n| n.name()).collect();
    let mut errors = Vec::new();

    for (source, targets) in definition.edges() {
        if !names.contains(source.as_str()) {
            errors.push(ConfigurationError::UnknownNode {
                edge_source: source.clone(),
                missing: source.clone(),
            });
        }

        let mut seen_targets = HashSet::new();
        for target in targets {
            if !names.contains(target.as_str()) {
                errors.push(ConfigurationError::UnknownNode {
                    edge_source: source.clone(),
                    missing: target.clone(),
                });
            } else if !seen_targets.insert(target.as_str()) {
                errors.push(ConfigurationError::DuplicateEdge {
                    source_node: source.clone(),
                    target_node: target.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_acyclic_graph(definition: &GraphDefinition) -> Result<(), ConfigurationError> {
    let adjacency: HashMap<&str, Vec<&str>> = definition
        .edges()
        .iter()
        .map(|(source, targets)| {
            (
                source.as_str(),
                targets.iter().map(String::as_str).collect(),
            )
        })
        .collect();

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for node in definition.nodes() {
        if visited.contains(node.name()) {
            continue;
        }
        if let Some(cycle) = dfs_cycle_detection(
            node.name(),
            &adjacency,
            &mut visited,
            &mut rec_stack,
            &mut path,
        ) {
            let cycle_refs: Vec<&str> = cycle.iter().map(String::as_str).collect();
            CycleDetected { cycle: &cycle_refs }.log();
            return Err(ConfigurationError::CyclicGraph { cycle });
        }
    }

    Ok(())
}

/// Depth-first search that returns the first cycle reachable from `node`.
///
/// `rec_stack` holds the gray nodes, `visited` the gray and black ones, and
/// `path` mirrors the recursion stack in order so the cycle can be extracted.
fn dfs_cycle_detection<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for &neighbor in neighbors {
            if rec_stack.contains(neighbor) {
                let cycle_start = path.iter().position(|&n| n == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> = path[cycle_start..].iter().map(|n| n.to_string()).collect();
                cycle.push(neighbor.to_string());
                return Some(cycle);
            }
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, adjacency, visited, rec_stack, path) {
                    return Some(cycle);
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, ProcessMetadata};

    fn definition(nodes: &[&str], edges: &[(&str, &str)]) -> GraphDefinition {
        let mut definition = GraphDefinition::new(ProcessMetadata::default());
        for name in nodes {
            definition.add_node(Node::new(*name, "identity"));
        }
        for (source, target) in edges {
            definition.add_edge(*source, *target);
        }
        definition
    }

    #[test]
    fn test_valid_empty_definition() {
        assert!(validate_definition(&definition(&[], &[])).is_ok());
    }

    #[test]
    fn test_valid_shapes() {
        let cases: Vec<(&str, Vec<&str>, Vec<(&str, &str)>)> = vec![
            ("single node", vec!["a"], vec![]),
            ("linear chain", vec!["a", "b", "c"], vec![("a", "b"), ("b", "c")]),
            (
                "diamond",
                vec!["a", "b", "c", "d"],
                vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
            ),
            ("disconnected", vec!["x", "y"], vec![]),
        ];

        for (name, nodes, edges) in cases {
            assert!(
                validate_definition(&definition(&nodes, &edges)).is_ok(),
                "expected '{}' to be valid",
                name
            );
        }
    }

    #[test]
    fn test_duplicate_node_names() {
        let errors = validate_definition(&definition(&["a", "a"], &[])).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigurationError::DuplicateNode {
                name: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_target() {
        let errors = validate_definition(&definition(&["a"], &[("a", "nonexistent")])).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigurationError::UnknownNode {
                edge_source: "a".to_string(),
                missing: "nonexistent".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_source() {
        let errors = validate_definition(&definition(&["b"], &[("ghost", "b")])).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigurationError::UnknownNode {
                edge_source: "ghost".to_string(),
                missing: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_edge() {
        let errors = validate_definition(&definition(&["a", "b"], &[("a", "b"), ("a", "b")])).unwrap_err();
        assert!(matches!(errors[0], ConfigurationError::DuplicateEdge { .. }));
    }

    #[test]
    fn test_cycles_table_driven() {
        let cases: Vec<(&str, Vec<&str>, Vec<(&str, &str)>, Vec<&str>)> = vec![
            ("self loop", vec!["a"], vec![("a", "a")], vec!["a", "a"]),
            ("simple cycle", vec!["a", "b"], vec![("a", "b"), ("b", "a")], vec!["a", "b", "a"]),
            (
                "cycle behind an acyclic prefix",
                vec!["a", "b", "c", "d"],
                vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")],
                vec!["b", "c", "d", "b"],
            ),
        ];

        for (name, nodes, edges, expected_cycle) in cases {
            let errors = validate_definition(&definition(&nodes, &edges)).unwrap_err();
            assert_eq!(errors.len(), 1, "{}", name);
            match &errors[0] {
                ConfigurationError::CyclicGraph { cycle } => {
                    assert_eq!(cycle, &expected_cycle, "{}", name);
                }
                other => panic!("{}: expected a cycle, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_cycle_detection_skipped_when_references_fail() {
        let errors =
            validate_definition(&definition(&["a", "b"], &[("a", "b"), ("b", "a"), ("b", "missing")]))
                .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ConfigurationError::UnknownNode { .. }));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let errors = validate_definition(&definition(
            &["a", "a", "b"],
            &[("a", "nonexistent"), ("b", "missing")],
        ))
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
