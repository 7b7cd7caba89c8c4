// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::config::validate_definition;
use crate::errors::ConfigurationError;
use crate::graph::{Node, ProcessMetadata};
use crate::observability::messages::validation::{GraphBuilt, GraphValidationFailed};
use crate::observability::messages::StructuredLog;

/// Raw nodes and edges as declared, before validation.
///
/// Edges are kept in declaration order as `(source, targets)` entries; adding
/// targets for a source that already has an entry appends to it.
#[derive(Debug, Clone, Default)]
pub struct GraphDefinition {
    process: ProcessMetadata,
    nodes: Vec<Node>,
    edges: Vec<(String, Vec<String>)>,
}

impl GraphDefinition {
    pub fn new(process: ProcessMetadata) -> Self {
        Self {
            process,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        let to = to.into();
        self.edge_entry(from.into()).push(to);
        self
    }

    /// Declare the targets of `from`. An empty list still records the source.
    pub fn add_edges<I, S>(&mut self, from: impl Into<String>, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.edge_entry(from.into());
        entry.extend(targets.into_iter().map(Into::into));
        self
    }

    pub fn process(&self) -> &ProcessMetadata {
        &self.process
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(String, Vec<String>)] {
        &self.edges
    }

    fn edge_entry(&mut self, from: String) -> &mut Vec<String> {
        let position = match self.edges.iter().position(|(source, _)| *source == from) {
            Some(position) => position,
            None => {
                self.edges.push((from, Vec::new()));
                self.edges.len() - 1
            }
        };
        &mut self.edges[position].1
    }

    /// Validate the definition and link it into a [`Graph`].
    ///
    /// Fails on duplicate node names, edges naming unknown nodes, repeated
    /// edges, and cycles. Every problem found is logged; the first is returned.
    pub fn build(self) -> Result<Graph, ConfigurationError> {
        if let Err(mut errors) = validate_definition(&self) {
            for error in &errors {
                GraphValidationFailed { error }.log();
            }
            return Err(errors.remove(0));
        }

        let GraphDefinition {
            process,
            nodes,
            edges,
        } = self;

        let index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name().to_string(), i))
            .collect();

        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut successors = vec![Vec::new(); nodes.len()];
        for (source, targets) in &edges {
            let from = index[source.as_str()];
            for target in targets {
                let to = index[target.as_str()];
                successors[from].push(to);
                predecessors[to].push(from);
            }
        }

        let roots: Vec<usize> = (0..nodes.len())
            .filter(|&i| predecessors[i].is_empty())
            .collect();
        let terminals: Vec<usize> = (0..nodes.len())
            .filter(|&i| successors[i].is_empty())
            .collect();

        let graph = Graph {
            process,
            nodes,
            index,
            edges,
            predecessors,
            successors,
            roots,
            terminals,
        };

        GraphBuilt {
            process_name: &graph.process.name,
            node_count: graph.len(),
            edge_count: graph.edge_count(),
            root_count: graph.roots.len(),
            terminal_count: graph.terminals.len(),
        }
        .log();

        Ok(graph)
    }
}

/// A validated, linked DAG of pipeline stages.
///
/// Predecessor and successor lists are the exact inverse of the declared
/// edges; roots and terminals are listed in node declaration order.
#[derive(Debug, Clone)]
pub struct Graph {
    process: ProcessMetadata,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<(String, Vec<String>)>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    roots: Vec<usize>,
    terminals: Vec<usize>,
}

impl Graph {
    pub fn process(&self) -> &ProcessMetadata {
        &self.process
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn edges(&self) -> &[(String, Vec<String>)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|(_, targets)| targets.len()).sum()
    }

    /// Nodes with no incoming edge
    pub fn roots(&self) -> Vec<&Node> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Nodes with no outgoing edge
    pub fn terminals(&self) -> Vec<&Node> {
        self.terminals.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Upstream nodes of `name` in declared order; empty for unknown names
    pub fn predecessors(&self, name: &str) -> Vec<&Node> {
        self.index
            .get(name)
            .map(|&i| self.predecessors[i].iter().map(|&p| &self.nodes[p]).collect())
            .unwrap_or_default()
    }

    /// Downstream nodes of `name` in declared order; empty for unknown names
    pub fn successors(&self, name: &str) -> Vec<&Node> {
        self.index
            .get(name)
            .map(|&i| self.successors[i].iter().map(|&s| &self.nodes[s]).collect())
            .unwrap_or_default()
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    pub(crate) fn predecessor_indices(&self, index: usize) -> &[usize] {
        &self.predecessors[index]
    }

    pub(crate) fn successor_indices(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    /// Insert `node` as the sole predecessor of every current root.
    ///
    /// Calling this twice nests two synthetic roots.
    pub fn prepend_single_root(self, node: Node) -> Result<Graph, ConfigurationError> {
        let former_roots: Vec<String> = self.roots().iter().map(|n| n.name().to_string()).collect();
        let name = node.name().to_string();

        let mut definition = self.into_definition();
        definition.add_node(node);
        definition.add_edges(name, former_roots);
        definition.build()
    }

    /// Insert `node` as the sole successor of every current terminal.
    pub fn append_single_terminal(self, node: Node) -> Result<Graph, ConfigurationError> {
        let former_terminals: Vec<String> = self
            .terminals()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        let name = node.name().to_string();

        let mut definition = self.into_definition();
        definition.add_node(node);
        for terminal in former_terminals {
            definition.add_edge(terminal, name.clone());
        }
        definition.build()
    }

    pub fn into_definition(self) -> GraphDefinition {
        GraphDefinition {
            process: self.process,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(nodes: Vec<&Node>) -> Vec<&str> {
        nodes.into_iter().map(Node::name).collect()
    }

    fn definition(nodes: &[&str], edges: &[(&str, &str)]) -> GraphDefinition {
        let mut definition = GraphDefinition::new(ProcessMetadata::named("test"));
        for name in nodes {
            definition.add_node(Node::new(*name, "identity"));
        }
        for (source, target) in edges {
            definition.add_edge(*source, *target);
        }
        definition
    }

    #[test]
    fn test_roots_and_terminals_table_driven() {
        struct TestCase {
            name: &'static str,
            nodes: Vec<&'static str>,
            edges: Vec<(&'static str, &'static str)>,
            expected_roots: Vec<&'static str>,
            expected_terminals: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "empty graph",
                nodes: vec![],
                edges: vec![],
                expected_roots: vec![],
                expected_terminals: vec![],
            },
            TestCase {
                name: "single node",
                nodes: vec!["a"],
                edges: vec![],
                expected_roots: vec!["a"],
                expected_terminals: vec!["a"],
            },
            TestCase {
                name: "linear chain",
                nodes: vec!["a", "b", "c"],
                edges: vec![("a", "b"), ("b", "c")],
                expected_roots: vec!["a"],
                expected_terminals: vec!["c"],
            },
            TestCase {
                name: "diamond",
                nodes: vec!["a", "b", "c", "d"],
                edges: vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
                expected_roots: vec!["a"],
                expected_terminals: vec!["d"],
            },
            TestCase {
                name: "disconnected components",
                nodes: vec!["x", "y", "z"],
                edges: vec![("y", "z")],
                expected_roots: vec!["x", "y"],
                expected_terminals: vec!["x", "z"],
            },
        ];

        for test_case in test_cases {
            let graph = definition(&test_case.nodes, &test_case.edges)
                .build()
                .unwrap_or_else(|e| panic!("{}: {}", test_case.name, e));

            assert_eq!(names(graph.roots()), test_case.expected_roots, "roots: {}", test_case.name);
            assert_eq!(
                names(graph.terminals()),
                test_case.expected_terminals,
                "terminals: {}",
                test_case.name
            );
        }
    }

    #[test]
    fn test_source_with_empty_target_list_is_terminal() {
        let mut definition = definition(&["a", "b"], &[("a", "b")]);
        definition.add_edges("b", Vec::<String>::new());
        let graph = definition.build().unwrap();

        assert_eq!(names(graph.terminals()), vec!["b"]);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_roots_and_terminals_match_edge_sets() {
        let graph = definition(
            &["a", "b", "c", "d", "e", "f"],
            &[("a", "c"), ("a", "d"), ("b", "d"), ("d", "e")],
        )
        .build()
        .unwrap();

        let targets: HashSet<&str> = graph
            .edges()
            .iter()
            .flat_map(|(_, t)| t.iter().map(String::as_str))
            .collect();
        let sources: HashSet<&str> = graph
            .edges()
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(s, _)| s.as_str())
            .collect();

        let expected_roots: Vec<&str> = graph
            .nodes()
            .map(Node::name)
            .filter(|n| !targets.contains(n))
            .collect();
        let expected_terminals: Vec<&str> = graph
            .nodes()
            .map(Node::name)
            .filter(|n| !sources.contains(n))
            .collect();

        assert_eq!(names(graph.roots()), expected_roots);
        assert_eq!(names(graph.terminals()), expected_terminals);
    }

    #[test]
    fn test_links_are_symmetric_and_ordered() {
        let graph = definition(
            &["a", "b", "c", "d"],
            &[("b", "d"), ("a", "c"), ("a", "d"), ("c", "d")],
        )
        .build()
        .unwrap();

        // predecessor order follows the order in which edges were declared
        assert_eq!(names(graph.predecessors("d")), vec!["b", "a", "c"]);
        assert_eq!(names(graph.successors("a")), vec!["c", "d"]);

        for node in graph.nodes() {
            for successor in graph.successors(node.name()) {
                assert!(names(graph.predecessors(successor.name())).contains(&node.name()));
            }
            for predecessor in graph.predecessors(node.name()) {
                assert!(names(graph.successors(predecessor.name())).contains(&node.name()));
            }
        }

        assert!(graph.predecessors("unknown").is_empty());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_build_rejects_unknown_node() {
        let result = definition(&["a"], &[("a", "ghost")]).build();
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::UnknownNode {
                edge_source: "a".to_string(),
                missing: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_cycle() {
        let result = definition(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "b")]).build();
        match result {
            Err(ConfigurationError::CyclicGraph { cycle }) => {
                assert_eq!(cycle, vec!["b", "c", "b"]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_prepend_single_root() {
        let graph = definition(&["x", "y", "z"], &[("y", "z")]).build().unwrap();
        let graph = graph.prepend_single_root(Node::new("start", "emit")).unwrap();

        assert_eq!(names(graph.roots()), vec!["start"]);
        assert_eq!(names(graph.predecessors("x")), vec!["start"]);
        assert_eq!(names(graph.predecessors("y")), vec!["start"]);
        assert_eq!(names(graph.successors("start")), vec!["x", "y"]);
        assert_eq!(names(graph.terminals()), vec!["x", "z"]);
    }

    #[test]
    fn test_prepend_twice_nests_roots() {
        let graph = definition(&["a"], &[]).build().unwrap();
        let graph = graph
            .prepend_single_root(Node::new("inner", "identity"))
            .unwrap()
            .prepend_single_root(Node::new("outer", "emit"))
            .unwrap();

        assert_eq!(names(graph.roots()), vec!["outer"]);
        assert_eq!(names(graph.successors("outer")), vec!["inner"]);
        assert_eq!(names(graph.predecessors("a")), vec!["inner"]);
    }

    #[test]
    fn test_prepend_on_empty_graph() {
        let graph = definition(&[], &[]).build().unwrap();
        let graph = graph.prepend_single_root(Node::new("only", "emit")).unwrap();
        assert_eq!(names(graph.roots()), vec!["only"]);
        assert_eq!(names(graph.terminals()), vec!["only"]);
    }

    #[test]
    fn test_append_single_terminal() {
        let graph = definition(&["a", "b", "c"], &[("a", "b"), ("a", "c")])
            .build()
            .unwrap();
        let graph = graph.append_single_terminal(Node::new("sink", "log")).unwrap();

        assert_eq!(names(graph.terminals()), vec!["sink"]);
        assert_eq!(names(graph.successors("b")), vec!["sink"]);
        assert_eq!(names(graph.successors("c")), vec!["sink"]);
        assert_eq!(names(graph.predecessors("sink")), vec!["b", "c"]);
        assert_eq!(names(graph.roots()), vec!["a"]);
    }

    #[test]
    fn test_surgery_rejects_duplicate_name() {
        let graph = definition(&["a"], &[]).build().unwrap();
        let result = graph.append_single_terminal(Node::new("a", "log"));
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateNode {
                name: "a".to_string()
            }
        );
    }
}
