//! # Trie Index Module
//!
//! ## Purpose
//! Implements the prefix tree over characters that backs both the
//! manufacturer and the model vocabularies. Each node stands for the exact
//! string spelled by the path from the root and optionally carries the list
//! of product associations recorded for that string.
//!
//! ## Input/Output Specification
//! - **Input**: normalized candidate substrings from the catalog indexer
//! - **Output**: node handles for exact path lookups, association lists
//! - **Performance**: O(m) insert and lookup where m = path length
//!
//! ## Key Features
//! - Arena-allocated nodes addressed by `NodeId`
//! - One edge table keyed by (node, character) shared across the whole trie
//! - Parent links for ancestor walks during longest-match pruning
//! - Build-then-query lifecycle: all inserts happen before the first lookup

use crate::CandidateMatch;
use std::collections::HashMap;

/// Handle to a trie node. Ids are only meaningful for the trie that issued
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    matches: Vec<CandidateMatch>,
}

/// A prefix tree over characters with a single shared edge table.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
    edges: HashMap<(NodeId, char), NodeId>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Create an empty trie containing only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            edges: HashMap::new(),
        }
    }

    /// The root node, standing for the empty string
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the trie holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Find the child of `node` along `c`
    pub fn find_child(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.edges.get(&(node, c)).copied()
    }

    /// Find the descendant of `node` along `path`. Returns `None` as soon as
    /// any character has no corresponding child; never creates nodes.
    pub fn find_descendant(&self, node: NodeId, path: &str) -> Option<NodeId> {
        let mut current = node;
        for c in path.chars() {
            current = self.find_child(current, c)?;
        }
        Some(current)
    }

    /// The parent of `node`, or `None` at the root
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0 as usize].parent
    }

    /// Walk or create the chain of nodes spelling `path` from the root and
    /// return the terminal node. Re-inserting an existing path is idempotent
    /// and returns the same node.
    pub fn insert(&mut self, path: &str) -> NodeId {
        let mut current = self.root();
        for c in path.chars() {
            current = self.insert_child(current, c);
        }
        current
    }

    fn insert_child(&mut self, node: NodeId, c: char) -> NodeId {
        if let Some(child) = self.find_child(node, c) {
            return child;
        }
        let child = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(node),
            matches: Vec::new(),
        });
        self.edges.insert((node, c), child);
        child
    }

    /// The ordered association list recorded at `node`; empty when none
    pub fn matches(&self, node: NodeId) -> &[CandidateMatch] {
        &self.nodes[node.0 as usize].matches
    }

    /// Append an association to `node`
    pub fn push_match(&mut self, node: NodeId, candidate: CandidateMatch) {
        self.nodes[node.0 as usize].matches.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CandidateMatch, Product, ProductField};
    use std::sync::Arc;

    fn product(model: &str) -> Arc<Product> {
        Arc::new(Product {
            name: format!("Acme {model}"),
            manufacturer: "Acme".into(),
            model: model.into(),
            family: None,
            announced_date: String::new(),
        })
    }

    #[test]
    fn insert_is_idempotent() {
        let mut trie = Trie::new();
        let first = trie.insert("wg1");
        let second = trie.insert("wg1");
        assert_eq!(first, second);
        assert_eq!(trie.len(), 4);
    }

    #[test]
    fn find_descendant_short_circuits() {
        let mut trie = Trie::new();
        trie.insert("eos");
        let before = trie.len();
        assert!(trie.find_descendant(trie.root(), "eoz").is_none());
        assert!(trie.find_descendant(trie.root(), "eosx").is_none());
        // Lookups never create nodes.
        assert_eq!(trie.len(), before);
        assert!(trie.find_descendant(trie.root(), "eos").is_some());
    }

    #[test]
    fn find_descendant_of_inner_node() {
        let mut trie = Trie::new();
        let terminal = trie.insert("wg1gps");
        let inner = trie.find_descendant(trie.root(), "wg1").unwrap();
        assert_eq!(trie.find_descendant(inner, "gps"), Some(terminal));
    }

    #[test]
    fn parent_chain_reaches_root() {
        let mut trie = Trie::new();
        let node = trie.insert("7d");
        let mut depth = 0;
        let mut current = Some(node);
        while let Some(n) = current {
            current = trie.parent(n);
            depth += 1;
        }
        // Terminal, one inner node, root.
        assert_eq!(depth, 3);
        assert!(trie.parent(trie.root()).is_none());
    }

    #[test]
    fn associations_accumulate_in_order() {
        let mut trie = Trie::new();
        let node = trie.insert("k5");
        assert!(trie.matches(node).is_empty());
        let a = product("K-5");
        let b = product("K-5 II");
        trie.push_match(node, CandidateMatch::new(a.clone(), ProductField::Model));
        trie.push_match(node, CandidateMatch::new(b.clone(), ProductField::Model));
        let recorded: Vec<_> = trie.matches(node).iter().map(|m| &m.product).collect();
        assert_eq!(recorded, [&a, &b]);
    }
}
