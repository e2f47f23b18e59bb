// kwfilter-trie/src/trie/mod.rs
//! Arena-backed keyword trie with Aho-Corasick failure links.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! indices, so parent/child edges and back-pointing failure links never form
//! ownership cycles.

extern crate alloc;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

/// Handle to a node inside a [`PatternSet`] arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node, present in every pattern set.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, NodeId>,
    depth: usize,
    is_end: bool,
    fail: NodeId,
    /// Nearest keyword-terminal node on the failure chain, if any.
    output: Option<NodeId>,
}

/// An immutable keyword vocabulary compiled into a trie.
///
/// Built once through [`PatternSet::new`] or [`PatternSetBuilder`]; there is
/// no way to add or remove keywords afterwards.
#[derive(Debug, Clone)]
pub struct PatternSet {
    nodes: Vec<Node>,
    keyword_count: usize,
}

/// Collects keywords before the failure links are computed.
#[derive(Debug, Clone)]
pub struct PatternSetBuilder {
    nodes: Vec<Node>,
    keyword_count: usize,
}

impl Default for PatternSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSetBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            keyword_count: 0,
        }
    }

    /// Adds a keyword and returns the node that terminates it.
    ///
    /// Empty keywords are ignored and yield `None`. Inserting a keyword that
    /// is already present returns its existing terminal node.
    pub fn insert(&mut self, keyword: &str) -> Option<NodeId> {
        if keyword.is_empty() {
            return None;
        }

        let mut cursor = NodeId::ROOT;
        for c in keyword.chars() {
            cursor = match self.nodes[cursor.0].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    let depth = self.nodes[cursor.0].depth + 1;
                    self.nodes.push(Node {
                        depth,
                        ..Node::default()
                    });
                    self.nodes[cursor.0].children.insert(c, next);
                    next
                }
            };
        }

        let terminal = &mut self.nodes[cursor.0];
        if !terminal.is_end {
            terminal.is_end = true;
            self.keyword_count += 1;
        }
        Some(cursor)
    }

    /// Computes failure links breadth-first and freezes the vocabulary.
    pub fn build(mut self) -> PatternSet {
        let mut queue = VecDeque::new();

        let first_level: Vec<NodeId> = self.nodes[0].children.values().copied().collect();
        for child in first_level {
            self.nodes[child.0].fail = NodeId::ROOT;
            queue.push_back(child);
        }

        while let Some(parent) = queue.pop_front() {
            let edges: Vec<(char, NodeId)> = self.nodes[parent.0]
                .children
                .iter()
                .map(|(&c, &n)| (c, n))
                .collect();

            for (c, child) in edges {
                let mut candidate = self.nodes[parent.0].fail;
                let fail = loop {
                    if let Some(&next) = self.nodes[candidate.0].children.get(&c) {
                        break next;
                    }
                    if candidate == NodeId::ROOT {
                        break NodeId::ROOT;
                    }
                    candidate = self.nodes[candidate.0].fail;
                };

                // The failure target is strictly shallower, so its output is final.
                let output = if self.nodes[fail.0].is_end {
                    Some(fail)
                } else {
                    self.nodes[fail.0].output
                };

                let node = &mut self.nodes[child.0];
                node.fail = fail;
                node.output = output;
                queue.push_back(child);
            }
        }

        PatternSet {
            nodes: self.nodes,
            keyword_count: self.keyword_count,
        }
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        PatternSetBuilder::new().build()
    }
}

impl PatternSet {
    /// Builds a pattern set from a keyword vocabulary.
    ///
    /// Duplicates collapse and empty strings are skipped; any input is valid.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = PatternSetBuilder::new();
        for keyword in keywords {
            builder.insert(keyword.as_ref());
        }
        builder.build()
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keyword_count
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Exact-membership test for a whole keyword.
    pub fn contains(&self, keyword: &str) -> bool {
        self.lookup(keyword).is_some_and(|node| self.is_end(node))
    }

    /// Follows `keyword` from the root, returning the node it spells, if any.
    pub fn lookup(&self, keyword: &str) -> Option<NodeId> {
        keyword
            .chars()
            .try_fold(NodeId::ROOT, |node, c| self.child(node, c))
    }

    pub fn child(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.nodes[node.0].children.get(&c).copied()
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.nodes[node.0].depth
    }

    pub fn is_end(&self, node: NodeId) -> bool {
        self.nodes[node.0].is_end
    }

    pub fn fail(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].fail
    }

    /// Longest proper suffix of `node`'s path that is itself a keyword.
    pub fn output(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].output
    }
}
