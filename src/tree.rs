//! Nested tool trees and flattening to dotted names.
//!
//! A [`ToolTree`] is an ordered mapping from names to either a finalized
//! [`Tool`] or another subtree, nested to any depth. Flattening walks the
//! tree depth-first in declaration order and joins names with `.`, and that
//! order is later the registration order.

use crate::tool::Tool;

/// A single entry in a tool tree: a leaf tool or a nested subtree.
pub enum ToolNode<C> {
    Tool(Tool<C>),
    Tree(ToolTree<C>),
}

/// An ordered, arbitrarily nested mapping of tool names to tools.
pub struct ToolTree<C> {
    entries: Vec<(String, ToolNode<C>)>,
}

impl<C> ToolTree<C> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a tool under `name`.
    ///
    /// A duplicate name at the same level replaces the earlier entry in
    /// place, keeping its original position (last writer wins). Names are
    /// passed through uninspected: a name containing `.` will produce an
    /// ambiguous dotted path when flattened.
    pub fn tool(self, name: impl Into<String>, tool: Tool<C>) -> Self {
        self.insert(name.into(), ToolNode::Tool(tool))
    }

    /// Add a nested subtree under `name`.
    pub fn tree(self, name: impl Into<String>, subtree: ToolTree<C>) -> Self {
        self.insert(name.into(), ToolNode::Tree(subtree))
    }

    fn insert(mut self, name: String, node: ToolNode<C>) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = node;
        } else {
            self.entries.push((name, node));
        }
        self
    }

    /// Number of entries at this level (not counting nested entries).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten the tree into `(dotted name, tool)` pairs.
    ///
    /// Depth-first, pre-order, in declaration order: for
    /// `{ a, b: { c, d } }` the result is `a`, `b.c`, `b.d`.
    pub fn flatten(&self) -> Vec<(String, Tool<C>)> {
        let mut out = Vec::new();
        self.flatten_into(None, &mut out);
        out
    }

    fn flatten_into(&self, parent: Option<&str>, out: &mut Vec<(String, Tool<C>)>) {
        for (key, node) in &self.entries {
            let full_name = match parent {
                Some(parent) => format!("{parent}.{key}"),
                None => key.clone(),
            };
            match node {
                ToolNode::Tool(tool) => out.push((full_name, tool.clone())),
                ToolNode::Tree(subtree) => subtree.flatten_into(Some(&full_name), out),
            }
        }
    }
}

impl<C> Default for ToolTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ToolNode<C> {
    fn clone(&self) -> Self {
        match self {
            ToolNode::Tool(tool) => ToolNode::Tool(tool.clone()),
            ToolNode::Tree(tree) => ToolNode::Tree(tree.clone()),
        }
    }
}

impl<C> Clone for ToolTree<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
