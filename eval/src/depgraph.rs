//! The evaluated dependency graph.
//!
//! Nodes live in an arena owned by [DepGraph] and refer to each other by
//! [NodeId], so diamond sharing and back-edges are plain index edges rather
//! than shared pointers.

use std::collections::BTreeMap;

use crate::value::Value;

/// Index of a node in a [DepGraph] arena. Only meaningful for the graph
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One target's fully-evaluated build rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepNode {
    /// The build artifact or phony name this rule produces.
    pub output: String,
    /// Commands in execution order.
    pub cmds: Vec<String>,
    /// Dependency edges, order-significant.
    pub deps: Vec<NodeId>,
    pub has_rule: bool,
    pub is_order_only: bool,
    pub is_phony: bool,
    /// Inputs actually matched by the rule, as opposed to declared
    /// prerequisites. These targets need not have nodes of their own.
    pub actual_inputs: Vec<String>,
    /// Target-specific variables; entries are [Value::TargetScoped].
    pub target_vars: BTreeMap<String, Value>,
    /// Originating file of the rule.
    pub filename: String,
    /// Line in that file.
    pub lineno: u32,
}

impl DepNode {
    pub fn new(output: impl Into<String>) -> DepNode {
        DepNode {
            output: output.into(),
            ..DepNode::default()
        }
    }
}

/// Arena of [DepNode]s plus the entry targets in evaluation order.
///
/// `roots` is what the evaluator considers the top-level targets; walking
/// them through `deps` reaches every node that matters. A graph rebuilt
/// from disk lists all of its nodes as roots, preserving record order.
#[derive(Clone, Debug, Default)]
pub struct DepGraph {
    nodes: Vec<DepNode>,
    roots: Vec<NodeId>,
}

impl DepGraph {
    pub fn new() -> DepGraph {
        DepGraph::default()
    }

    /// Move `node` into the arena and return its handle.
    pub fn add_node(&mut self, node: DepNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Panics if `id` does not come from this graph.
    pub fn node(&self, id: NodeId) -> &DepNode {
        &self.nodes[id.index()]
    }

    /// Panics if `id` does not come from this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut DepNode {
        &mut self.nodes[id.index()]
    }

    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DepNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
