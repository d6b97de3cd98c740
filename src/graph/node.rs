//! Graph vertices.

use crate::formula::Literal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Stable node identifier. Assigned once when the node first enters a
/// graph and never reused by that graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal living in the graph.
///
/// Label and period only change through the owning graph, which keeps its
/// period index in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) period: i64,
    /// Targets of this node's outgoing edges.
    pub(crate) dependencies: BTreeSet<NodeId>,
}

impl DependencyNode {
    pub(crate) fn new(id: NodeId, literal: Literal) -> Self {
        Self {
            id,
            label: literal.label,
            period: literal.period,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn period(&self) -> i64 {
        self.period
    }

    pub fn dependencies(&self) -> &BTreeSet<NodeId> {
        &self.dependencies
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn literal(&self) -> Literal {
        Literal::new(self.label.clone(), self.period)
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node: {} ID: {} Period: {}",
            self.label, self.id, self.period
        )
    }
}

/// Outcome of adding a literal to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeInsertion {
    /// A new vertex was created.
    Inserted(NodeId),
    /// A vertex with the same (period, label) already existed and was reused.
    Existing(NodeId),
}

impl NodeInsertion {
    pub fn id(self) -> NodeId {
        match self {
            NodeInsertion::Inserted(id) | NodeInsertion::Existing(id) => id,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, NodeInsertion::Inserted(_))
    }
}
