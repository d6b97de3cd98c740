//! Directed dependency edges.

use crate::graph::NodeId;
use serde::Serialize;
use std::fmt;

/// `source` depends on `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge from: {} to: {}", self.source, self.target)
    }
}

/// Outcome of adding an edge. Only `Inserted` changes the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsertion {
    Inserted,
    SelfLoop,
    Duplicate,
    /// One of the endpoints is not in the graph.
    UnknownNode(NodeId),
}

impl EdgeInsertion {
    pub fn is_inserted(self) -> bool {
        self == EdgeInsertion::Inserted
    }
}
