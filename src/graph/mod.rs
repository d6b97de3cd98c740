//! Defines the dependency graph and its building blocks.
pub mod bounds;
pub mod dependency;
pub mod edge;
pub mod node;

pub use bounds::PeriodBounds;
pub use dependency::{DependencyGraph, NEW_NODE_PREFIX};
pub use edge::{Edge, EdgeInsertion};
pub use node::{DependencyNode, NodeId, NodeInsertion};
