//! Dependency model for PZot temporal formulas.
//!
//! A dependency formula such as
//!
//! ```text
//! (&& (dep (-p- a) (-p- b) (next (-p- c))) (dep (yesterday (-p- d)) (-p- a)))
//! ```
//!
//! is loaded into a [`DependencyGraph`] of period-shifted literals, edited,
//! written back, and laid out on a period timeline grid.

pub mod config;
pub mod document;
pub mod formula;
pub mod graph;
pub mod layout;
pub mod model;
pub mod telemetry;

pub type Result<T> = anyhow::Result<T>;

pub use document::{DocumentError, HostDocument};
pub use formula::{DependencyClause, FormulaError, Literal};
pub use graph::{DependencyGraph, DependencyNode, Edge, EdgeInsertion, NodeId, NodeInsertion};
pub use layout::{GridLayout, GridOptions, TimelineLayout};
