//! The dependency graph: period-indexed nodes plus an ordered edge list.
//!
//! Nodes live in an id-keyed arena. `(period, label)` pairs are unique and
//! indexed separately; every mutation goes through this type so the index,
//! the per-node dependency sets and the period aggregates stay consistent.

use crate::formula::{DependencyClause, FormulaError, Literal, dependency_clauses, write_formula};
use crate::graph::bounds::PeriodBounds;
use crate::graph::edge::{Edge, EdgeInsertion};
use crate::graph::node::{DependencyNode, NodeId, NodeInsertion};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Label prefix for nodes created without a name.
pub const NEW_NODE_PREFIX: &str = "NewNode";

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<NodeId, DependencyNode>,
    periods: BTreeMap<i64, BTreeMap<String, NodeId>>,
    /// Insertion order is kept so serialization is deterministic.
    edges: Vec<Edge>,
    bounds: PeriodBounds,
    next_id: u32,
    /// Bumped by every mutation.
    version: u64,
    listing: RefCell<Listing>,
}

/// Flattened node order, valid while `version` matches the graph's.
#[derive(Debug, Clone, Default)]
struct Listing {
    version: Option<u64>,
    order: Vec<NodeId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a dependency formula.
    pub fn from_formula(text: &str) -> Result<Self, FormulaError> {
        let mut graph = Self::new();
        graph.load_formula(text)?;
        Ok(graph)
    }

    /// Merge every clause of `text` into this graph. Returns the number of
    /// clauses applied.
    pub fn load_formula(&mut self, text: &str) -> Result<usize, FormulaError> {
        let clauses = dependency_clauses(text)?;
        debug!(clauses = clauses.len(), "loading dependency formula");

        for clause in &clauses {
            self.apply_clause(clause);
        }
        Ok(clauses.len())
    }

    fn apply_clause(&mut self, clause: &DependencyClause) {
        let main = self.add_node(clause.main.clone()).id();
        for target in &clause.targets {
            let target = self.add_node(target.clone()).id();
            self.add_edge(main, target);
        }
    }

    // --- Accessors ---

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> PeriodBounds {
        self.bounds
    }

    pub fn period_lower_bound(&self) -> i64 {
        self.bounds.lower
    }

    pub fn period_upper_bound(&self) -> i64 {
        self.bounds.upper
    }

    pub fn period_count(&self) -> usize {
        self.bounds.count
    }

    pub fn max_nodes_in_period(&self) -> usize {
        self.bounds.max_nodes_in_period
    }

    /// Changes whenever the graph is mutated.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node(&self, period: i64, label: &str) -> Option<&DependencyNode> {
        self.lookup(period, label).and_then(|id| self.nodes.get(&id))
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&DependencyNode> {
        self.nodes.get(&id)
    }

    /// Nodes of one period, ordered by label.
    pub fn nodes_in_period(&self, period: i64) -> impl Iterator<Item = &DependencyNode> + '_ {
        self.periods
            .get(&period)
            .into_iter()
            .flat_map(|labels| labels.values())
            .filter_map(|id| self.nodes.get(id))
    }

    /// Periods that currently hold at least one node, ascending.
    pub fn periods(&self) -> impl Iterator<Item = i64> + '_ {
        self.periods.keys().copied()
    }

    /// Every node in period-then-label order.
    ///
    /// Only the flattened id order is cached, until the next mutation; that
    /// spares the walk over the period index, but each call still resolves
    /// every id in the arena.
    pub fn nodes_list(&self) -> Vec<&DependencyNode> {
        let mut listing = self.listing.borrow_mut();
        if listing.version != Some(self.version) {
            listing.order = self
                .periods
                .values()
                .flat_map(|labels| labels.values().copied())
                .collect();
            listing.version = Some(self.version);
        }
        listing
            .order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_from(&self, source: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.source == source)
    }

    pub fn edges_to(&self, target: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.target == target)
    }

    fn lookup(&self, period: i64, label: &str) -> Option<NodeId> {
        self.periods.get(&period)?.get(label).copied()
    }

    // --- Mutation ---

    /// Add a literal as a node. An existing node with the same period and
    /// label is returned unchanged instead of creating a duplicate.
    ///
    /// The label is stored the way [`Literal::parse`] would read it back,
    /// so `"New Node"` becomes `"NewNode"`.
    pub fn add_node(&mut self, literal: Literal) -> NodeInsertion {
        let literal = literal.normalized();
        if let Some(id) = self.lookup(literal.period, &literal.label) {
            return NodeInsertion::Existing(id);
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.attach(DependencyNode::new(id, literal));
        NodeInsertion::Inserted(id)
    }

    /// Add a fresh node at `period` with a generated `NewNode<n>` label.
    pub fn add_new_node(&mut self, period: i64) -> NodeId {
        let mut n = self.node_count() + 1;
        let mut label = format!("{NEW_NODE_PREFIX}{n}");
        while self.lookup(period, &label).is_some() {
            n += 1;
            label = format!("{NEW_NODE_PREFIX}{n}");
        }
        self.add_node(Literal::new(label, period)).id()
    }

    /// Add `source -> target`. Self-loops, duplicates and dangling ids are
    /// rejected without touching the graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> EdgeInsertion {
        if source == target {
            debug!(%source, "rejecting self-loop");
            return EdgeInsertion::SelfLoop;
        }
        for id in [source, target] {
            if !self.nodes.contains_key(&id) {
                warn!(%id, "edge references a node that is not in the graph");
                return EdgeInsertion::UnknownNode(id);
            }
        }
        let edge = Edge::new(source, target);
        if self.edges.contains(&edge) {
            return EdgeInsertion::Duplicate;
        }

        debug!(%source, %target, "adding edge");
        self.edges.push(edge);
        if let Some(node) = self.nodes.get_mut(&source) {
            node.dependencies.insert(target);
        }
        self.touch();
        EdgeInsertion::Inserted
    }

    /// Remove the first `source -> target` edge, if any.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Option<Edge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.source == source && e.target == target)?;

        debug!(%source, %target, "removing edge");
        let edge = self.edges.remove(index);
        if let Some(node) = self.nodes.get_mut(&source) {
            node.dependencies.remove(&target);
        }
        self.touch();
        Some(edge)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, period: i64, label: &str) -> Option<DependencyNode> {
        let Some(id) = self.lookup(period, label) else {
            warn!(period, label, "no node to remove");
            return None;
        };
        self.remove_related_edges(id);
        self.detach(id)
    }

    /// Relabel a node, keeping its edges.
    ///
    /// If the new label is already taken in that period the two nodes merge:
    /// the existing one survives and inherits the renamed node's edges.
    /// Returns the id of the surviving node. The new label is cleaned like
    /// in [`add_node`](Self::add_node); one that cleans down to nothing is
    /// refused.
    pub fn rename_node(&mut self, period: i64, label: &str, new_label: &str) -> Option<NodeId> {
        let Some(id) = self.lookup(period, label) else {
            warn!(period, label, "no node to rename");
            return None;
        };
        let new_label = Literal::clean_label(new_label);
        if new_label.is_empty() {
            warn!(period, label, "refusing to rename node to an empty label");
            return None;
        }
        let new_label = new_label.as_str();

        let captured = self.related_edges(id);
        let mut node = self.remove_node(period, label)?;
        node.label = new_label.to_string();
        node.dependencies.clear();

        let survivor = match self.lookup(period, new_label) {
            Some(existing) => {
                debug!(%id, %existing, new_label, "rename collides, merging into existing node");
                existing
            }
            None => {
                self.attach(node);
                id
            }
        };
        self.restore_edges(&captured, id, survivor);
        Some(survivor)
    }

    /// Move a node to another period.
    ///
    /// Unlike [`rename_node`](Self::rename_node), moving onto an existing
    /// node with the same label keeps only the destination's edges; the
    /// moved node's edges are dropped. Returns the id of the node now
    /// holding `(new_period, label)`.
    pub fn update_node_period(&mut self, label: &str, period: i64, new_period: i64) -> Option<NodeId> {
        let Some(id) = self.lookup(period, label) else {
            warn!(period, label, "no node to move");
            return None;
        };
        debug!(label, period, new_period, "updating node period");

        let captured = self.related_edges(id);
        let mut node = self.remove_node(period, label)?;
        node.period = new_period;
        node.dependencies.clear();

        if let Some(existing) = self.lookup(new_period, label) {
            debug!(%id, %existing, "destination period already has this label, dropping moved edges");
            return Some(existing);
        }
        self.attach(node);
        self.restore_edges(&captured, id, id);
        Some(id)
    }

    /// Drop all nodes and edges. Ids keep counting up.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.periods.clear();
        self.edges.clear();
        self.bounds = PeriodBounds::default();
        self.touch();
    }

    // --- Serialization ---

    /// Render the graph as a dependency formula: one `dep` clause per node
    /// that has dependencies, targets in edge insertion order.
    pub fn to_dependency_formula(&self) -> String {
        let clauses: Vec<DependencyClause> = self
            .nodes_list()
            .into_iter()
            .filter(|node| node.has_dependencies())
            .map(|node| DependencyClause {
                main: node.literal(),
                targets: self
                    .edges_from(node.id)
                    .filter_map(|e| self.nodes.get(&e.target))
                    .map(DependencyNode::literal)
                    .collect(),
            })
            .collect();
        write_formula(&clauses)
    }

    // --- Internals ---

    fn touch(&mut self) {
        self.version += 1;
    }

    fn attach(&mut self, node: DependencyNode) {
        debug!(node = %node, "adding node");
        let period = node.period;
        let labels = self.periods.entry(period).or_default();
        labels.insert(node.label.clone(), node.id);
        let population = labels.len();

        self.nodes.insert(node.id, node);
        self.bounds.include(period, population);
        self.touch();
    }

    fn detach(&mut self, id: NodeId) -> Option<DependencyNode> {
        let node = self.nodes.remove(&id)?;
        let period = node.period;

        let emptied = match self.periods.get_mut(&period) {
            Some(labels) => {
                labels.remove(&node.label);
                labels.is_empty()
            }
            None => false,
        };
        if emptied {
            self.periods.remove(&period);
            if period == self.bounds.lower || period == self.bounds.upper {
                let remaining = self
                    .periods
                    .keys()
                    .next()
                    .zip(self.periods.keys().next_back())
                    .map(|(first, last)| (*first, *last));
                self.bounds.trim(period, remaining);
                debug!(
                    lower = self.bounds.lower,
                    upper = self.bounds.upper,
                    count = self.bounds.count,
                    "recomputed period bounds"
                );
            }
        }
        if self.nodes.is_empty() {
            self.bounds = PeriodBounds::default();
        }
        self.bounds.max_nodes_in_period =
            self.periods.values().map(BTreeMap::len).max().unwrap_or(0);

        debug!(node = %node, "removed node");
        self.touch();
        Some(node)
    }

    fn related_edges(&self, id: NodeId) -> Vec<Edge> {
        self.edges.iter().filter(|e| e.touches(id)).copied().collect()
    }

    fn remove_related_edges(&mut self, id: NodeId) {
        for edge in self.related_edges(id) {
            self.remove_edge(edge.source, edge.target);
        }
    }

    /// Re-add captured edges with `old` replaced by `new`.
    fn restore_edges(&mut self, captured: &[Edge], old: NodeId, new: NodeId) {
        let swap = |id: NodeId| if id == old { new } else { id };
        for edge in captured {
            self.add_edge(swap(edge.source), swap(edge.target));
        }
    }
}

impl FromStr for DependencyGraph {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formula(s)
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph lowerbound: {} upperbound: {} maxNodes: {}",
            self.bounds.lower, self.bounds.upper, self.bounds.max_nodes_in_period
        )?;
        for (period, labels) in &self.periods {
            writeln!(f, "Period: {period} contains:")?;
            for node in labels.values().filter_map(|id| self.nodes.get(id)) {
                writeln!(f, "{node}")?;
            }
        }
        for edge in &self.edges {
            writeln!(f, "{edge}")?;
        }
        Ok(())
    }
}
