//! Serializable views of a graph and its layout, for the CLI's JSON output.

use crate::graph::{DependencyGraph, NodeId, PeriodBounds};
use crate::layout::{Cell, PeriodColumn, Point, TimelineLayout};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub period: i64,
    /// Literal form, e.g. `(next (-p- a))`.
    pub literal: String,
    pub dependencies: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub bounds: PeriodBounds,
    /// Period order, then label order within a period.
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNodeView {
    pub id: NodeId,
    pub label: String,
    pub period: i64,
    pub cell: Option<Cell>,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutView {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub periods: Vec<PeriodColumn>,
    pub nodes: Vec<PositionedNodeView>,
}

pub fn build_graph_view(graph: &DependencyGraph) -> GraphView {
    let nodes = graph
        .nodes_list()
        .into_iter()
        .map(|node| NodeView {
            id: node.id(),
            label: node.label().to_string(),
            period: node.period(),
            literal: node.literal().to_string(),
            dependencies: node.dependencies().iter().copied().collect(),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeView {
            source: edge.source,
            target: edge.target,
        })
        .collect();

    GraphView {
        bounds: graph.bounds(),
        nodes,
        edges,
        formula: graph.to_dependency_formula(),
    }
}

/// Nodes without a placement (none today, the timeline places everything)
/// are left out.
pub fn build_layout_view(graph: &DependencyGraph, layout: &TimelineLayout) -> LayoutView {
    let nodes = graph
        .nodes_list()
        .into_iter()
        .filter_map(|node| {
            let position = layout.position(node.id())?;
            Some(PositionedNodeView {
                id: node.id(),
                label: node.label().to_string(),
                period: node.period(),
                cell: position.cell,
                point: position.point,
            })
        })
        .collect();

    LayoutView {
        rows: layout.rows,
        cols: layout.cols,
        cell_width: layout.cell_width,
        cell_height: layout.cell_height,
        periods: layout.period_columns(),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BoundingBox, GridOptions, Size, timeline};
    use pretty_assertions::assert_eq;

    #[test]
    fn graph_view_lists_nodes_and_edges() {
        let graph = DependencyGraph::from_formula("(dep (-p- a) (next (-p- b)))").expect("parse");
        let view = build_graph_view(&graph);

        let labels: Vec<_> = view
            .nodes
            .iter()
            .map(|n| (n.label.as_str(), n.period, n.literal.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("a", 0, "(-p- a)"), ("b", 1, "(next (-p- b))")]
        );
        assert_eq!(view.nodes[0].dependencies, vec![view.nodes[1].id]);
        assert_eq!(
            view.edges,
            vec![EdgeView {
                source: view.nodes[0].id,
                target: view.nodes[1].id
            }]
        );
        assert_eq!(view.formula, "(dep (-p- a) (next (-p- b)))");
        assert_eq!((view.bounds.lower, view.bounds.upper), (0, 1));
    }

    #[test]
    fn graph_view_serializes() {
        let graph = DependencyGraph::from_formula("(dep (-p- a) (-p- b))").expect("parse");
        let json = serde_json::to_value(build_graph_view(&graph)).expect("json");
        assert_eq!(json["bounds"]["count"], 1);
        assert_eq!(json["nodes"][1]["label"], "b");
        assert_eq!(json["edges"][0]["target"], json["nodes"][1]["id"]);
    }

    #[test]
    fn layout_view_carries_cells_and_columns() {
        let graph = DependencyGraph::from_formula("(dep (-p- a) (next (-p- b)))").expect("parse");
        let options = GridOptions {
            bounding_box: BoundingBox::new(0.0, 0.0, 200.0, 100.0),
            avoid_overlap: false,
            ..Default::default()
        };
        let layout = timeline(&graph, &options, Size::default());
        let view = build_layout_view(&graph, &layout);

        assert_eq!((view.rows, view.cols), (1, 2));
        assert_eq!(view.periods.len(), 2);
        let cells: Vec<_> = view.nodes.iter().map(|n| (n.label.as_str(), n.cell)).collect();
        assert_eq!(
            cells,
            vec![
                ("a", Some(Cell { row: 0, col: 0 })),
                ("b", Some(Cell { row: 0, col: 1 })),
            ]
        );
        assert_eq!(view.nodes[1].point, Point { x: 150.0, y: 50.0 });
    }
}
