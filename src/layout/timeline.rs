//! Period timeline: one grid column per period, stacked rows inside it.

use crate::graph::{DependencyGraph, DependencyNode, NodeId};
use crate::layout::grid::{
    BoundingBox, CellPin, GridLayout, GridOptions, GridPlacement, LayoutNode, NodePosition, Size,
};
use serde::Serialize;
use std::collections::BTreeMap;

struct TimelineNode<'g> {
    node: &'g DependencyNode,
    size: Size,
}

impl LayoutNode for TimelineNode<'_> {
    fn size(&self) -> Option<Size> {
        Some(self.size)
    }
}

/// Horizontal extent of one period column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodColumn {
    pub period: i64,
    pub x_start: f64,
    pub x_end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Period shown in the first column.
    pub first_period: i64,
    pub bounding_box: BoundingBox,
    pub positions: BTreeMap<NodeId, NodePosition>,
}

/// Lay the graph out with `cols = periodCount` and
/// `rows = maxNodesInPeriod`, pinning every node to its period's column.
///
/// `rows` and `cols` in `options` are ignored.
pub fn timeline(graph: &DependencyGraph, options: &GridOptions, node_size: Size) -> TimelineLayout {
    let bounds = graph.bounds();
    let first_period = bounds.lower;

    let nodes: Vec<TimelineNode<'_>> = graph
        .nodes_list()
        .into_iter()
        .map(|node| TimelineNode {
            node,
            size: node_size,
        })
        .collect();

    let options = GridOptions {
        rows: Some(bounds.max_nodes_in_period.max(1)),
        cols: Some(bounds.count.max(1)),
        ..options.clone()
    };
    let GridPlacement {
        rows,
        cols,
        cell_width,
        cell_height,
        positions,
    } = GridLayout::new(options.clone())
        .with_position(move |n: &TimelineNode<'_>| {
            let col = usize::try_from(n.node.period() - first_period).unwrap_or(0);
            Some(CellPin::col(col))
        })
        .run(&nodes);

    let positions = nodes
        .iter()
        .zip(positions)
        .filter_map(|(n, position)| position.map(|p| (n.node.id(), p)))
        .collect();

    TimelineLayout {
        rows,
        cols,
        cell_width,
        cell_height,
        first_period,
        bounding_box: options.bounding_box,
        positions,
    }
}

impl TimelineLayout {
    pub fn position(&self, id: NodeId) -> Option<&NodePosition> {
        self.positions.get(&id)
    }

    /// Period under horizontal coordinate `x`. Coordinates left of the grid
    /// give periods before the first column, right of it after the last.
    pub fn period_at(&self, x: f64) -> i64 {
        if self.cell_width <= 0.0 {
            return self.first_period;
        }
        let offset = ((x - self.bounding_box.x1) / self.cell_width).floor();
        self.first_period + offset as i64
    }

    /// Column extents, left to right; gridlines sit on the boundaries.
    pub fn period_columns(&self) -> Vec<PeriodColumn> {
        (0..self.cols)
            .map(|col| {
                let x_start = self.bounding_box.x1 + col as f64 * self.cell_width;
                PeriodColumn {
                    period: self.first_period + col as i64,
                    x_start,
                    x_end: x_start + self.cell_width,
                }
            })
            .collect()
    }
}
