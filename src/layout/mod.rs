//! Placement of graph nodes on a cell grid.

pub mod grid;
pub mod timeline;

pub use grid::{
    BoundingBox, Cell, CellPin, GridLayout, GridOptions, GridPlacement, LayoutNode, NodePosition,
    Point, Size, grid_dimensions,
};
pub use timeline::{PeriodColumn, TimelineLayout, timeline};
