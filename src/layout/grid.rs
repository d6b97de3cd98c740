//! Grid placement.
//!
//! Splits a bounding box into `rows x cols` equal cells and puts one node
//! in each cell. Nodes may be pinned to a row and/or column; everything
//! else fills the free cells in row-major order. The computation is pure:
//! same nodes and options in, same placement out.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, width: f64, height: f64) -> Self {
        Self {
            x1,
            y1,
            width,
            height,
        }
    }

    /// Zero (or negative, or NaN) extent in either direction.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Manual placement request. With only one coordinate given, the other is
/// the first free one counting up from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPin {
    pub row: Option<usize>,
    pub col: Option<usize>,
}

impl CellPin {
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            row: Some(row),
            col: Some(col),
        }
    }

    pub fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            col: None,
        }
    }

    pub fn col(col: usize) -> Self {
        Self {
            row: None,
            col: Some(col),
        }
    }
}

/// What the grid needs to know about a node.
pub trait LayoutNode {
    /// Rendered size, used to grow cells when overlap avoidance is on.
    fn size(&self) -> Option<Size> {
        None
    }

    /// Locked nodes keep their position; they get no placement.
    fn is_locked(&self) -> bool {
        false
    }

    /// Compound parents are not placed and do not count as cells.
    fn is_parent(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    pub bounding_box: BoundingBox,
    /// Force the number of rows.
    pub rows: Option<usize>,
    /// Force the number of columns.
    pub cols: Option<usize>,
    /// Grow cells so that no two nodes overlap, possibly overflowing the box.
    pub avoid_overlap: bool,
    /// Extra room around each node when `avoid_overlap` is on.
    pub avoid_overlap_padding: f64,
    /// Start from zero-sized cells instead of filling the box.
    pub condense: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            bounding_box: BoundingBox::new(0.0, 0.0, 1000.0, 600.0),
            rows: None,
            cols: None,
            avoid_overlap: true,
            avoid_overlap_padding: 10.0,
            condense: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    /// `None` when the bounding box is degenerate and no grid was built.
    pub cell: Option<Cell>,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPlacement {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    /// One entry per input node, in input order. `None` for nodes that were
    /// not placed (locked or parent).
    pub positions: Vec<Option<NodePosition>>,
}

type PinFn<'a, N> = Box<dyn Fn(&N) -> Option<CellPin> + 'a>;
type SortFn<'a, N> = Box<dyn Fn(&N, &N) -> Ordering + 'a>;

pub struct GridLayout<'a, N> {
    options: GridOptions,
    position: Option<PinFn<'a, N>>,
    sort: Option<SortFn<'a, N>>,
}

impl<'a, N: LayoutNode> GridLayout<'a, N> {
    pub fn new(options: GridOptions) -> Self {
        Self {
            options,
            position: None,
            sort: None,
        }
    }

    /// Per-node manual placement.
    pub fn with_position(mut self, position: impl Fn(&N) -> Option<CellPin> + 'a) -> Self {
        self.position = Some(Box::new(position));
        self
    }

    /// Order in which nodes claim cells (stable for equal nodes).
    pub fn with_sort(mut self, sort: impl Fn(&N, &N) -> Ordering + 'a) -> Self {
        self.sort = Some(Box::new(sort));
        self
    }

    pub fn run(&self, nodes: &[N]) -> GridPlacement {
        let mut order: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].is_parent()).collect();
        if let Some(sort) = &self.sort {
            order.sort_by(|&a, &b| sort(&nodes[a], &nodes[b]));
        }

        let bb = self.options.bounding_box;
        let mut positions = vec![None; nodes.len()];

        if bb.is_degenerate() {
            let point = Point { x: bb.x1, y: bb.y1 };
            for &i in order.iter().filter(|&&i| !nodes[i].is_locked()) {
                positions[i] = Some(NodePosition { cell: None, point });
            }
            return GridPlacement {
                rows: 0,
                cols: 0,
                cell_width: 0.0,
                cell_height: 0.0,
                positions,
            };
        }

        let (rows, cols) = grid_dimensions(order.len(), &bb, self.options.rows, self.options.cols);
        if order.is_empty() {
            return GridPlacement {
                rows,
                cols,
                cell_width: 0.0,
                cell_height: 0.0,
                positions,
            };
        }

        let (mut cell_width, mut cell_height) = if self.options.condense {
            (0.0, 0.0)
        } else {
            (bb.width / cols.max(1) as f64, bb.height / rows.max(1) as f64)
        };

        if self.options.avoid_overlap {
            let padding = self.options.avoid_overlap_padding;
            for &i in &order {
                let size = nodes[i].size().unwrap_or_default();
                cell_width = cell_width.max(size.width + padding);
                cell_height = cell_height.max(size.height + padding);
            }
        }

        let mut used: BTreeSet<Cell> = BTreeSet::new();
        let pinned = self.pin_cells(nodes, &order, &mut used);

        let center = |cell: Cell| Point {
            x: cell.col as f64 * cell_width + cell_width / 2.0 + bb.x1,
            y: cell.row as f64 * cell_height + cell_height / 2.0 + bb.y1,
        };

        let mut cursor = Cell { row: 0, col: 0 };
        let advance = |cursor: &mut Cell| {
            cursor.col += 1;
            if cursor.col >= cols {
                cursor.col = 0;
                cursor.row += 1;
            }
        };

        for &i in &order {
            if nodes[i].is_locked() {
                continue;
            }
            let cell = match pinned.get(&i) {
                Some(&cell) => cell,
                None => {
                    while used.contains(&cursor) {
                        advance(&mut cursor);
                    }
                    let cell = cursor;
                    used.insert(cell);
                    advance(&mut cursor);
                    cell
                }
            };
            positions[i] = Some(NodePosition {
                cell: Some(cell),
                point: center(cell),
            });
        }

        GridPlacement {
            rows,
            cols,
            cell_width,
            cell_height,
            positions,
        }
    }

    /// Resolve manual pins in node order, claiming their cells first.
    fn pin_cells(&self, nodes: &[N], order: &[usize], used: &mut BTreeSet<Cell>) -> BTreeMap<usize, Cell> {
        let mut pinned = BTreeMap::new();
        let Some(position) = &self.position else {
            return pinned;
        };

        for &i in order {
            let Some(pin) = position(&nodes[i]) else {
                continue;
            };
            let cell = match (pin.row, pin.col) {
                (Some(row), Some(col)) => Cell { row, col },
                (Some(row), None) => {
                    let mut cell = Cell { row, col: 0 };
                    while used.contains(&cell) {
                        cell.col += 1;
                    }
                    cell
                }
                (None, Some(col)) => {
                    let mut cell = Cell { row: 0, col };
                    while used.contains(&cell) {
                        cell.row += 1;
                    }
                    cell
                }
                (None, None) => continue,
            };
            used.insert(cell);
            pinned.insert(i, cell);
        }
        pinned
    }
}

/// Rows and columns for `cells` nodes in `bb`.
///
/// Fixed values win (a single fixed side derives the other by ceiling
/// division). Otherwise the box aspect ratio gives a rounded estimate that
/// is nudged by one row or column until it fits: shrinking tries the
/// smaller side first, growing tries the larger side first. On ties the
/// row count is the side that moves.
pub fn grid_dimensions(
    cells: usize,
    bb: &BoundingBox,
    fixed_rows: Option<usize>,
    fixed_cols: Option<usize>,
) -> (usize, usize) {
    match (fixed_rows.filter(|&r| r > 0), fixed_cols.filter(|&c| c > 0)) {
        (Some(rows), Some(cols)) => return (rows, cols),
        (Some(rows), None) => return (rows, cells.div_ceil(rows)),
        (None, Some(cols)) => return (cells.div_ceil(cols), cols),
        (None, None) => {}
    }

    // width/height * splits^2 = cells, where splits is the number of
    // times the height is divided. Neither side ever needs more than
    // `cells`, which also keeps extreme aspect ratios from saturating.
    let splits = (cells as f64 * bb.height / bb.width).sqrt();
    let mut dims = Dims {
        rows: (splits.round() as usize).min(cells),
        cols: ((bb.width / bb.height * splits).round() as usize).min(cells),
    };
    dims.fit(cells);

    (dims.rows, dims.cols)
}

struct Dims {
    rows: usize,
    cols: usize,
}

impl Dims {
    /// Nudge by one row or column until the grid holds `cells`.
    fn fit(&mut self, cells: usize) {
        if self.product() > cells {
            let (small, large) = (self.small(), self.large());
            if small.saturating_sub(1).saturating_mul(large) >= cells {
                self.set_small(small - 1);
            } else if large.saturating_sub(1).saturating_mul(small) >= cells {
                self.set_large(large - 1);
            }
        } else {
            while self.product() < cells {
                let (small, large) = (self.small(), self.large());
                if large.saturating_add(1).saturating_mul(small) >= cells {
                    self.set_large(large + 1);
                } else {
                    self.set_small(small + 1);
                }
            }
        }
    }

    fn product(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    fn small(&self) -> usize {
        self.rows.min(self.cols)
    }

    fn large(&self) -> usize {
        self.rows.max(self.cols)
    }

    fn set_small(&mut self, value: usize) {
        if self.small() == self.rows {
            self.rows = value;
        } else {
            self.cols = value;
        }
    }

    fn set_large(&mut self, value: usize) {
        if self.large() == self.rows {
            self.rows = value;
        } else {
            self.cols = value;
        }
    }
}
