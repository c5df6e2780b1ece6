use error_chain::bail;

use crate::cells::GridCoordinate;
use crate::errors::{ErrorKind, Result};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


/// Validated size of a rectangular grid. Rows and columns are both positive and
/// `rows * columns` fits in a `usize`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl GridDimensions {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<GridDimensions> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r == 0 || c == 0 || r.checked_mul(c).is_none() {
            bail!(ErrorKind::InvalidGridDimensions(r, c));
        }
        Ok(GridDimensions { rows, columns })
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Cell count and the number of links a grid could hold if every wall were open.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (RowsCount(r), ColumnsCount(c)) = (self.rows, self.columns);
        let horizontal = r.saturating_mul(c - 1);
        let vertical = c.saturating_mul(r - 1);
        (self.size(), EdgesCount(horizontal.saturating_add(vertical)))
    }

    /// Links in any perfect maze over this grid.
    #[inline]
    pub fn spanning_tree_links(&self) -> EdgesCount {
        EdgesCount(self.size().0 - 1)
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.row < self.rows.0 && coord.column < self.columns.0
    }

    /// Row-major position of a coordinate. None if the coordinate is outside the grid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row * self.columns.0 + coord.column)
        } else {
            None
        }
    }

    /// Inverse of `coordinate_to_index`. None if `index` is not a position in the grid.
    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> Option<GridCoordinate> {
        if index < self.size().0 {
            let ColumnsCount(width) = self.columns;
            Some(GridCoordinate::new(index / width, index % width))
        } else {
            None
        }
    }
}
