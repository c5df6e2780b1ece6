use std::iter::FusedIterator;

use crate::cells::CellIndex;
use crate::grid_dimensions::GridDimensions;
use crate::units::{ColumnsCount, RowsCount};

/// Row-major iteration over every cell of a grid. Cheap to recreate, so restartable via `Grid::iter`.
#[derive(Debug, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(dimensions: &GridDimensions) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl Iterator for CellIter {
    type Item = CellIndex;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let index = CellIndex::new(self.current_cell_number);
            self.current_cell_number += 1;
            Some(index)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl FusedIterator for CellIter {}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iteration over whole rows (west to east) or whole columns (north to south).
#[derive(Debug, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl BatchIter {
    pub(crate) fn rows(dimensions: &GridDimensions) -> BatchIter {
        BatchIter::new(BatchIterType::Row, dimensions)
    }

    pub(crate) fn columns(dimensions: &GridDimensions) -> BatchIter {
        BatchIter::new(BatchIterType::Column, dimensions)
    }

    fn new(iter_type: BatchIterType, dimensions: &GridDimensions) -> BatchIter {
        BatchIter {
            iter_type,
            current_index: 0,
            rows: dimensions.rows(),
            columns: dimensions.columns(),
        }
    }

    fn batch_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.rows.0,
            BatchIterType::Column => self.columns.0,
        }
    }
}

impl Iterator for BatchIter {
    type Item = Vec<CellIndex>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batch_count() {
            return None;
        }

        let (RowsCount(rows), ColumnsCount(columns)) = (self.rows, self.columns);
        let n = self.current_index;
        let cells = match self.iter_type {
            BatchIterType::Row => (0..columns).map(|col| CellIndex::new(n * columns + col)).collect(),
            BatchIterType::Column => (0..rows).map(|row| CellIndex::new(row * columns + n)).collect(),
        };
        self.current_index += 1;
        Some(cells)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batch_count() - self.current_index;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for BatchIter {}
impl FusedIterator for BatchIter {}
