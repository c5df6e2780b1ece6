use std::fmt;
use std::ops::Index;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cell, CellIndex, CellIndexSmallVec, CompassPrimary, GridCoordinate};
use crate::errors::Result;
use crate::grid_dimensions::GridDimensions;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


/// A rectangular lattice of cells.
///
/// The cells live in one row-major arena and refer to each other by `CellIndex`, so the
/// neighbour and link relations can be as cyclic as they like without any shared ownership.
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotNeighbours,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, links: {:?}",
               self.rows(), self.columns(), self.links_count())
    }
}

impl Grid {
    /// Allocates `rows * columns` unlinked cells and wires up their neighbours.
    ///
    /// Fails with `ErrorKind::InvalidGridDimensions` if either dimension is zero.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid> {
        let dimensions = GridDimensions::new(rows, columns)?;
        let NodesCount(nodes) = dimensions.size();

        let cells = (0..nodes)
            .filter_map(|i| dimensions.index_to_coordinate(i).map(|coordinate| (i, coordinate)))
            .map(|(i, coordinate)| {
                // Boundaries fall out of the out of range lookup being None.
                Cell::new(CellIndex::new(i), coordinate, |dir| {
                    coordinate.offset(dir)
                              .and_then(|adjacent| dimensions.coordinate_to_index(adjacent))
                              .map(CellIndex::new)
                })
            })
            .collect();

        Ok(Grid { dimensions, cells })
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    /// # Panics
    ///
    /// If `index` did not come from a grid at least this large. `get` is the checked version.
    #[inline]
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index.index()]
    }

    #[inline]
    pub fn get(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.get(index.index())
    }

    /// The cell at a coordinate, None if the coordinate is outside the grid.
    #[inline]
    pub fn cell_at(&self, coord: GridCoordinate) -> Option<CellIndex> {
        self.dimensions.coordinate_to_index(coord).map(CellIndex::new)
    }

    /// Where a cell sits in the grid, None if `index` is outside the grid.
    #[inline]
    pub fn coordinate(&self, index: CellIndex) -> Option<GridCoordinate> {
        self.dimensions.index_to_coordinate(index.index())
    }

    #[inline]
    pub fn is_valid_index(&self, index: CellIndex) -> bool {
        index.index() < self.cells.len()
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> CellIndex {
        CellIndex::new(rng.gen_range(0..self.cells.len()))
    }

    /// Link two neighbouring cells, in both directions.
    pub fn link(&mut self, a: CellIndex, b: CellIndex) -> ::std::result::Result<(), CellLinkError> {
        if !(self.is_valid_index(a) && self.is_valid_index(b)) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        if !self.cells[a.index()].is_neighbour(b) {
            return Err(CellLinkError::NotNeighbours);
        }

        self.cells[a.index()].link_one_way(b);
        self.cells[b.index()].link_one_way(a);
        Ok(())
    }

    /// Link a cell to its neighbour in `direction`, if there is one. Returns the linked neighbour.
    pub fn link_direction(&mut self, index: CellIndex, direction: CompassPrimary) -> Option<CellIndex> {
        let neighbour = self.get(index)?.neighbour(direction)?;
        self.cells[index.index()].link_one_way(neighbour);
        self.cells[neighbour.index()].link_one_way(index);
        Some(neighbour)
    }

    /// Unlink two cells, if the indices are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: CellIndex, b: CellIndex) -> bool {
        if self.is_valid_index(a) && self.is_valid_index(b) {
            let forward = self.cells[a.index()].unlink_one_way(b);
            let backward = self.cells[b.index()].unlink_one_way(a);
            forward && backward
        } else {
            false
        }
    }

    /// Remove every link, leaving the grid as freshly constructed and ready to generate again.
    pub fn clear_links(&mut self) {
        for cell in &mut self.cells {
            cell.clear_links();
        }
    }

    /// Cells that are linked to a particular cell by a passage. Empty if `index` is outside the grid.
    #[inline]
    pub fn links(&self, index: CellIndex) -> &[CellIndex] {
        self.get(index).map_or(&[][..], Cell::links)
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    #[inline]
    pub fn neighbours(&self, index: CellIndex) -> CellIndexSmallVec {
        self.get(index).map(Cell::neighbours).unwrap_or_default()
    }

    pub fn neighbours_at_directions(&self,
                                    index: CellIndex,
                                    dirs: &[CompassPrimary])
                                    -> SmallVec<[Option<CellIndex>; 4]> {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(index, *direction))
            .collect()
    }

    #[inline]
    pub fn neighbour_at_direction(&self,
                                  index: CellIndex,
                                  direction: CompassPrimary)
                                  -> Option<CellIndex> {
        self.get(index)?.neighbour(direction)
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellIndex, b: CellIndex) -> bool {
        self.get(a).map_or(false, |cell| cell.is_linked(b))
    }

    pub fn is_neighbour_linked(&self, index: CellIndex, direction: CompassPrimary) -> bool {
        self.get(index).map_or(false, |cell| cell.is_neighbour_linked(direction))
    }

    /// Number of undirected links.
    pub fn links_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.links().len()).sum::<usize>() / 2
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(&self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(&self.dimensions)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::columns(&self.dimensions)
    }

    /// Every undirected link exactly once, as (lower index, higher index).
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (CellIndex, CellIndex)> + 'a {
        self.cells.iter().flat_map(|cell| {
            let from = cell.index();
            cell.links()
                .iter()
                .filter(move |&&to| from < to)
                .map(move |&to| (from, to))
        })
    }

    /// The link relation as a petgraph undirected graph.
    /// Node `i` of the graph is the cell with `CellIndex` `i` and is weighted by its coordinate.
    pub fn to_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.dimensions.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for cell in &self.cells {
            let _ = graph.add_node(cell.coordinate());
        }
        for (a, b) in self.iter_links() {
            let _ = graph.add_edge(NodeIndex::new(a.index()), NodeIndex::new(b.index()), ());
        }
        graph
    }
}

/// Panics like `Grid::cell` on an index from a larger grid.
impl Index<CellIndex> for Grid {
    type Output = Cell;

    fn index(&self, index: CellIndex) -> &Cell {
        self.cell(index)
    }
}
