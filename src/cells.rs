use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::errors::{Error, ErrorKind};
use crate::pathing::Distances;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    // Position of this direction's slot in a cell's neighbour table.
    #[inline(always)]
    fn slot(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

impl FromStr for CompassPrimary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(CompassPrimary::North),
            "south" | "s" => Ok(CompassPrimary::South),
            "east" | "e" => Ok(CompassPrimary::East),
            "west" | "w" => Ok(CompassPrimary::West),
            _ => Err(ErrorKind::UnknownDirection(s.to_string()).into()),
        }
    }
}

/// Row and column of a cell. Row 0 is the northern edge, column 0 the western edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: usize,
    pub column: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate { row, column }
    }

    /// Creates a new `GridCoordinate` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (north of row 0, west of column 0).
    /// No upper bound is checked, that depends on the grid.
    pub fn offset(self, dir: CompassPrimary) -> Option<GridCoordinate> {
        let GridCoordinate { row, column } = self;
        match dir {
            CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, column)),
            CompassPrimary::South => row.checked_add(1).map(|r| GridCoordinate::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| GridCoordinate::new(row, c)),
            CompassPrimary::West => column.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
        }
    }

    /// Same row and neighbouring column, or same column and neighbouring row.
    pub fn is_adjacent(self, other: GridCoordinate) -> bool {
        let row_delta = if self.row > other.row { self.row - other.row } else { other.row - self.row };
        let col_delta = if self.column > other.column {
            self.column - other.column
        } else {
            other.column - self.column
        };
        row_delta + col_delta == 1
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(row_column_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Handle to a cell in a grid's arena, its row-major position.
///
/// Only a `Grid` hands these out. Neighbour and link references between cells are
/// all `CellIndex` values, the grid alone owns the cells.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellIndex(usize);

impl CellIndex {
    #[inline(always)]
    pub(crate) fn new(index: usize) -> CellIndex {
        CellIndex(index)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

// Four is the most neighbours or links a square cell can have, so these never spill to the heap.
pub type CellIndexSmallVec = SmallVec<[CellIndex; 4]>;

/// A lattice node: fixed coordinate and neighbours, mutable set of links (open passages).
#[derive(Debug, Clone)]
pub struct Cell {
    index: CellIndex,
    coordinate: GridCoordinate,
    neighbours: [Option<CellIndex>; 4],
    links: CellIndexSmallVec,
}

impl Cell {
    /// `neighbour_at` is asked once per direction, the answers are fixed for the cell's lifetime.
    pub(crate) fn new<F>(index: CellIndex, coordinate: GridCoordinate, neighbour_at: F) -> Cell
        where F: Fn(CompassPrimary) -> Option<CellIndex>
    {
        let mut neighbours = [None; 4];
        for &dir in &CompassPrimary::ALL {
            neighbours[dir.slot()] = neighbour_at(dir);
        }
        Cell {
            index,
            coordinate,
            neighbours,
            links: CellIndexSmallVec::new(),
        }
    }

    #[inline]
    pub fn index(&self) -> CellIndex {
        self.index
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.coordinate.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.coordinate.column
    }

    /// The adjacent cell in `direction`, None at the grid boundary.
    #[inline]
    pub fn neighbour(&self, direction: CompassPrimary) -> Option<CellIndex> {
        self.neighbours[direction.slot()]
    }

    /// All existing neighbours in north, south, east, west order, linked or not.
    pub fn neighbours(&self) -> CellIndexSmallVec {
        self.neighbours.iter().filter_map(|n| *n).collect()
    }

    pub fn is_neighbour(&self, other: CellIndex) -> bool {
        self.neighbours.iter().any(|n| *n == Some(other))
    }

    /// Cells this cell has an open passage to. No particular order.
    #[inline]
    pub fn links(&self) -> &[CellIndex] {
        &self.links
    }

    #[inline]
    pub fn is_linked(&self, other: CellIndex) -> bool {
        self.links.contains(&other)
    }

    pub fn is_neighbour_linked(&self, direction: CompassPrimary) -> bool {
        self.neighbour(direction).map_or(false, |n| self.is_linked(n))
    }

    /// The linked neighbour nearest the start of a priority-first solve, provided it is
    /// strictly nearer than this cell. None when this cell is unreached or is the start.
    pub fn closest_linked(&self, distances: &Distances) -> Option<CellIndex> {
        let own_distance = distances.distance_to(self.index)?;
        self.links
            .iter()
            .filter_map(|&link| distances.distance_to(link).map(|d| (link, d)))
            .filter(|&(_, d)| d < own_distance)
            .min_by_key(|&(_, d)| d)
            .map(|(link, _)| link)
    }

    // One half of a link. The grid always pairs this with the reverse call to keep links symmetric.
    pub(crate) fn link_one_way(&mut self, other: CellIndex) -> bool {
        if self.is_linked(other) {
            false
        } else {
            self.links.push(other);
            true
        }
    }

    pub(crate) fn unlink_one_way(&mut self, other: CellIndex) -> bool {
        if let Some(position) = self.links.iter().position(|&link| link == other) {
            self.links.swap_remove(position);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_links(&mut self) {
        self.links.clear();
    }
}
