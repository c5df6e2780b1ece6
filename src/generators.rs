use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::{debug, trace, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cells::{CellIndex, CompassPrimary};
use crate::errors::{Error, ErrorKind};
use crate::grid::Grid;
use crate::units::{ColumnsCount, EdgesCount, RowsCount};

/// The maze generation algorithms, selectable at runtime.
///
/// Every variant carves a perfect maze (a spanning tree of links) into a grid that has no
/// links yet. Running a generator over an already carved grid adds cycles; call
/// `Grid::clear_links` first to regenerate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MazeGenerator {
    BinaryTree,
    Sidewinder,
    Eller,
}

impl MazeGenerator {
    pub const ALL: [MazeGenerator; 3] = [MazeGenerator::BinaryTree,
                                         MazeGenerator::Sidewinder,
                                         MazeGenerator::Eller];

    pub fn generate<R: Rng + ?Sized>(self, grid: &mut Grid, rng: &mut R) {
        match self {
            MazeGenerator::BinaryTree => binary_tree(grid, rng),
            MazeGenerator::Sidewinder => sidewinder(grid, rng),
            MazeGenerator::Eller => eller(grid, rng),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MazeGenerator::BinaryTree => "binary-tree",
            MazeGenerator::Sidewinder => "sidewinder",
            MazeGenerator::Eller => "eller",
        }
    }
}

impl Default for MazeGenerator {
    fn default() -> MazeGenerator {
        MazeGenerator::Sidewinder
    }
}

impl fmt::Display for MazeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MazeGenerator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary-tree" | "binary" => Ok(MazeGenerator::BinaryTree),
            "sidewinder" => Ok(MazeGenerator::Sidewinder),
            "eller" => Ok(MazeGenerator::Eller),
            _ => Err(ErrorKind::UnknownGenerator(s.to_string()).into()),
        }
    }
}

// Heads closes a sidewinder run or joins a pair of eller sets.
fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}

fn log_generated(algorithm: MazeGenerator, grid: &Grid) {
    let (RowsCount(rows), ColumnsCount(columns)) = (grid.rows(), grid.columns());
    let EdgesCount(spanning_links) = grid.dimensions().spanning_tree_links();
    let links = grid.links_count();
    debug!("{} generated a {}x{} maze with {} links", algorithm, rows, columns, links);
    if links != spanning_links {
        warn!("{} maze has {} links where a perfect maze has {}, was the grid already carved?",
              algorithm, links, spanning_links);
    }
}

/// Apply the binary tree maze generation algorithm to a grid.
///
/// Visits every cell and carves a passage either south or east, picked at random from
/// whichever of those neighbours exist. The directions stay fixed for the whole maze,
/// otherwise we would carve closed off areas and not a perfect maze. The eastern column
/// and southern row always end up as unbroken corridors.
pub fn binary_tree<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    const CARVE_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::South, CompassPrimary::East];

    for cell in grid.iter() {
        let candidates = CARVE_DIRECTIONS.iter()
            .cloned()
            .filter(|&dir| grid.neighbour_at_direction(cell, dir).is_some())
            .collect::<SmallVec<[CompassPrimary; 2]>>();

        // Unless there are no neighbours (south east corner), randomly choose one to connect.
        if let Some(&dir) = candidates.choose(rng) {
            let _ = grid.link_direction(cell, dir);
        }
    }

    log_generated(MazeGenerator::BinaryTree, grid);
}

/// Apply the sidewinder maze generation algorithm to the grid.
///
/// Works a row at a time, west to east, growing a run of cells linked eastwards. After adding
/// each cell we flip a coin to decide whether to close out the run. Closing out carves north
/// from a random member of the run and starts a new run. The eastern boundary always closes a
/// run. The top row has nowhere north to carve so it is one long eastward corridor.
pub fn sidewinder<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for (row_number, row) in grid.iter_row().enumerate() {
        trace!("sidewinder carving row {}", row_number);
        let mut run: Vec<CellIndex> = Vec::with_capacity(row.len());

        for &cell in &row {
            run.push(cell);

            let at_eastern_boundary = grid.neighbour_at_direction(cell, CompassPrimary::East).is_none();
            let at_northern_boundary = grid.neighbour_at_direction(cell, CompassPrimary::North).is_none();

            let should_close_out = at_eastern_boundary || (!at_northern_boundary && coin_flip(rng));

            if should_close_out {
                if let Some(&member) = run.choose(rng) {
                    let _ = grid.link_direction(member, CompassPrimary::North);
                }
                run.clear();
            } else {
                let _ = grid.link_direction(cell, CompassPrimary::East);
            }
        }
    }

    log_generated(MazeGenerator::Sidewinder, grid);
}

type SetId = usize;

/// Apply Eller's maze generation algorithm to the grid.
///
/// Works a row at a time, north to south, tracking which cells are already connected by giving
/// them the same set id. Within a row, neighbouring cells from different sets are joined at
/// random. Every set then carves south from one random member so that no set is cut off from
/// the rows below. On the last row every remaining pair of different sets is joined.
///
/// Only the current row's set ids are kept. A finished row's ids are never read again, the
/// cells carved south carry their set into the next row.
pub fn eller<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let RowsCount(rows_count) = grid.rows();
    let ColumnsCount(columns_count) = grid.columns();
    let mut next_set_id: SetId = 0;
    // Set ids carved down into the next row, by column.
    let mut carried: Vec<Option<SetId>> = vec![None; columns_count];

    for (row_number, row) in grid.iter_row().enumerate() {
        trace!("eller carving row {}", row_number);
        let is_last_row = row_number + 1 == rows_count;

        let mut set_ids: Vec<SetId> = carried.iter()
            .cloned()
            .map(|carried_id| {
                carried_id.unwrap_or_else(|| {
                    next_set_id += 1;
                    next_set_id
                })
            })
            .collect();

        for column in 1..row.len() {
            if set_ids[column - 1] != set_ids[column] && coin_flip(rng) {
                join_sets(grid, &row, &mut set_ids, column);
            }
        }

        if is_last_row {
            for column in 1..row.len() {
                if set_ids[column - 1] != set_ids[column] {
                    join_sets(grid, &row, &mut set_ids, column);
                }
            }
        } else {
            carried = vec![None; columns_count];
            let sets = set_ids.iter().cloned().enumerate().group_by(|&(_, set_id)| set_id);

            for (set_id, members) in &sets {
                let columns = members.map(|(column, _)| column).collect::<SmallVec<[usize; 8]>>();
                if let Some(&column) = columns.choose(rng) {
                    if grid.link_direction(row[column], CompassPrimary::South).is_some() {
                        carried[column] = Some(set_id);
                    }
                }
            }
        }
    }

    log_generated(MazeGenerator::Eller, grid);
}

// Link the cell at `column` to its western neighbour and give the eastern set the western set's id.
// A row starts with at most one cell per set and joins only ever happen between neighbours, so
// every set is a contiguous run of the row and the eastern set is the run starting at `column`.
fn join_sets(grid: &mut Grid, row: &[CellIndex], set_ids: &mut [SetId], column: usize) {
    let _ = grid.link_direction(row[column], CompassPrimary::West);

    let (source, target) = (set_ids[column], set_ids[column - 1]);
    for set_id in set_ids[column..].iter_mut().take_while(|set_id| **set_id == source) {
        *set_id = target;
    }
}
