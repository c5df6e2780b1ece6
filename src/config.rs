use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};

use crate::cells::{CellIndex, GridCoordinate};
use crate::errors::Result;
use crate::generators::MazeGenerator;
use crate::grid::Grid;
use crate::pathing::PathSolver;
use crate::units::{ColumnsCount, RowsCount};

/// Everything needed to build and solve one maze.
///
/// Deserialises from e.g. `{"rows": 20, "columns": 30, "generator": "eller", "seed": 7}`.
/// `generator` defaults to sidewinder, `solver` to dijkstra, and without a `seed` every
/// build is different.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MazeConfig {
    pub rows: usize,
    pub columns: usize,
    #[serde(default)]
    pub generator: MazeGenerator,
    #[serde(default)]
    pub solver: PathSolver,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MazeConfig {
    pub fn new(rows: usize, columns: usize) -> MazeConfig {
        MazeConfig {
            rows,
            columns,
            generator: MazeGenerator::default(),
            solver: PathSolver::default(),
            seed: None,
        }
    }

    pub fn with_generator(mut self, generator: MazeGenerator) -> MazeConfig {
        self.generator = generator;
        self
    }

    pub fn with_solver(mut self, solver: PathSolver) -> MazeConfig {
        self.solver = solver;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> MazeConfig {
        self.seed = Some(seed);
        self
    }

    /// The random source for generation: seeded from `seed`, or from the thread rng if unset.
    pub fn rng(&self) -> XorShiftRng {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        XorShiftRng::seed_from_u64(seed)
    }

    /// A new grid carved by the configured generator.
    pub fn build(&self) -> Result<Grid> {
        let mut grid = Grid::new(RowsCount(self.rows), ColumnsCount(self.columns))?;
        self.generator.generate(&mut grid, &mut self.rng());
        Ok(grid)
    }

    /// Solve `grid` from its north west corner to its south east corner with the configured solver.
    pub fn solve(&self, grid: &Grid) -> Option<Vec<CellIndex>> {
        let (start, end) = corners(grid)?;
        self.solver.solve(grid, start, end)
    }
}

/// The north west and south east corner cells of a grid.
pub fn corners(grid: &Grid) -> Option<(CellIndex, CellIndex)> {
    let (RowsCount(rows), ColumnsCount(columns)) = (grid.rows(), grid.columns());
    let north_west = grid.cell_at(GridCoordinate::new(0, 0))?;
    let south_east = grid.cell_at(GridCoordinate::new(rows - 1, columns - 1))?;
    Some((north_west, south_east))
}
