//! **mazes** is a maze generation and route finding library.
//!
//! A `grid::Grid` is a rectangular lattice of cells. A `generators::MazeGenerator` carves a
//! perfect maze into it (exactly one path between any two cells) and a `pathing::PathSolver`
//! finds that path. Drawing the result is left to the caller, who can read the links of every
//! cell or export them with `Grid::to_graph`.

// error_chain! expands deeply
#![recursion_limit = "1024"]

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_iterators;
pub mod pathing;
pub mod units;
mod utils;
