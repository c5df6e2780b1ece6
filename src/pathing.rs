// Two ways of finding a route between cells:
// - depth first: an explicit stack of (cell, path so far), returning the first path that reaches the end.
//   On a perfect maze the first path is the only path.
// - priority first (Dijkstra): unit weight on every link, distances relaxed from a min-heap, then the
//   path is recovered by stepping from the end to whichever linked neighbour is closest to the start.
//
// Only existing links are ever relaxed, so there is no notion of an impassable edge weight.
//
// The scratch state of a Dijkstra solve (distances, predecessors) lives in a `Distances` value
// rather than in the cells, so solving only ever needs a `&Grid`. Path recovery reads distances
// only; predecessors are recorded for callers that want the relaxation tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cells::CellIndex;
use crate::errors::{Error, ErrorKind};
use crate::grid::Grid;
use crate::utils;

// Distance of a cell not (yet) reached from the start.
const UNREACHED: usize = usize::MAX;

/// The path solving algorithms, selectable at runtime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathSolver {
    DepthFirst,
    Dijkstra,
}

impl PathSolver {
    pub const ALL: [PathSolver; 2] = [PathSolver::DepthFirst, PathSolver::Dijkstra];

    /// Cells from `start` to `end` inclusive, each linked to the next. None if there is no route.
    pub fn solve(self, grid: &Grid, start: CellIndex, end: CellIndex) -> Option<Vec<CellIndex>> {
        match self {
            PathSolver::DepthFirst => depth_first_path(grid, start, end),
            PathSolver::Dijkstra => dijkstra_path(grid, start, end),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathSolver::DepthFirst => "depth-first",
            PathSolver::Dijkstra => "dijkstra",
        }
    }
}

impl Default for PathSolver {
    fn default() -> PathSolver {
        PathSolver::Dijkstra
    }
}

impl fmt::Display for PathSolver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathSolver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth-first" | "dfs" => Ok(PathSolver::DepthFirst),
            "dijkstra" => Ok(PathSolver::Dijkstra),
            _ => Err(ErrorKind::UnknownSolver(s.to_string()).into()),
        }
    }
}

fn endpoints_valid(solver: PathSolver, grid: &Grid, start: CellIndex, end: CellIndex) -> bool {
    let valid = grid.is_valid_index(start) && grid.is_valid_index(end);
    if !valid {
        warn!("{} solve requested between {:?} and {:?}, outside a grid of {} cells",
              solver, start, end, grid.size());
    }
    valid
}

fn log_solved(solver: PathSolver, grid: &Grid, start: CellIndex, end: CellIndex, path: &Option<Vec<CellIndex>>) {
    let (from, to) = match (grid.coordinate(start), grid.coordinate(end)) {
        (Some(from), Some(to)) => (from, to),
        _ => return,
    };
    match *path {
        Some(ref cells) => debug!("{} solved {} -> {} with a path of {} cells", solver, from, to, cells.len()),
        None => debug!("{} found no path {} -> {}", solver, from, to),
    }
}

/// Depth first search from `start` along links until `end` is popped off the stack.
pub fn depth_first_path(grid: &Grid, start: CellIndex, end: CellIndex) -> Option<Vec<CellIndex>> {
    if !endpoints_valid(PathSolver::DepthFirst, grid, start, end) {
        return None;
    }

    let mut stack = vec![(start, vec![start])];
    let mut visited = utils::fnv_hashset(grid.size());
    let mut found = None;

    while let Some((cell, path)) = stack.pop() {
        if cell == end {
            found = Some(path);
            break;
        }
        visited.insert(cell);

        for &link in grid.links(cell) {
            if !visited.contains(&link) {
                let mut extended = path.clone();
                extended.push(link);
                stack.push((link, extended));
            }
        }
    }

    log_solved(PathSolver::DepthFirst, grid, start, end, &found);
    found
}

/// Dijkstra's shortest path from `start` to `end`.
pub fn dijkstra_path(grid: &Grid, start: CellIndex, end: CellIndex) -> Option<Vec<CellIndex>> {
    if !endpoints_valid(PathSolver::Dijkstra, grid, start, end) {
        return None;
    }

    let path = Distances::dijkstra(grid, start).and_then(|distances| shortest_path(grid, &distances, end));
    log_solved(PathSolver::Dijkstra, grid, start, end, &path);
    path
}

/// Distances, in links, from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start: CellIndex,
    distances: Vec<usize>,
    predecessors: Vec<Option<CellIndex>>,
    max_distance: usize,
}

impl Distances {
    /// Priority first flood of the grid from `start`. None if `start` is not a cell of the grid.
    pub fn dijkstra(grid: &Grid, start: CellIndex) -> Option<Distances> {
        if !grid.is_valid_index(start) {
            return None;
        }

        let mut distances = vec![UNREACHED; grid.size()];
        let mut predecessors = vec![None; grid.size()];
        distances[start.index()] = 0;

        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0, start)));

        while let Some(Reverse((distance, cell))) = frontier.pop() {
            if distance > distances[cell.index()] {
                // A shorter route to this cell was queued after this entry and has been relaxed already.
                continue;
            }

            for &link in grid.links(cell) {
                let candidate = distance + 1;
                if candidate < distances[link.index()] {
                    distances[link.index()] = candidate;
                    predecessors[link.index()] = Some(cell);
                    frontier.push(Reverse((candidate, link)));
                }
            }
        }

        let max_distance = distances.iter().cloned().filter(|&d| d != UNREACHED).max().unwrap_or(0);

        Some(Distances {
            start,
            distances,
            predecessors,
            max_distance,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> CellIndex {
        self.start
    }

    #[inline(always)]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    /// None when `cell` is unreachable from the start.
    #[inline]
    pub fn distance_to(&self, cell: CellIndex) -> Option<usize> {
        self.distances.get(cell.index()).cloned().filter(|&d| d != UNREACHED)
    }

    /// The cell that last lowered `cell`'s distance during relaxation.
    /// None for the start cell and unreachable cells.
    #[inline]
    pub fn predecessor(&self, cell: CellIndex) -> Option<CellIndex> {
        self.predecessors.get(cell.index()).cloned().and_then(|p| p)
    }

    pub fn furthest_cells(&self) -> SmallVec<[CellIndex; 8]> {
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == self.max_distance)
            .map(|(i, _)| CellIndex::new(i))
            .collect()
    }
}

/// Recover the path from the start of `distances_from_start` to `end_point`.
///
/// Walks backwards from `end_point`, each step moving to the linked neighbour with the smallest
/// distance that is strictly less than the current cell's, until the start is reached.
/// None if `end_point` is unreachable, or `distances_from_start` was computed on some other grid.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: CellIndex)
                     -> Option<Vec<CellIndex>> {

    // The end point is not reachable from start.
    distances_from_start.distance_to(end_point)?;
    if !grid.is_valid_index(end_point) {
        return None;
    }

    let start = distances_from_start.start();
    let mut path = vec![end_point];
    let mut current = end_point;

    while current != start {
        // Every step is strictly closer to the start, so this terminates.
        current = grid.get(current)?.closest_linked(distances_from_start)?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}

/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary
/// path. The start of the longest path is the cell furthest from an arbitrary cell, and its end
/// is the cell furthest from that.
pub fn longest_path(grid: &Grid) -> Option<Vec<CellIndex>> {
    let arbitrary_start = grid.iter().next()?;
    let first_distances = Distances::dijkstra(grid, arbitrary_start)?;
    let long_path_start = *first_distances.furthest_cells().first()?;

    let distances_from_start = Distances::dijkstra(grid, long_path_start)?;
    let end_point = *distances_from_start.furthest_cells().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}


#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::cells::GridCoordinate;
    use crate::generators::{self, MazeGenerator};
    use crate::units::{ColumnsCount, RowsCount};

    fn small_grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid grid dimensions")
    }

    fn at(g: &Grid, row: usize, column: usize) -> CellIndex {
        g.cell_at(GridCoordinate::new(row, column)).expect("coordinate inside grid")
    }

    // 2x2 grid with all four links, a cycle with two equally short routes corner to corner.
    fn open_grid() -> Grid {
        let mut g = small_grid(2, 2);
        let (tl, tr, bl, br) = (at(&g, 0, 0), at(&g, 0, 1), at(&g, 1, 0), at(&g, 1, 1));
        g.link(tl, tr).expect("Link Failed");
        g.link(tl, bl).expect("Link Failed");
        g.link(tr, br).expect("Link Failed");
        g.link(bl, br).expect("Link Failed");
        g
    }

    fn is_valid_path(g: &Grid, path: &[CellIndex], start: CellIndex, end: CellIndex) -> bool {
        path.first() == Some(&start) &&
        path.last() == Some(&end) &&
        path.iter().tuple_windows().all(|(&a, &b)| g.is_linked(a, b)) &&
        path.iter().unique().count() == path.len()
    }

    #[test]
    fn distances_construction_requires_valid_start() {
        let g = small_grid(3, 3);
        let foreign = at(&small_grid(5, 5), 4, 4);
        assert!(Distances::dijkstra(&g, foreign).is_none());
    }

    #[test]
    fn start() {
        let g = small_grid(3, 3);
        let start = at(&g, 1, 1);
        let distances = Distances::dijkstra(&g, start).unwrap();
        assert_eq!(distances.start(), start);
        assert_eq!(distances.predecessor(start), None);
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = small_grid(3, 3);
        let start = at(&g, 0, 0);
        let distances = Distances::dijkstra(&g, start).unwrap();
        for cell in g.iter() {
            if cell != start {
                assert_eq!(distances.distance_to(cell), None);
                assert_eq!(distances.predecessor(cell), None);
            } else {
                assert_eq!(distances.distance_to(cell), Some(0));
            }
        }
        assert_eq!(distances.max(), 0);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_grid();
        let (tl, tr, bl, br) = (at(&g, 0, 0), at(&g, 0, 1), at(&g, 1, 0), at(&g, 1, 1));
        let distances = Distances::dijkstra(&g, tl).unwrap();

        assert_eq!(distances.distance_to(tl), Some(0));
        assert_eq!(distances.distance_to(tr), Some(1));
        assert_eq!(distances.distance_to(bl), Some(1));
        assert_eq!(distances.distance_to(br), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_cells(), &[br]);

        assert_eq!(distances.predecessor(tr), Some(tl));
        assert_eq!(distances.predecessor(bl), Some(tl));
        let br_predecessor = distances.predecessor(br).unwrap();
        assert!(br_predecessor == tr || br_predecessor == bl);
    }

    #[test]
    fn closest_linked_neighbour() {
        let g = open_grid();
        let (tl, tr, br) = (at(&g, 0, 0), at(&g, 0, 1), at(&g, 1, 1));
        let distances = Distances::dijkstra(&g, tl).unwrap();
        assert_eq!(g[tr].closest_linked(&distances), Some(tl));
        assert_eq!(g[tl].closest_linked(&distances), None);
        assert!(g[br].closest_linked(&distances).is_some());
    }

    #[test]
    fn both_solvers_on_open_grid() {
        let g = open_grid();
        let (tl, br) = (at(&g, 0, 0), at(&g, 1, 1));
        for solver in &PathSolver::ALL {
            let path = solver.solve(&g, tl, br).unwrap();
            assert_eq!(path.len(), 3, "{} path {:?}", solver, path);
            assert!(is_valid_path(&g, &path, tl, br));
        }
    }

    #[test]
    fn binary_tree_two_by_two_paths() {
        let mut g = small_grid(2, 2);
        generators::binary_tree(&mut g, &mut StepRng::new(0, 0));
        let (tl, bl, br) = (at(&g, 0, 0), at(&g, 1, 0), at(&g, 1, 1));

        for solver in &PathSolver::ALL {
            let path = solver.solve(&g, tl, br).unwrap();
            assert_eq!(path.len() - 1, 2);
            assert!(is_valid_path(&g, &path, tl, br));
            assert_eq!(path, vec![tl, bl, br]);
        }
    }

    #[test]
    fn disconnected_grid_has_no_path() {
        let g = small_grid(3, 3);
        for solver in &PathSolver::ALL {
            assert_eq!(solver.solve(&g, at(&g, 0, 0), at(&g, 2, 2)), None);
            assert_eq!(solver.solve(&g, at(&g, 0, 0), at(&g, 0, 1)), None);
        }
    }

    #[test]
    fn partially_connected_grid() {
        let mut g = small_grid(1, 4);
        g.link(at(&g, 0, 0), at(&g, 0, 1)).expect("Link Failed");
        g.link(at(&g, 0, 2), at(&g, 0, 3)).expect("Link Failed");
        for solver in &PathSolver::ALL {
            assert_eq!(solver.solve(&g, at(&g, 0, 0), at(&g, 0, 1)), Some(vec![at(&g, 0, 0), at(&g, 0, 1)]));
            assert_eq!(solver.solve(&g, at(&g, 0, 0), at(&g, 0, 3)), None);
        }
    }

    #[test]
    fn start_is_end() {
        let g = small_grid(2, 2);
        let c = at(&g, 1, 0);
        for solver in &PathSolver::ALL {
            assert_eq!(solver.solve(&g, c, c), Some(vec![c]));
        }
    }

    #[test]
    fn invalid_endpoints_have_no_path() {
        let g = open_grid();
        let foreign = at(&small_grid(5, 5), 4, 4);
        for solver in &PathSolver::ALL {
            assert_eq!(solver.solve(&g, at(&g, 0, 0), foreign), None);
            assert_eq!(solver.solve(&g, foreign, at(&g, 0, 0)), None);
        }
    }

    #[test]
    fn shortest_path_needs_matching_distances() {
        let g = open_grid();
        let distances = Distances::dijkstra(&small_grid(2, 2), at(&g, 0, 0)).unwrap();
        // Distances from an unlinked grid reach nothing but the start.
        assert_eq!(shortest_path(&g, &distances, at(&g, 1, 1)), None);
        assert_eq!(shortest_path(&g, &distances, at(&g, 0, 0)), Some(vec![at(&g, 0, 0)]));
    }

    #[test]
    fn longest_path_in_corridor() {
        let mut g = small_grid(1, 5);
        for column in 0..4 {
            let _ = g.link_direction(at(&g, 0, column), crate::cells::CompassPrimary::East);
        }
        let path = longest_path(&g).unwrap();
        assert_eq!(path.len(), 5);
        let ends = [path[0], path[4]].iter().cloned().sorted().collect_vec();
        assert_eq!(ends, vec![at(&g, 0, 0), at(&g, 0, 4)]);
    }

    #[test]
    fn longest_path_in_maze() {
        let mut g = small_grid(10, 10);
        MazeGenerator::Eller.generate(&mut g, &mut XorShiftRng::seed_from_u64(17));
        let path = longest_path(&g).unwrap();
        let (start, end) = (path[0], path[path.len() - 1]);
        assert!(is_valid_path(&g, &path, start, end));

        let from_start = Distances::dijkstra(&g, start).unwrap();
        assert_eq!(from_start.max(), path.len() - 1);
    }

    #[test]
    fn solver_names() {
        for solver in &PathSolver::ALL {
            assert_eq!(solver.name().parse::<PathSolver>().unwrap(), *solver);
        }
        assert_eq!("DFS".parse::<PathSolver>().unwrap(), PathSolver::DepthFirst);
        assert!("a-star".parse::<PathSolver>().is_err());
    }

    #[test]
    fn quickcheck_solvers_agree_on_perfect_mazes() {
        fn p(rows: u8, columns: u8, seed: u64, a: usize, b: usize) -> TestResult {
            let (rows, columns) = (rows as usize % 12 + 1, columns as usize % 12 + 1);
            for generator in &MazeGenerator::ALL {
                let mut g = small_grid(rows, columns);
                generator.generate(&mut g, &mut XorShiftRng::seed_from_u64(seed));

                let cells = g.iter().collect_vec();
                let (start, end) = (cells[a % cells.len()], cells[b % cells.len()]);

                let depth_first = depth_first_path(&g, start, end);
                let dijkstra = dijkstra_path(&g, start, end);
                let distance = Distances::dijkstra(&g, start).and_then(|d| d.distance_to(end));

                match (depth_first, dijkstra, distance) {
                    (Some(df), Some(dj), Some(d)) => {
                        if df != dj || dj.len() - 1 != d || !is_valid_path(&g, &dj, start, end) {
                            return TestResult::failed();
                        }
                    }
                    _ => return TestResult::failed(),
                }
            }
            TestResult::passed()
        }
        quickcheck(p as fn(u8, u8, u64, usize, usize) -> TestResult);
    }
}
