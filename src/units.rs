#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct RowsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct ColumnsCount(pub usize);

/// Number of cells (graph vertices) in a grid.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
/// Number of links (undirected graph edges) a grid can hold.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);
