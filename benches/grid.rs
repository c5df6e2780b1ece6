use criterion::{criterion_group, criterion_main, Criterion};
use mazes::cells::GridCoordinate;
use mazes::grid::Grid;
use mazes::units::{ColumnsCount, RowsCount};


fn bench_grid_11(c: &mut Criterion) {
    c.bench_function("grid_11", |b| b.iter(|| Grid::new(RowsCount(11), ColumnsCount(11)).unwrap()));
}

fn bench_grid_128(c: &mut Criterion) {
    c.bench_function("grid_128", |b| b.iter(|| Grid::new(RowsCount(128), ColumnsCount(128)).unwrap()));
}

fn bench_grid_500(c: &mut Criterion) {
    c.bench_function("grid_500", |b| b.iter(|| Grid::new(RowsCount(500), ColumnsCount(500)).unwrap()));
}

fn bench_neighbours_corner_of_grid(c: &mut Criterion) {
    let g = Grid::new(RowsCount(11), ColumnsCount(11)).unwrap();
    let corner = g.cell_at(GridCoordinate::new(0, 0)).unwrap();
    c.bench_function("neighbours_corner", move |b| b.iter(|| g.neighbours(corner)));
}

fn bench_neighbours_middle_of_grid(c: &mut Criterion) {
    let g = Grid::new(RowsCount(11), ColumnsCount(11)).unwrap();
    let mid = g.cell_at(GridCoordinate::new(5, 5)).unwrap();
    c.bench_function("neighbours_middle", move |b| b.iter(|| g.neighbours(mid)));
}

criterion_group!(benches,
    bench_grid_11,
    bench_grid_128,
    bench_grid_500,
    bench_neighbours_corner_of_grid,
    bench_neighbours_middle_of_grid
);
criterion_main!(benches);
