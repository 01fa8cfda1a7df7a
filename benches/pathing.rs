use criterion::{black_box, criterion_group, criterion_main, Criterion};

use trigger_tactics::hex::{
    adjacent_cells, find_path, trigger_coverage, Azimuth, GridConfig, Position,
};

fn bench_pathing(c: &mut Criterion) {
    let grid = GridConfig::default();
    let mut group = c.benchmark_group("hex/pathing");

    group.bench_function("find_path_corner_to_corner", |b| {
        b.iter(|| {
            let path = find_path(
                black_box(Position::new(0, 0)),
                black_box(Position::new(35, 35)),
                &grid,
            );
            black_box(path.len());
        })
    });

    group.bench_function("adjacent_cells_radius_4", |b| {
        b.iter(|| {
            let cells = adjacent_cells(black_box(Position::new(18, 18)), 4, &grid);
            black_box(cells.len());
        })
    });

    group.bench_function("trigger_coverage_asteroid", |b| {
        b.iter(|| {
            let cells = trigger_coverage(
                black_box(Position::new(18, 18)),
                Azimuth::new(45.0),
                360.0,
                6,
                &grid,
            );
            black_box(cells.len());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_pathing);
criterion_main!(benches);
