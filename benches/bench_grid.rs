use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use timecube_core::PointCloud;
use timecube_spatial::SpatialGrid;

fn random_cloud(n: usize, seed: u64) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let y: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let z: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    PointCloud::from_xyz(x, y, z)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    for size in [100_000, 1_000_000] {
        let cloud = random_cloud(size, 42);
        group.bench_with_input(BenchmarkId::new("timecube", size), &size, |b, _| {
            b.iter(|| SpatialGrid::build(&cloud, 2.0))
        });
    }
    group.finish();
}

fn bench_nearest_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_nearest_neighbor");
    for size in [100_000, 1_000_000] {
        let cloud = random_cloud(size, 42);
        let grid = SpatialGrid::build(&cloud, 2.0);
        let query = [50.0f32, 50.0, 50.0];
        group.bench_with_input(BenchmarkId::new("timecube", size), &size, |b, _| {
            b.iter(|| grid.nearest_in_cell_range(query))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_nearest_neighbor);
criterion_main!(benches);
