use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use timecube_core::PointCloud;
use timecube_sort::{cell_depth_sort, depth_sort};

fn random_cloud(n: usize, seed: u64) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let y: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let z: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    PointCloud::from_xyz(x, y, z)
}

fn bench_depth_sorters(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_sort");
    group.sample_size(20);
    let viewpoint = [150.0f32, 150.0, 150.0];

    for size in [100_000, 500_000] {
        let cloud = random_cloud(size, 42);
        group.bench_with_input(BenchmarkId::new("exact", size), &size, |b, _| {
            b.iter(|| depth_sort(&cloud, viewpoint))
        });
        group.bench_with_input(BenchmarkId::new("cell_bucket", size), &size, |b, _| {
            b.iter(|| cell_depth_sort(&cloud, viewpoint, 10.0))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_depth_sorters);
criterion_main!(benches);
