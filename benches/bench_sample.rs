use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use timecube_core::PointCloud;
use timecube_slice::{sample, PlaneTransform, SlicingPlane};
use timecube_spatial::SpatialGrid;

/// Dense synthetic timecube: side x side pixels, side frames.
fn synthetic_cube(side: usize) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(side * side * side);
    for z in 0..side {
        for y in 0..side {
            for x in 0..side {
                cloud.push_colored(
                    [x as f32, y as f32, z as f32],
                    [(x * 7) as u8, (y * 5) as u8, (z * 3) as u8],
                );
            }
        }
    }
    cloud
}

fn bench_sample_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_sample");
    group.sample_size(20);

    for side in [50, 100] {
        let cloud = synthetic_cube(side);
        let grid = SpatialGrid::build(&cloud, 2.0);
        let extent = side as f32;
        let mut plane = SlicingPlane::new(extent, extent);
        plane.transform = PlaneTransform::from_euler_deg(30.0, 20.0, 0.0).with_translation([
            extent / 2.0,
            extent / 2.0,
            extent / 2.0,
        ]);

        // Full-resolution pass at the display's native size.
        group.bench_with_input(BenchmarkId::new("full_res_100x100", side), &side, |b, _| {
            b.iter(|| sample(&plane, &cloud, &grid, 100, 100))
        });
        // The low-res pass used while the plane is being dragged.
        group.bench_with_input(BenchmarkId::new("half_res_50x50", side), &side, |b, _| {
            b.iter(|| sample(&plane, &cloud, &grid, 50, 50))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample_pass);
criterion_main!(benches);
