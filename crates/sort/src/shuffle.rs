use rand::seq::SliceRandom;
use rand::Rng;
use timecube_core::PointCloud;

/// Uniformly permute point order.
///
/// Used to visually average out ordering artifacts when comparing the depth
/// sorters, not for rendering correctness. Pass a seeded `StdRng` for a
/// reproducible permutation.
pub fn shuffle(cloud: &PointCloud, rng: &mut impl Rng) -> PointCloud {
    if cloud.is_empty() {
        return cloud.clone();
    }

    let mut order: Vec<usize> = (0..cloud.len()).collect();
    order.shuffle(rng);
    cloud.select(&order)
}
