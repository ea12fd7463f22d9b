use timecube_core::PointCloud;
use timecube_spatial::SpatialGrid;

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Reorder a cloud back-to-front relative to `viewpoint`.
///
/// Exact variant: every point's squared distance to the viewpoint is
/// computed and the whole cloud is comparison-sorted descending, so the
/// farthest point comes first. Alpha blending composites correctly over
/// this order. O(N log N) and the most expensive of the strategies; for a
/// million-point cube prefer [`cell_depth_sort`] during interaction.
///
/// An empty cloud is returned unchanged.
pub fn depth_sort(cloud: &PointCloud, viewpoint: [f32; 3]) -> PointCloud {
    if cloud.is_empty() {
        return cloud.clone();
    }

    let dist_sq: Vec<f32> = cloud
        .iter_points()
        .map(|p| squared_distance(p, viewpoint))
        .collect();

    let mut order: Vec<usize> = (0..cloud.len()).collect();
    order.sort_unstable_by(|&a, &b| dist_sq[b].total_cmp(&dist_sq[a]));

    cloud.select(&order)
}

/// Approximate back-to-front reorder: sort cells, not points.
///
/// Builds a spatial grid over the cloud, takes each occupied cell's first
/// point as its representative, sorts cells descending by the
/// representative's distance to `viewpoint`, and emits each cell's points
/// as one contiguous block in their original intra-cell order. Inter-cell
/// order is exact to within a cell diagonal; intra-cell order is arbitrary.
/// Trades that error for sorting `cells` elements instead of `points`.
///
/// Cell order ties break on the integer cell key, so the output is
/// deterministic for a given cloud and viewpoint. Points with non-finite
/// positions are not indexed by the grid; they are appended at the end in
/// index order so the result is still a permutation of the input.
pub fn cell_depth_sort(cloud: &PointCloud, viewpoint: [f32; 3], cell_size: f32) -> PointCloud {
    if cloud.is_empty() {
        return cloud.clone();
    }

    let grid = SpatialGrid::build(cloud, cell_size);

    let mut cells: Vec<(f32, (i32, i32, i32), Vec<usize>)> = grid
        .iter_cells()
        .map(|cell| {
            (
                squared_distance(cell.representative(), viewpoint),
                cell.key(),
                cell.indices().collect(),
            )
        })
        .collect();

    cells.sort_unstable_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let mut order: Vec<usize> = Vec::with_capacity(cloud.len());
    for (_, _, indices) in cells {
        order.extend(indices);
    }

    if order.len() < cloud.len() {
        let mut seen = vec![false; cloud.len()];
        for &i in &order {
            seen[i] = true;
        }
        order.extend((0..cloud.len()).filter(|&i| !seen[i]));
    }

    cloud.select(&order)
}
