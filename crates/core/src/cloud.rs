use crate::Aabb;

/// A point cloud stored as parallel arrays.
///
/// Positions are split into per-axis `Vec<f32>` columns; colors and normals
/// are optional parallel channels. For a timecube, `z` is the time axis:
/// every video frame contributes one plane of points at `z = frame index`.
///
/// Clouds are immutable once loaded. Reordering operations (depth sort,
/// shuffle) build a new cloud via [`select`](PointCloud::select) and swap it
/// in wholesale rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub normals: Option<Normals>,
    pub colors: Option<Colors>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normals {
    pub nx: Vec<f32>,
    pub ny: Vec<f32>,
    pub nz: Vec<f32>,
}

/// Per-point RGB, one byte per channel as stored in PLY files.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub r: Vec<u8>,
    pub g: Vec<u8>,
    pub b: Vec<u8>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self {
            x,
            y,
            z,
            normals: None,
            colors: None,
        }
    }

    /// Pre-allocate a cloud that will receive `n` points via
    /// [`push_colored`](PointCloud::push_colored).
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
            normals: None,
            colors: Some(Colors {
                r: Vec::with_capacity(n),
                g: Vec::with_capacity(n),
                b: Vec::with_capacity(n),
            }),
        }
    }

    /// Append one colored point. Used by the video extractor, which
    /// accumulates points frame by frame in raster order.
    ///
    /// # Panics
    ///
    /// Panics if the cloud was built without a color channel.
    pub fn push_colored(&mut self, position: [f32; 3], color: [u8; 3]) {
        self.x.push(position[0]);
        self.y.push(position[1]);
        self.z.push(position[2]);

        let colors = self
            .colors
            .as_mut()
            .expect("push_colored requires a color channel");
        colors.r.push(color[0]);
        colors.g.push(color[1]);
        colors.b.push(color[2]);
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_xyz(&self.x, &self.y, &self.z)
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    /// Color of point `i` as floats in [0, 1].
    ///
    /// Clouds without a color channel report white, so a colorless cloud
    /// still produces a visible cross-section.
    pub fn color_f32(&self, i: usize) -> [f32; 3] {
        match &self.colors {
            Some(c) => [
                c.r[i] as f32 / 255.0,
                c.g[i] as f32 / 255.0,
                c.b[i] as f32 / 255.0,
            ],
            None => [1.0, 1.0, 1.0],
        }
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Build a new cloud containing the points at `indices`, in that order.
    ///
    /// Positions, colors and normals are permuted together, so indices in
    /// the output stay consistent across channels. This is the primitive
    /// the depth sorter and shuffler are built on: they compute an index
    /// permutation and `select` it.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut x = Vec::with_capacity(indices.len());
        let mut y = Vec::with_capacity(indices.len());
        let mut z = Vec::with_capacity(indices.len());

        for &idx in indices {
            assert!(idx < self.len(), "index out of bounds in select");
            x.push(self.x[idx]);
            y.push(self.y[idx]);
            z.push(self.z[idx]);
        }

        let normals = self.normals.as_ref().map(|n| Normals {
            nx: indices.iter().map(|&idx| n.nx[idx]).collect(),
            ny: indices.iter().map(|&idx| n.ny[idx]).collect(),
            nz: indices.iter().map(|&idx| n.nz[idx]).collect(),
        });

        let colors = self.colors.as_ref().map(|c| Colors {
            r: indices.iter().map(|&idx| c.r[idx]).collect(),
            g: indices.iter().map(|&idx| c.g[idx]).collect(),
            b: indices.iter().map(|&idx| c.b[idx]).collect(),
        });

        Self {
            x,
            y,
            z,
            normals,
            colors,
        }
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::PointCloud;
    use proptest::prelude::*;

    #[test]
    fn new_is_empty() {
        let cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert_eq!(cloud.len(), 0);
    }

    #[test]
    fn from_xyz_builds_cloud() {
        let cloud = PointCloud::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.point(0), [1.0, 3.0, 5.0]);
        assert_eq!(cloud.point(1), [2.0, 4.0, 6.0]);
    }

    #[test]
    fn push_colored_appends_in_order() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push_colored([0.0, 0.0, 0.0], [255, 0, 0]);
        cloud.push_colored([1.0, 0.0, 1.0], [0, 255, 0]);
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.point(1), [1.0, 0.0, 1.0]);
        let colors = cloud.colors.as_ref().unwrap();
        assert_eq!(colors.r, vec![255, 0]);
        assert_eq!(colors.g, vec![0, 255]);
    }

    #[test]
    fn color_f32_normalizes_bytes() {
        let mut cloud = PointCloud::with_capacity(1);
        cloud.push_colored([0.0; 3], [255, 0, 51]);
        let c = cloud.color_f32(0);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.2).abs() < 1e-3);
    }

    #[test]
    fn color_f32_without_channel_is_white() {
        let cloud = PointCloud::from_xyz(vec![0.0], vec![0.0], vec![0.0]);
        assert_eq!(cloud.color_f32(0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn select_subsets_points() {
        let cloud = PointCloud::from_xyz(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![10.0, 11.0, 12.0, 13.0],
            vec![20.0, 21.0, 22.0, 23.0],
        );
        let selected = cloud.select(&[3, 1]);
        assert_eq!(selected.x, vec![3.0, 1.0]);
        assert_eq!(selected.y, vec![13.0, 11.0]);
        assert_eq!(selected.z, vec![23.0, 21.0]);
    }

    #[test]
    fn select_permutes_colors_with_positions() {
        let mut cloud = PointCloud::with_capacity(3);
        cloud.push_colored([0.0, 0.0, 0.0], [10, 10, 10]);
        cloud.push_colored([1.0, 0.0, 0.0], [20, 20, 20]);
        cloud.push_colored([2.0, 0.0, 0.0], [30, 30, 30]);

        let reordered = cloud.select(&[2, 0, 1]);
        assert_eq!(reordered.x, vec![2.0, 0.0, 1.0]);
        let colors = reordered.colors.as_ref().unwrap();
        assert_eq!(colors.r, vec![30, 10, 20]);
    }

    #[test]
    fn iter_points_yields_xyz_tuples() {
        let cloud = PointCloud::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        let pts: Vec<[f32; 3]> = cloud.iter_points().collect();
        assert_eq!(pts, vec![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
    }

    #[test]
    fn aabb_contains_all_points() {
        let cloud = PointCloud::from_xyz(vec![-1.0, 2.0], vec![3.0, -4.0], vec![5.0, 6.0]);
        let aabb = cloud.aabb();
        for p in cloud.iter_points() {
            assert!(aabb.contains(&p));
        }
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn from_xyz_rejects_mismatched_lengths() {
        let _ = PointCloud::from_xyz(vec![1.0], vec![1.0, 2.0], vec![1.0]);
    }

    proptest! {
        #[test]
        fn select_identity_preserves_cloud(
            pts in prop::collection::vec((-1000.0f32..1000.0f32, -1000.0f32..1000.0f32, -1000.0f32..1000.0f32), 1..200)
        ) {
            let x: Vec<f32> = pts.iter().map(|p| p.0).collect();
            let y: Vec<f32> = pts.iter().map(|p| p.1).collect();
            let z: Vec<f32> = pts.iter().map(|p| p.2).collect();
            let cloud = PointCloud::from_xyz(x, y, z);
            let identity: Vec<usize> = (0..cloud.len()).collect();
            prop_assert_eq!(cloud.select(&identity), cloud);
        }

        #[test]
        fn aabb_contains_all_finite_points(
            pts in prop::collection::vec((-1000.0f32..1000.0f32, -1000.0f32..1000.0f32, -1000.0f32..1000.0f32), 1..200)
        ) {
            let x: Vec<f32> = pts.iter().map(|p| p.0).collect();
            let y: Vec<f32> = pts.iter().map(|p| p.1).collect();
            let z: Vec<f32> = pts.iter().map(|p| p.2).collect();
            let cloud = PointCloud::from_xyz(x, y, z);
            let aabb = cloud.aabb();
            for p in cloud.iter_points() {
                prop_assert!(aabb.contains(&p));
            }
        }
    }
}
