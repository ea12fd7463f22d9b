use timecube_core::{Colors, PointCloud};

/// Recolor points by their existing index order, red fading to blue.
///
/// Does not reorder anything: this visualizes the order the other sorters
/// produced. Render the result and the gradient shows which points draw
/// first (red) and last (blue).
pub fn color_by_order(cloud: &PointCloud) -> PointCloud {
    let n = cloud.len();
    if n == 0 {
        return cloud.clone();
    }

    let mut r = Vec::with_capacity(n);
    let mut g = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);

    for i in 0..n {
        let t = if n > 1 {
            i as f32 / (n - 1) as f32
        } else {
            0.0
        };
        r.push(((1.0 - t) * 255.0).round() as u8);
        g.push(0);
        b.push((t * 255.0).round() as u8);
    }

    let mut out = cloud.clone();
    out.colors = Some(Colors { r, g, b });
    out
}

#[cfg(test)]
mod tests {
    use super::color_by_order;
    use timecube_core::PointCloud;

    #[test]
    fn gradient_runs_red_to_blue() {
        let cloud = PointCloud::from_xyz(
            (0..10).map(|i| i as f32).collect(),
            vec![0.0; 10],
            vec![0.0; 10],
        );
        let colored = color_by_order(&cloud);
        let colors = colored.colors.as_ref().unwrap();

        assert_eq!((colors.r[0], colors.g[0], colors.b[0]), (255, 0, 0));
        assert_eq!((colors.r[9], colors.g[9], colors.b[9]), (0, 0, 255));
        // Monotone along the index axis.
        for i in 1..10 {
            assert!(colors.r[i] <= colors.r[i - 1]);
            assert!(colors.b[i] >= colors.b[i - 1]);
        }
    }

    #[test]
    fn positions_are_untouched() {
        let cloud = PointCloud::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        let colored = color_by_order(&cloud);
        assert_eq!(colored.x, cloud.x);
        assert_eq!(colored.y, cloud.y);
        assert_eq!(colored.z, cloud.z);
    }

    #[test]
    fn single_point_is_red() {
        let cloud = PointCloud::from_xyz(vec![0.0], vec![0.0], vec![0.0]);
        let colored = color_by_order(&cloud);
        let colors = colored.colors.as_ref().unwrap();
        assert_eq!((colors.r[0], colors.b[0]), (255, 0));
    }

    #[test]
    fn empty_cloud_is_noop() {
        assert!(color_by_order(&PointCloud::new()).is_empty());
    }
}
