use nalgebra::Rotation3;
use timecube_core::Aabb;

/// Rigid transform (rotation then translation) applied to the slicing
/// plane: `world = R * local + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneTransform {
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl PlaneTransform {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    /// Rotation from per-axis angles in degrees, no translation.
    ///
    /// Angles are the GUI's [-180, 180] sliders mapped to radians. Axis
    /// order is X, then Y, then Z, matching the renderer the original tool
    /// drove.
    pub fn from_euler_deg(rx: f32, ry: f32, rz: f32) -> Self {
        let to_rad = std::f32::consts::PI / 180.0;
        let r = Rotation3::from_euler_angles(rx * to_rad, ry * to_rad, rz * to_rad);
        let m = r.matrix();
        Self {
            rotation: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            translation: [0.0, 0.0, 0.0],
        }
    }

    pub fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// `R * v`, ignoring translation. Used to push the plane along its own
    /// local z axis.
    pub fn rotate_vector(&self, v: [f32; 3]) -> [f32; 3] {
        let r = &self.rotation;
        [
            r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2],
            r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2],
            r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2],
        ]
    }

    /// Apply the full transform: `R * p + t`.
    pub fn apply_to_point(&self, p: &[f32; 3]) -> [f32; 3] {
        let rotated = self.rotate_vector(*p);
        [
            rotated[0] + self.translation[0],
            rotated[1] + self.translation[1],
            rotated[2] + self.translation[2],
        ]
    }

    /// Apply `self` first, then `other`.
    pub fn compose(&self, other: &PlaneTransform) -> PlaneTransform {
        let t = other.apply_to_point(&self.translation);
        let mut rotation = [[0.0f32; 3]; 3];
        for row in 0..3 {
            for col in 0..3 {
                rotation[row][col] = (0..3)
                    .map(|k| other.rotation[row][k] * self.rotation[k][col])
                    .sum();
            }
        }
        PlaneTransform { rotation, translation: t }
    }
}

/// The finite 2D sampling surface, in world space.
///
/// Width and height are derived from the loaded cloud's bounding box on
/// each load, so the plane always spans the cube it slices. The transform
/// is mutated interactively; the sampler reads it every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicingPlane {
    pub transform: PlaneTransform,
    pub width: f32,
    pub height: f32,
}

impl SlicingPlane {
    /// # Panics
    ///
    /// Panics if either extent is not finite and positive.
    pub fn new(width: f32, height: f32) -> Self {
        assert!(
            width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0,
            "plane extents must be > 0 and finite"
        );
        Self {
            transform: PlaneTransform::identity(),
            width,
            height,
        }
    }

    /// Plane sized to span `aabb`'s x/y extent and centered on it.
    ///
    /// Degenerate boxes (empty cloud, single point) fall back to a unit
    /// plane rather than a zero-size one.
    pub fn fitted_to(aabb: &Aabb) -> Self {
        let size = aabb.size();
        let width = if size[0] > 0.0 { size[0] } else { 1.0 };
        let height = if size[1] > 0.0 { size[1] } else { 1.0 };
        let mut plane = Self::new(width, height);
        plane.transform = PlaneTransform::identity().with_translation(aabb.center());
        plane
    }

    pub fn local_to_world(&self, local: [f32; 3]) -> [f32; 3] {
        self.transform.apply_to_point(&local)
    }

    /// Three corners in world space: (+w/2, +h/2), (-w/2, +h/2),
    /// (+w/2, -h/2). Two edge vectors and an origin are enough to
    /// reconstruct the plane; the fourth corner is redundant.
    pub fn corners(&self) -> [[f32; 3]; 3] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            self.local_to_world([hw, hh, 0.0]),
            self.local_to_world([-hw, hh, 0.0]),
            self.local_to_world([hw, -hh, 0.0]),
        ]
    }
}
