use crate::plane::SlicingPlane;
use timecube_core::Aabb;

/// Plane corners for the high-resolution export collaborator.
///
/// The external frame-extraction script wants the previewed cross-section
/// described as three corner points in the cloud's own normalized space:
/// each world-space corner is mapped into bounding-box-relative [0, 1],
/// every axis is flipped (`1 - v`, correcting for the renderer's cube
/// orientation), then scaled to [0, 100]. Corner order is
/// (+w/2, +h/2), (-w/2, +h/2), (+w/2, -h/2), matching
/// [`SlicingPlane::corners`].
///
/// Degenerate box axes (flat clouds) normalize to the axis midpoint rather
/// than dividing by zero.
pub fn plane_corners_normalized(plane: &SlicingPlane, aabb: &Aabb) -> [[f32; 3]; 3] {
    let size = aabb.size();
    plane.corners().map(|corner| {
        let mut out = [0.0f32; 3];
        for axis in 0..3 {
            let normalized = if size[axis] > 0.0 {
                (corner[axis] - aabb.min[axis]) / size[axis]
            } else {
                0.5
            };
            out[axis] = (1.0 - normalized) * 100.0;
        }
        out
    })
}
