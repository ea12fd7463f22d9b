use crate::buffer::DisplayBuffer;
use crate::plane::SlicingPlane;
use timecube_core::PointCloud;
use timecube_spatial::SpatialGrid;

/// Resample the slicing plane against the cloud at `width x height`.
///
/// For each output pixel, the pixel's position in the plane's local frame
/// is computed (x left to right, y flipped so image row 0 is the plane's
/// top edge), pushed through the plane transform into world space, and
/// resolved to the nearest cloud point within one grid cell. Hits record
/// the point's color; misses stay blank.
///
/// Pure function of its inputs: an unchanged plane and grid produce a
/// bit-identical buffer, which is what lets the session reuse buffers
/// between frames.
///
/// # Panics
///
/// Panics if `width` or `height` is zero (via [`DisplayBuffer::new`]).
pub fn sample(
    plane: &SlicingPlane,
    cloud: &PointCloud,
    grid: &SpatialGrid,
    width: usize,
    height: usize,
) -> DisplayBuffer {
    let mut buffer = DisplayBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let local = [
                x as f32 / width as f32 * plane.width - plane.width / 2.0,
                (height - y) as f32 / height as f32 * plane.height - plane.height / 2.0,
                0.0,
            ];
            let world = plane.local_to_world(local);

            if let Some(i) = grid.nearest_in_cell_range(world) {
                buffer.set(x, y, Some(cloud.color_f32(i)));
            }
        }
    }

    buffer
}
