use crate::buffer::DisplayBuffer;
use crate::export::plane_corners_normalized;
use crate::options::RenderOptions;
use crate::plane::{PlaneTransform, SlicingPlane};
use crate::resolution::{ResolutionController, SampleDecision};
use crate::sampler::sample;
use timecube_core::{Aabb, PointCloud};
use timecube_spatial::{SpatialGrid, DEFAULT_CELL_SIZE};
use tracing::debug;

/// Ticket for an in-flight cloud load.
///
/// Loads are asynchronous at the application shell level (file dialogs,
/// video extraction); when the user starts a new load before the previous
/// one finishes, the stale completion must be discarded instead of
/// clobbering the newer cloud. Tokens are monotonically increasing; only
/// the most recently issued one is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// One interactive slicing session.
///
/// Owns the point cloud, its spatial grid, the slicing plane, the
/// resolution controller and the current display buffer, so no component
/// state lives in globals. The cloud/grid pair is only ever swapped in
/// atomically: the grid for a new cloud is fully built before either is
/// published, so a frame never samples against a half-built index.
pub struct TimecubeSession {
    cloud: PointCloud,
    grid: SpatialGrid,
    aabb: Aabb,
    plane: SlicingPlane,
    controller: ResolutionController,
    buffer: DisplayBuffer,
    options: RenderOptions,
    cell_size: f32,
    // GUI-facing plane controls; the transform is derived from these.
    rotation_deg: [f32; 3],
    plane_offset: f32,
    load_generation: u64,
}

/// Range of the plane position slider, world units along the plane's
/// local z axis.
pub const PLANE_OFFSET_RANGE: (f32, f32) = (-100.0, 100.0);
/// Range of each plane rotation slider, degrees.
pub const PLANE_ROTATION_RANGE_DEG: (f32, f32) = (-180.0, 180.0);

impl TimecubeSession {
    /// Session with an empty cloud, displaying at `full_width x
    /// full_height` when idle.
    pub fn new(full_width: usize, full_height: usize) -> Self {
        Self::with_cell_size(full_width, full_height, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(full_width: usize, full_height: usize, cell_size: f32) -> Self {
        let cloud = PointCloud::new();
        let grid = SpatialGrid::build(&cloud, cell_size);
        let aabb = cloud.aabb();
        let plane = SlicingPlane::fitted_to(&aabb);
        let buffer = DisplayBuffer::new(full_width, full_height);
        Self {
            cloud,
            grid,
            aabb,
            plane,
            controller: ResolutionController::new(full_width, full_height),
            buffer,
            options: RenderOptions::default(),
            cell_size,
            rotation_deg: [0.0; 3],
            plane_offset: 0.0,
            load_generation: 0,
        }
    }

    /// Start a load; the returned token must be passed to
    /// [`finish_load`](Self::finish_load). Starting another load
    /// invalidates all earlier tokens.
    pub fn begin_load(&mut self) -> LoadToken {
        self.load_generation += 1;
        LoadToken(self.load_generation)
    }

    /// Publish a loaded cloud, unless a newer load has started since
    /// `token` was issued, in which case the cloud is dropped and `false`
    /// is returned.
    pub fn finish_load(&mut self, token: LoadToken, cloud: PointCloud) -> bool {
        if token.0 != self.load_generation {
            debug!(
                stale = token.0,
                current = self.load_generation,
                "discarding stale cloud load"
            );
            return false;
        }

        // Index first, publish second.
        let grid = SpatialGrid::build(&cloud, self.cell_size);
        let aabb = cloud.aabb();

        debug!(
            points = cloud.len(),
            cells = grid.cell_count(),
            "published new point cloud"
        );

        self.cloud = cloud;
        self.grid = grid;
        self.plane = SlicingPlane::fitted_to(&aabb);
        self.aabb = aabb;
        self.rebuild_plane_transform();
        // Matches the original tool: a fresh load runs through the moving
        // state so the first visible image appears quickly, then settles
        // to full resolution.
        self.controller.notify_change();
        true
    }

    /// Synchronous load for callers with the cloud already in hand.
    pub fn load_cloud(&mut self, cloud: PointCloud) {
        let token = self.begin_load();
        let accepted = self.finish_load(token, cloud);
        debug_assert!(accepted);
    }

    /// Replace the cloud with a reordering of itself (depth sort, shuffle,
    /// diagnostic recolor) and rebuild the grid, since point indices
    /// shift. The swap is atomic with respect to [`frame`](Self::frame).
    pub fn apply_reorder(&mut self, reorder: impl FnOnce(&PointCloud) -> PointCloud) {
        let cloud = reorder(&self.cloud);
        assert_eq!(
            cloud.len(),
            self.cloud.len(),
            "reorder must preserve point count"
        );
        self.grid = SpatialGrid::build(&cloud, self.cell_size);
        self.aabb = cloud.aabb();
        self.cloud = cloud;
        self.controller.force_refresh();
    }

    fn rebuild_plane_transform(&mut self) {
        let rot = PlaneTransform::from_euler_deg(
            self.rotation_deg[0],
            self.rotation_deg[1],
            self.rotation_deg[2],
        );
        // The offset slider moves the plane along its own local z axis,
        // rotating around the cloud center.
        let center = self.aabb.center();
        let offset = rot.rotate_vector([0.0, 0.0, self.plane_offset]);
        self.plane.transform = rot.with_translation([
            center[0] + offset[0],
            center[1] + offset[1],
            center[2] + offset[2],
        ]);
    }

    /// Move the plane along its local z axis. Clamped to
    /// [`PLANE_OFFSET_RANGE`].
    pub fn set_plane_offset(&mut self, offset: f32) {
        let clamped = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(PLANE_OFFSET_RANGE.0, PLANE_OFFSET_RANGE.1)
        };
        if clamped != self.plane_offset {
            self.plane_offset = clamped;
            self.rebuild_plane_transform();
            self.controller.notify_change();
        }
    }

    /// Set plane rotation from the GUI's per-axis degree sliders. Each
    /// component is clamped to [`PLANE_ROTATION_RANGE_DEG`].
    pub fn set_plane_rotation_deg(&mut self, rx: f32, ry: f32, rz: f32) {
        let clamp = |v: f32| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(PLANE_ROTATION_RANGE_DEG.0, PLANE_ROTATION_RANGE_DEG.1)
            }
        };
        let next = [clamp(rx), clamp(ry), clamp(rz)];
        if next != self.rotation_deg {
            self.rotation_deg = next;
            self.rebuild_plane_transform();
            self.controller.notify_change();
        }
    }

    /// Run one animation-loop tick: resample if the controller says so,
    /// otherwise hand back the cached buffer.
    pub fn frame(&mut self) -> &DisplayBuffer {
        match self.controller.decision() {
            SampleDecision::Resample { width, height } => {
                debug!(width, height, "resampling cross-section");
                self.buffer = sample(&self.plane, &self.cloud, &self.grid, width, height);
            }
            SampleDecision::Reuse => {}
        }
        &self.buffer
    }

    /// Current plane corners in the export collaborator's normalized
    /// [0, 100] space.
    pub fn export_corners(&self) -> [[f32; 3]; 3] {
        plane_corners_normalized(&self.plane, &self.aabb)
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn plane(&self) -> &SlicingPlane {
        &self.plane
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }
}
