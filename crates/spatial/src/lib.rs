#![forbid(unsafe_code)]

pub mod grid;

pub use grid::SpatialGrid;

/// Default grid cell edge length in world units.
///
/// Timecube clouds place points on an integer lattice (one point per pixel
/// per frame), so a 2-unit cell holds on the order of eight points: small
/// enough that a 27-cell scan stays cheap, large enough that the immediate
/// neighborhood of any on-lattice query is never empty.
pub const DEFAULT_CELL_SIZE: f32 = 2.0;
