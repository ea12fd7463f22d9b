#![forbid(unsafe_code)]

//! Slice videos as 3D timecubes.
//!
//! A timecube stacks a video's frames along a depth axis so that time
//! becomes a spatial dimension; an interactively positioned plane then
//! reconstructs arbitrary cross-sections (spatial frames, temporal slices,
//! oblique cuts) as 2D images. The workspace splits into:
//!
//! - [`core`]: point cloud and bounding box types
//! - [`spatial`]: uniform spatial hash grid and nearest-neighbor queries
//! - [`io`]: PLY reading and writing
//! - [`slice`]: the slicing plane, sampler, resolution controller and
//!   session
//! - [`sort`]: depth-ordering strategies for transparency rendering
//! - [`extract`]: video to point cloud conversion via ffmpeg

pub use timecube_core as core;
pub use timecube_extract as extract;
pub use timecube_io as io;
pub use timecube_slice as slice;
pub use timecube_sort as sort;
pub use timecube_spatial as spatial;
