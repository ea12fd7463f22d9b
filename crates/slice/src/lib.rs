#![forbid(unsafe_code)]

//! Interactive slicing of a timecube point cloud.
//!
//! A movable, rotatable plane is resampled against the cloud's spatial grid
//! every frame: each pixel of the output grid maps through the plane's
//! rigid transform into world space, asks the grid for the nearest point,
//! and takes its color. The [`session::TimecubeSession`] owns the pieces
//! and runs the per-frame loop; everything below it is a pure function over
//! explicit inputs.

pub mod buffer;
pub mod export;
pub mod options;
pub mod plane;
pub mod resolution;
pub mod sampler;
pub mod session;

pub use buffer::DisplayBuffer;
pub use export::plane_corners_normalized;
pub use options::{RenderOptions, TransparencyMode};
pub use plane::{PlaneTransform, SlicingPlane};
pub use resolution::{ResolutionController, SampleDecision};
pub use sampler::sample;
pub use session::{LoadToken, TimecubeSession};
