#![forbid(unsafe_code)]

//! Turn a video into a timecube point cloud file.
//!
//! Transcoding is delegated to the external `ffmpeg`/`ffprobe` binaries;
//! this crate drives them, decodes the dumped frame images, maps every
//! pixel to a point at `(column, flipped row, frame index)`, and
//! serializes the accumulated cloud to a PLY file next to the source
//! video. Frame dumps live in a scratch directory that is removed even
//! when the pipeline fails partway.

pub mod convert;
pub mod error;
pub mod probe;
pub mod resize;
pub mod scratch;

pub use convert::{extract_to_ply, frame_to_points, ExtractOptions};
pub use error::{ExtractError, Result};
pub use probe::{probe_video, VideoMetadata, DEFAULT_FRAME_RATE};
pub use resize::{resize_video, ResizeOptions};
pub use scratch::ScratchDir;
