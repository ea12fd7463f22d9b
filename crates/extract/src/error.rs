use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors from the video extraction pipeline.
///
/// All of these abort the pipeline and propagate to the caller; scratch
/// frame files are cleaned up on the way out regardless.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to probe video metadata: {0}")]
    Probe(String),

    #[error("no video stream found in {path}")]
    MissingVideoStream { path: PathBuf },

    #[error("{tool} exited with {status}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("no frames were extracted from {path}")]
    NoFrames { path: PathBuf },

    #[error("failed to decode frame image {path}: {source}")]
    FrameDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
