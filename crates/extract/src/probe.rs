use crate::error::{ExtractError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::warn;

/// Assumed frame rate when the container reports none, a zero rate, or
/// garbage. Ordinary cinema footage; close enough for deriving a sampling
/// rate.
pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// Metadata the pipeline needs from a video file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    /// Duration in seconds. Zero when the container reports none.
    pub duration_secs: f64,
    /// Average frame rate, with [`DEFAULT_FRAME_RATE`] substituted for
    /// degenerate values.
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    avg_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Parse ffprobe's `avg_frame_rate` rational ("30000/1001", "25/1", or
/// occasionally "0/0" for containers that don't know).
fn parse_frame_rate(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return DEFAULT_FRAME_RATE;
    };

    let value = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().unwrap_or(f64::NAN);
            let den: f64 = den.trim().parse().unwrap_or(f64::NAN);
            num / den
        }
        None => raw.trim().parse().unwrap_or(f64::NAN),
    };

    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(raw, "degenerate frame rate, assuming default");
        DEFAULT_FRAME_RATE
    }
}

fn parse_duration(stream: &ProbeStream, format: Option<&ProbeFormat>) -> f64 {
    let from_stream = stream
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok());
    let from_format = format
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok());

    match from_stream.or(from_format) {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => 0.0,
    }
}

fn parse_probe_output(json: &str, path: &Path) -> Result<VideoMetadata> {
    let parsed: ProbeOutput =
        serde_json::from_str(json).map_err(|e| ExtractError::Probe(e.to_string()))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ExtractError::MissingVideoStream {
            path: path.to_path_buf(),
        })?;

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoMetadata {
        duration_secs: parse_duration(video, parsed.format.as_ref()),
        frame_rate: parse_frame_rate(video.avg_frame_rate.as_deref()),
        width: video.width.unwrap_or(0),
        height: video.height.unwrap_or(0),
        has_audio,
    })
}

/// Probe a video file with `ffprobe`.
///
/// Requires the `ffprobe` binary on `PATH`; it is the same external
/// transcoding collaborator the rest of the pipeline leans on.
pub fn probe_video(path: impl AsRef<Path>) -> Result<VideoMetadata> {
    let path = path.as_ref();
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(ExtractError::CommandFailed {
            tool: "ffprobe",
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let json = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&json, path)
}
