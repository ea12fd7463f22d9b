use crate::error::{ExtractError, Result};
use crate::probe::{probe_video, DEFAULT_FRAME_RATE};
use crate::scratch::ScratchDir;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use timecube_core::PointCloud;
use timecube_io::write_ply;
use tracing::{debug, info};

/// Tunables for [`extract_to_ply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// How many frames to spread across the video's duration. Also the
    /// depth of the resulting cube along the time axis.
    pub target_frames: usize,
    /// Width the frames are scaled to before sampling; height follows the
    /// aspect ratio. Every pixel becomes a point, so 100 x ~100 x 100
    /// frames is already a million points.
    pub frame_width: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_frames: 100,
            frame_width: 100,
        }
    }
}

/// Map one decoded frame into cube points, appending to `cloud`.
///
/// Axis convention (fixed; the slicer and exporter assume it):
/// cube x = pixel column, cube y = `height - 1 - row` so the image's top
/// edge gets the largest y (image rows grow downward, the cube's y axis
/// grows upward), cube z = frame index. Pixels are visited in raster
/// order, so output point order is deterministic: ascending frame, then
/// row, then column.
pub fn frame_to_points(image: &RgbImage, frame_index: usize, cloud: &mut PointCloud) {
    let (width, height) = image.dimensions();
    for row in 0..height {
        for col in 0..width {
            let pixel = image.get_pixel(col, row).0;
            cloud.push_colored(
                [
                    col as f32,
                    (height - 1 - row) as f32,
                    frame_index as f32,
                ],
                pixel,
            );
        }
    }
}

/// Decode the dumped frames in order and accumulate the cube.
fn frames_to_cloud(paths: &[PathBuf]) -> Result<PointCloud> {
    let mut cloud = PointCloud::with_capacity(0);

    for (frame_index, path) in paths.iter().enumerate() {
        let image = image::open(path)
            .map_err(|source| ExtractError::FrameDecode {
                path: path.clone(),
                source,
            })?
            .to_rgb8();
        frame_to_points(&image, frame_index, &mut cloud);
        debug!(frame = frame_index, points = cloud.len(), "frame accumulated");
    }

    Ok(cloud)
}

/// The output file sits next to the source: `clip.mp4` -> `clip.mp4.ply`.
pub fn derived_ply_path(video: &Path) -> PathBuf {
    let mut name = video.as_os_str().to_owned();
    name.push(".ply");
    PathBuf::from(name)
}

fn build_extract_args(
    video: &Path,
    pattern: &Path,
    fps: f64,
    frame_width: u32,
) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        video.display().to_string(),
        "-vf".into(),
        format!("fps={},scale={}:-1", fps, frame_width),
        pattern.display().to_string(),
    ]
}

pub(crate) fn run_tool(tool: &'static str, args: &[String]) -> Result<()> {
    let output = Command::new(tool).args(args).output()?;
    if !output.status.success() {
        return Err(ExtractError::CommandFailed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Sampling rate that spreads `target_frames` across the duration.
/// Degenerate durations (zero, unknown) fall back to taking frames at
/// [`DEFAULT_FRAME_RATE`] and letting the count land where it lands.
fn sampling_fps(duration_secs: f64, target_frames: usize) -> f64 {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        target_frames as f64 / duration_secs
    } else {
        DEFAULT_FRAME_RATE
    }
}

/// Run the whole pipeline: probe, dump frames, decode, accumulate, write.
///
/// Returns the path of the written PLY file. The scratch directory holding
/// the intermediate frame images is removed on every exit path.
pub fn extract_to_ply(video: impl AsRef<Path>, options: &ExtractOptions) -> Result<PathBuf> {
    let video = video.as_ref();
    let metadata = probe_video(video)?;
    info!(
        duration = metadata.duration_secs,
        fps = metadata.frame_rate,
        "probed video"
    );

    let fps = sampling_fps(metadata.duration_secs, options.target_frames);
    let scratch = ScratchDir::in_temp()?;

    let args = build_extract_args(
        video,
        &scratch.path().join("frame%d.png"),
        fps,
        options.frame_width,
    );
    run_tool("ffmpeg", &args)?;

    let mut frames = scratch.list_frames()?;
    if frames.is_empty() {
        return Err(ExtractError::NoFrames {
            path: video.to_path_buf(),
        });
    }
    frames.truncate(options.target_frames);
    info!(frames = frames.len(), "extracted frame images");

    let cloud = frames_to_cloud(&frames)?;

    let out_path = derived_ply_path(video);
    write_ply(&out_path, &cloud)?;
    info!(
        points = cloud.len(),
        path = %out_path.display(),
        "wrote timecube"
    );

    Ok(out_path)
    // `scratch` drops here, deleting the frame dumps.
}
