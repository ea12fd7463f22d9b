use crate::convert::run_tool;
use crate::error::Result;
use crate::probe::{probe_video, VideoMetadata};
use std::path::Path;
use tracing::info;

/// Tunables for [`resize_video`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOptions {
    /// Output frame height; width follows the aspect ratio.
    pub target_height: u32,
    /// Retime the video so roughly this many frames remain.
    pub target_frames: usize,
    /// Frames trimmed off the start before retiming.
    pub cut_first_frames: u32,
    /// Frames trimmed off the end before retiming.
    pub cut_last_frames: u32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            target_height: 100,
            target_frames: 100,
            cut_first_frames: 0,
            cut_last_frames: 0,
        }
    }
}

fn build_resize_args(
    input: &Path,
    output: &Path,
    metadata: &VideoMetadata,
    options: &ResizeOptions,
) -> Vec<String> {
    let total_frames = (metadata.duration_secs * metadata.frame_rate).floor();
    let new_width = if metadata.height > 0 {
        ((options.target_height as f64) * (metadata.width as f64) / (metadata.height as f64))
            .floor() as u32
    } else {
        options.target_height
    };

    let remaining =
        total_frames - options.cut_first_frames as f64 - options.cut_last_frames as f64;
    let frame_step = if options.target_frames > 0 {
        (remaining / options.target_frames as f64).floor()
    } else {
        0.0
    };
    let speed_up = if options.target_frames > 0 && total_frames > 0.0 {
        total_frames / options.target_frames as f64
    } else {
        1.0
    };

    let mut args: Vec<String> = vec!["-v".into(), "error".into(), "-y".into()];

    if options.cut_first_frames > 0 {
        args.push("-ss".into());
        args.push(format!(
            "{}",
            options.cut_first_frames as f64 / metadata.frame_rate
        ));
    }

    args.push("-i".into());
    args.push(input.display().to_string());

    // Short inputs only get scaled; longer ones are also sped up so the
    // output carries ~target_frames frames.
    if frame_step == 0.0 {
        args.push("-vf".into());
        args.push(format!("scale={}:{}", new_width, options.target_height));
    } else {
        args.push("-vf".into());
        args.push(format!(
            "scale={}:{},setpts={}*PTS",
            new_width,
            options.target_height,
            1.0 / speed_up
        ));
        if metadata.has_audio {
            args.push("-filter:a".into());
            args.push(format!("atempo={}", speed_up));
        }
    }

    args.push("-f".into());
    args.push("mp4".into());
    args.push(output.display().to_string());
    args
}

/// Scale a video to `target_height` and retime it to roughly
/// `target_frames` frames, the original tool's preprocessing step before
/// conversion. Audio, when present, is sped up to match; videos without an
/// audio stream skip that filter entirely.
pub fn resize_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ResizeOptions,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    let metadata = probe_video(input)?;

    let args = build_resize_args(input, output, &metadata, options);
    info!(
        input = %input.display(),
        output = %output.display(),
        "resizing video"
    );
    run_tool("ffmpeg", &args)
}

#[cfg(test)]
mod tests {
    use super::{build_resize_args, ResizeOptions};
    use crate::probe::VideoMetadata;
    use std::path::Path;

    fn metadata(duration: f64, fps: f64, has_audio: bool) -> VideoMetadata {
        VideoMetadata {
            duration_secs: duration,
            frame_rate: fps,
            width: 1920,
            height: 1080,
            has_audio,
        }
    }

    fn args_for(meta: &VideoMetadata, options: &ResizeOptions) -> Vec<String> {
        build_resize_args(Path::new("in.mp4"), Path::new("out.mp4"), meta, options)
    }

    #[test]
    fn long_video_is_scaled_and_retimed() {
        // 40s at 25fps = 1000 frames; target 100 -> 10x speed-up.
        let args = args_for(&metadata(40.0, 25.0, false), &ResizeOptions::default());
        let vf = args[args.iter().position(|a| a == "-vf").unwrap() + 1].clone();
        assert!(vf.contains("scale=177:100"), "vf was {vf}");
        assert!(vf.contains("setpts=0.1*PTS"), "vf was {vf}");
        // No audio stream: no atempo filter.
        assert!(!args.iter().any(|a| a == "-filter:a"));
    }

    #[test]
    fn audio_is_retimed_when_present() {
        let args = args_for(&metadata(40.0, 25.0, true), &ResizeOptions::default());
        let pos = args.iter().position(|a| a == "-filter:a").unwrap();
        assert_eq!(args[pos + 1], "atempo=10");
    }

    #[test]
    fn short_video_is_only_scaled() {
        // 2s at 25fps = 50 frames < target 100: no retime, no atempo even
        // with audio present.
        let args = args_for(&metadata(2.0, 25.0, true), &ResizeOptions::default());
        let vf = args[args.iter().position(|a| a == "-vf").unwrap() + 1].clone();
        assert_eq!(vf, "scale=177:100");
        assert!(!args.iter().any(|a| a == "-filter:a"));
    }

    #[test]
    fn leading_cut_becomes_a_seek() {
        let options = ResizeOptions {
            cut_first_frames: 50,
            ..ResizeOptions::default()
        };
        let args = args_for(&metadata(40.0, 25.0, false), &options);
        let pos = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[pos + 1], "2");
        // Seek precedes the input file.
        assert!(pos < args.iter().position(|a| a == "-i").unwrap());
    }
}
