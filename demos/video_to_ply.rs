//! Convert a video file into a timecube PLY.
//!
//! Run with `cargo run --example video_to_ply -- <video>`. Requires
//! `ffmpeg` and `ffprobe` on PATH.

use timecube_extract::{extract_to_ply, ExtractOptions};

fn main() {
    tracing_subscriber::fmt::init();

    let Some(video) = std::env::args().nth(1) else {
        eprintln!("usage: video_to_ply <video-file>");
        std::process::exit(2);
    };

    match extract_to_ply(&video, &ExtractOptions::default()) {
        Ok(path) => println!("wrote {}", path.display()),
        Err(err) => {
            eprintln!("extraction failed: {err}");
            std::process::exit(1);
        }
    }
}
