//! Slice a synthetic timecube and print the cross-section as ASCII art.
//!
//! Run with `cargo run --example slice_preview`.

use timecube_core::PointCloud;
use timecube_slice::TimecubeSession;

/// Grayscale ramp from dark to bright.
const RAMP: &[u8] = b" .:-=+*#%@";

fn shade(pixel: Option<[f32; 3]>) -> char {
    match pixel {
        Some([r, g, b]) => {
            let brightness = 0.299 * r + 0.587 * g + 0.114 * b;
            let idx = (brightness * (RAMP.len() - 1) as f32).round() as usize;
            RAMP[idx.min(RAMP.len() - 1)] as char
        }
        None => ' ',
    }
}

fn main() {
    // Synthetic cube: a bright diagonal band sweeping across the frame
    // over time, on a dim background.
    let side = 32usize;
    let mut cloud = PointCloud::with_capacity(side * side * side);
    for z in 0..side {
        for y in 0..side {
            for x in 0..side {
                let on_band = (x + z) % side == y || (x + z) % side == (y + 1) % side;
                let value = if on_band { 230 } else { 25 };
                cloud.push_colored([x as f32, y as f32, z as f32], [value, value, value]);
            }
        }
    }

    let mut session = TimecubeSession::new(64, 32);
    session.load_cloud(cloud);

    // Let the session settle to full resolution.
    let _ = session.frame();
    let _ = session.frame();

    println!("spatial slice (plane at the cube's center, facing the time axis):");
    print_buffer(&mut session);

    // Rotate the plane 90 degrees about x so its vertical axis runs along
    // time: a slit-scan style temporal slice.
    session.set_plane_rotation_deg(90.0, 0.0, 0.0);
    let _ = session.frame();
    let _ = session.frame();
    println!("\ntemporal slice (plane rotated 90 degrees about x):");
    print_buffer(&mut session);

    let corners = session.export_corners();
    println!("\nexport corners (bbox-normalized [0,100] space):");
    for corner in corners {
        println!("  ({:6.2}, {:6.2}, {:6.2})", corner[0], corner[1], corner[2]);
    }
}

fn print_buffer(session: &mut TimecubeSession) {
    let buffer = session.frame().clone();
    for y in 0..buffer.height() {
        let line: String = (0..buffer.width()).map(|x| shade(buffer.get(x, y))).collect();
        println!("{}", line);
    }
}
