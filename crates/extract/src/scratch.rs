use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scratch directory for intermediate frame images.
///
/// Created up front, removed (best effort) on drop, so the frame dumps are
/// cleaned up whether the pipeline finishes or bails out partway. Each
/// instance gets a unique directory, so concurrent extractions don't
/// interleave their frames.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create `parent/timecube-frames-<pid>-<n>`.
    pub fn create(parent: impl AsRef<Path>) -> io::Result<Self> {
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = parent.as_ref().join(format!(
            "timecube-frames-{}-{}",
            std::process::id(),
            n
        ));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Scratch directory under the system temp dir.
    pub fn in_temp() -> io::Result<Self> {
        Self::create(std::env::temp_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of frame number `n` (1-based, matching ffmpeg's `frame%d`
    /// output template).
    pub fn frame_path(&self, n: usize) -> PathBuf {
        self.path.join(format!("frame{}.png", n))
    }

    /// All `frame<N>.png` files present, sorted by frame number.
    ///
    /// Lexicographic directory order would interleave frame10 between
    /// frame1 and frame2; sorting on the parsed number keeps the time axis
    /// in order.
    pub fn list_frames(&self) -> io::Result<Vec<PathBuf>> {
        let mut numbered: Vec<(usize, PathBuf)> = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(number) = name
                .strip_prefix("frame")
                .and_then(|rest| rest.strip_suffix(".png"))
                .and_then(|digits| digits.parse::<usize>().ok())
            else {
                continue;
            };
            numbered.push((number, entry.path()));
        }

        numbered.sort_unstable_by_key(|(n, _)| *n);
        Ok(numbered.into_iter().map(|(_, p)| p).collect())
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.path) {
            debug!(path = %self.path.display(), %err, "scratch cleanup failed");
        }
    }
}
