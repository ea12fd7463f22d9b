/// What the render loop should do with the display buffer this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDecision {
    /// Nothing changed; the previous buffer is still valid.
    Reuse,
    /// Run the sampler at this resolution and replace the buffer.
    Resample { width: usize, height: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Moving,
}

/// Resolution state machine for interactive slicing.
///
/// Resampling at full resolution every frame is the dominant cost of
/// dragging the plane around, so the controller trades resolution for
/// responsiveness: any plane edit drops the sampling grid to a fraction of
/// full size, and one frame after the edits stop it restores full
/// resolution with a forced resample. While idle with a clean buffer it
/// reports [`SampleDecision::Reuse`] and the sampler is not invoked at all.
///
/// Per frame, the owner calls [`decision`](Self::decision) exactly once
/// and acts on it; plane edits call [`notify_change`](Self::notify_change)
/// as they happen. A frame whose `decision` finds the moving flag unset
/// (no edit arrived since the previous frame) performs the settle
/// transition before answering.
#[derive(Debug, Clone)]
pub struct ResolutionController {
    full_width: usize,
    full_height: usize,
    divisor: usize,
    state: State,
    moved_this_frame: bool,
    needs_refresh: bool,
}

impl ResolutionController {
    /// # Panics
    ///
    /// Panics if either full dimension is zero.
    pub fn new(full_width: usize, full_height: usize) -> Self {
        assert!(
            full_width > 0 && full_height > 0,
            "full resolution must be > 0"
        );
        Self {
            full_width,
            full_height,
            divisor: 2,
            state: State::Idle,
            moved_this_frame: false,
            needs_refresh: true, // first frame always samples
        }
    }

    /// Override the low-resolution divisor (default 2: half resolution in
    /// each dimension while the plane moves).
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    pub fn with_divisor(mut self, divisor: usize) -> Self {
        assert!(divisor > 0, "divisor must be > 0");
        self.divisor = divisor;
        self
    }

    pub fn full_resolution(&self) -> (usize, usize) {
        (self.full_width, self.full_height)
    }

    fn low_resolution(&self) -> (usize, usize) {
        (
            (self.full_width / self.divisor).max(1),
            (self.full_height / self.divisor).max(1),
        )
    }

    /// Resolution a resample would use right now.
    pub fn current_resolution(&self) -> (usize, usize) {
        match self.state {
            State::Idle => self.full_resolution(),
            State::Moving => self.low_resolution(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.state == State::Moving
    }

    /// The plane transform changed (drag, slider edit, scripted move).
    pub fn notify_change(&mut self) {
        self.state = State::Moving;
        self.moved_this_frame = true;
        self.needs_refresh = true;
    }

    /// Invalidate the current buffer without entering the low-res state
    /// (e.g. the cloud was swapped under an unmoved plane).
    pub fn force_refresh(&mut self) {
        self.needs_refresh = true;
    }

    /// Change the full resolution, e.g. when a quality toggle flips.
    /// Resets to idle and forces a resample.
    pub fn set_full_resolution(&mut self, full_width: usize, full_height: usize) {
        assert!(
            full_width > 0 && full_height > 0,
            "full resolution must be > 0"
        );
        self.full_width = full_width;
        self.full_height = full_height;
        self.state = State::Idle;
        self.needs_refresh = true;
    }

    /// Per-frame decision. Call exactly once per frame.
    ///
    /// Consumes the refresh flag: a `Resample` result assumes the caller
    /// actually resamples before the next frame. Also clears the per-frame
    /// moving flag, so a frame with no intervening
    /// [`notify_change`](Self::notify_change) settles `Moving` back to
    /// `Idle` with one forced full-resolution resample.
    pub fn decision(&mut self) -> SampleDecision {
        if self.state == State::Moving && !self.moved_this_frame {
            self.state = State::Idle;
            self.needs_refresh = true;
        }
        self.moved_this_frame = false;

        match self.state {
            State::Moving => {
                let (width, height) = self.low_resolution();
                self.needs_refresh = false;
                SampleDecision::Resample { width, height }
            }
            State::Idle => {
                if self.needs_refresh {
                    self.needs_refresh = false;
                    let (width, height) = self.full_resolution();
                    SampleDecision::Resample { width, height }
                } else {
                    SampleDecision::Reuse
                }
            }
        }
    }
}
