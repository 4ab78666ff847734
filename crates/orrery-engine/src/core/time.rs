/// Variable-step frame clock.
/// Sanitizes the host's per-frame delta before it reaches game logic.
pub struct FrameClock {
    /// Upper bound for a single frame delta.
    max_dt: f32,
    /// Total simulated seconds.
    elapsed: f64,
    /// Frames advanced so far.
    frames: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt,
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Feed one frame delta. Returns the delta to simulate:
    /// negative or non-finite input becomes 0, long stalls are capped at `max_dt`.
    pub fn advance(&mut self, frame_dt: f32) -> f32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        };
        self.elapsed += dt as f64;
        self.frames += 1;
        dt
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}
