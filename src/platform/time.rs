//! Frame timing

/// Elapsed time reported for a frame with no predecessor
pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;

/// Turns display timestamps into per-frame elapsed milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call. Timestamps that run backwards
    /// report zero.
    pub fn elapsed_ms(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => NOMINAL_FRAME_MS,
        };
        self.last = Some(now_ms);
        elapsed
    }

    /// Forget the previous timestamp, e.g. when resuming from a pause
    pub fn reset(&mut self) {
        self.last = None;
    }
}
