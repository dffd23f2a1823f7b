use std::time::Duration;

/// Frames-per-second readout refreshed once per sampling interval.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: Duration,
    frames: u32,
    elapsed: Duration,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frames: 0,
            elapsed: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Count one frame that took `dt`.
    pub fn record(&mut self, dt: Duration) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= self.interval && !self.elapsed.is_zero() {
            self.fps = self.frames as f32 / self.elapsed.as_secs_f32();
            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    /// Last completed sample.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
