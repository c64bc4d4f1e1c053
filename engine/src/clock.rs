use crate::config::AnimationConfig;

/// Result of feeding one frame timestamp to the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Clock is not running; the frame is ignored.
    Idle,
    Advanced(f64),
    /// Progress reached the end of the route on this frame. The clock has
    /// stopped itself; the value is the wrapped progress.
    Completed(f64),
}

/// Normalized progress along the route, advanced from wall-clock deltas.
///
/// Progress is kept modulo 2. Completion is detected on the unwrapped sum, so
/// a long gap between frames cannot jump past the end unnoticed.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    speed: f64,
    distance_time_constant: f64,
    progress: f64,
    last_sample_ms: f64,
    running: bool,
}

impl AnimationClock {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            speed: config.speed,
            distance_time_constant: config.distance_time_constant,
            progress: 0.0,
            last_sample_ms: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.progress = 0.0;
        self.last_sample_ms = now_ms;
        self.running = true;
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        let elapsed = (now_ms - self.last_sample_ms).max(0.0);
        self.last_sample_ms = now_ms;

        let raw = self.progress + self.speed * elapsed / self.distance_time_constant;
        self.progress = raw % 2.0;
        if raw >= 1.0 {
            self.running = false;
            Tick::Completed(self.progress)
        } else {
            Tick::Advanced(self.progress)
        }
    }

    /// Stops ticking; returns the progress reached.
    pub fn stop(&mut self) -> f64 {
        self.running = false;
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}
