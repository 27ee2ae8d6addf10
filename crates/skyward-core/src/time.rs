use serde::{Deserialize, Serialize};

/// Default simulation rate in Hz.
pub const DEFAULT_TICK_RATE_HZ: f32 = 60.0;
/// Upper bound on fixed steps run for a single rendered frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;
/// Speed multiplier while slow motion is on.
pub const DEFAULT_SLOW_MOTION_SCALE: f32 = 0.5;

/// Accumulator that turns variable frame times into a whole number of
/// fixed simulation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedTimestep {
    step: f32,
    lag: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Create an accumulator ticking at `rate_hz`. Non-positive or
    /// non-finite rates fall back to [`DEFAULT_TICK_RATE_HZ`].
    pub fn new(rate_hz: f32) -> Self {
        let rate = if rate_hz.is_finite() && rate_hz > 0.0 {
            rate_hz
        } else {
            tracing::warn!(rate_hz, "Invalid tick rate, using default");
            DEFAULT_TICK_RATE_HZ
        };
        Self {
            step: 1.0 / rate,
            lag: 0.0,
            max_steps: DEFAULT_MAX_STEPS_PER_FRAME,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Duration of one fixed step in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Unsimulated time carried over to the next frame.
    pub fn lag(&self) -> f32 {
        self.lag
    }

    /// Add a frame's elapsed time and return how many fixed steps to run.
    ///
    /// Lag beyond `max_steps` whole steps is dropped so a long stall cannot
    /// make every following frame run a burst of catch-up ticks.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.lag += frame_dt;
        let mut steps = 0;
        while self.lag >= self.step && steps < self.max_steps {
            self.lag -= self.step;
            steps += 1;
        }
        if self.lag >= self.step {
            tracing::debug!(
                dropped_secs = self.lag,
                max_steps = self.max_steps,
                "Fixed timestep fell behind, dropping lag"
            );
            self.lag %= self.step;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.lag = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

/// Global speed multiplier applied to frame time (slow motion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    scale: f32,
    slow_scale: f32,
}

impl TimeScale {
    /// Create a scale running at normal speed. A slow-motion scale outside
    /// `(0, 1)` falls back to [`DEFAULT_SLOW_MOTION_SCALE`].
    pub fn new(slow_scale: f32) -> Self {
        let slow_scale = if slow_scale.is_finite() && slow_scale > 0.0 && slow_scale < 1.0 {
            slow_scale
        } else {
            tracing::warn!(slow_scale, "Invalid slow-motion scale, using default");
            DEFAULT_SLOW_MOTION_SCALE
        };
        Self {
            scale: 1.0,
            slow_scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_slowed(&self) -> bool {
        self.scale < 1.0
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    /// Switch between normal speed and the configured slow-motion scale.
    pub fn toggle(&mut self) {
        if self.is_slowed() {
            self.reset();
        } else {
            self.scale = self.slow_scale;
        }
    }

    pub fn apply(&self, dt: f32) -> f32 {
        dt * self.scale
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_MOTION_SCALE)
    }
}
