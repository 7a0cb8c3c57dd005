//! Frame timing
//!
//! Display-refresh timestamps (milliseconds) become a sanitized step in
//! seconds. A late callback (tab in background, debugger stop) is clamped to
//! `max_step` instead of producing one huge physics step.

/// Measures elapsed time between frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_step: f32,
}

impl FrameClock {
    pub fn new(max_step: f32) -> Self {
        Self {
            last_ms: None,
            max_step,
        }
    }

    /// Seconds since the previous call, in `[0, max_step]`
    ///
    /// The first frame after construction or `reset` yields zero.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => clamp_step((now_ms - last) / 1000.0, self.max_step),
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        dt
    }

    /// Forget the previous timestamp (after a stop/start)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }
}

/// NaN and negative steps become zero; long steps are capped
#[inline]
pub fn clamp_step(seconds: f64, max_step: f32) -> f32 {
    if seconds.is_nan() || seconds <= 0.0 {
        0.0
    } else {
        (seconds as f32).min(max_step)
    }
}
