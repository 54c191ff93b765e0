//! Real-time round clock
//!
//! The course clock in `GameState` counts simulation ticks and drives the
//! finish gate. This one follows the host's wall clock and is only for
//! showing the rider how long the current run has taken. The host passes in
//! timestamps in milliseconds, the same way the frame loop receives them.

/// Wall-clock timer for the running round
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoundTimer {
    started_ms: f64,
    /// Frozen duration once the round is over
    stopped_ms: Option<f64>,
}

impl RoundTimer {
    pub fn new(now_ms: f64) -> Self {
        Self {
            started_ms: now_ms,
            stopped_ms: None,
        }
    }

    /// Start counting again from `now_ms`
    pub fn restart(&mut self, now_ms: f64) {
        *self = Self::new(now_ms);
    }

    /// Freeze the display at the current time
    pub fn stop(&mut self, now_ms: f64) {
        if self.stopped_ms.is_none() {
            self.stopped_ms = Some(now_ms);
        }
    }

    pub fn is_running(&self) -> bool {
        self.stopped_ms.is_none()
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> f32 {
        let end = self.stopped_ms.unwrap_or(now_ms);
        ((end - self.started_ms).max(0.0) / 1000.0) as f32
    }
}

/// `m:ss.t` for the round clock
pub fn format_clock(secs: f32) -> String {
    let tenths = (secs.max(0.0) * 10.0).floor() as u32;
    let mins = tenths / 600;
    let rest = tenths % 600;
    format!("{}:{:02}.{}", mins, rest / 10, rest % 10)
}
