//! Cursor blink timer

use std::time::{Duration, Instant};

/// Time between cursor visibility flips
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Cursor visibility plus the time of the last flip.
///
/// At most one flip happens per `update` call, even if several intervals
/// have passed since the previous one.
#[derive(Debug, Clone, Copy)]
pub struct CursorBlink {
    visible: bool,
    last_toggle: Instant,
    interval: Duration,
}

impl CursorBlink {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, BLINK_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            visible: true,
            last_toggle: now,
            interval,
        }
    }

    /// Advance the timer. Returns true if visibility flipped.
    pub fn update(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_toggle) >= self.interval {
            self.visible = !self.visible;
            self.last_toggle = now;
            return true;
        }
        false
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
