//! Single-value timed animation

use crate::easing::Easing;

/// A value animated from `from` to `to` over a fixed duration
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms as f32,
            elapsed_ms: 0.0,
            easing,
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    /// Linear time progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).min(1.0)
    }

    /// Current eased value. Exactly `to` once finished.
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * t
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        if dt_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        }
    }

    /// Jump to the end value
    pub fn finish(&mut self) {
        self.elapsed_ms = self.duration_ms;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
