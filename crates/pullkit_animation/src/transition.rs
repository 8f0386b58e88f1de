//! Multi-track transitions
//!
//! A [`Transition`] animates several values with one shared duration and
//! easing curve. The host ticks it once per frame; the tick that reaches the
//! end returns [`TransitionStatus::Completed`], and every later tick returns
//! [`TransitionStatus::Finished`]. Completion is therefore observed exactly
//! once no matter how often the host keeps ticking.
//!
//! Individual tracks can be cancelled mid-flight (for example when the user
//! grabs the content again) without stopping the rest of the transition.

use slotmap::{new_key_type, SlotMap};

use crate::easing::Easing;
use crate::tween::Tween;

new_key_type! {
    /// Handle to a track inside a transition
    pub struct TrackId;
}

/// Result of ticking a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionStatus {
    /// Still animating
    Running,
    /// Reached the end on this tick
    Completed,
    /// Completed on an earlier tick
    Finished,
}

/// Tracks animated together over one duration
#[derive(Clone, Debug)]
pub struct Transition {
    tracks: SlotMap<TrackId, Tween>,
    duration_ms: u32,
    easing: Easing,
    elapsed_ms: f32,
    completed: bool,
}

impl Transition {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            tracks: SlotMap::with_key(),
            duration_ms,
            easing,
            elapsed_ms: 0.0,
            completed: false,
        }
    }

    /// Add a track animating from `from` to `to`
    ///
    /// Tracks added after the transition started begin from its current time.
    pub fn add_track(&mut self, from: f32, to: f32) -> TrackId {
        let mut tween = Tween::new(from, to, self.duration_ms, self.easing);
        tween.tick(self.elapsed_ms);
        self.tracks.insert(tween)
    }

    /// Stop animating a track. Its value is no longer reported.
    pub fn cancel_track(&mut self, id: TrackId) -> Option<Tween> {
        let removed = self.tracks.remove(id);
        if removed.is_some() {
            tracing::trace!(?id, "Cancelled transition track");
        }
        removed
    }

    /// Current value of a track, or None if it was cancelled
    pub fn value(&self, id: TrackId) -> Option<f32> {
        self.tracks.get(id).map(Tween::value)
    }

    pub fn has_track(&self, id: TrackId) -> bool {
        self.tracks.contains_key(id)
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TransitionStatus {
        if self.completed {
            return TransitionStatus::Finished;
        }

        let dt_ms = (dt * 1000.0).max(0.0);
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms as f32);
        for (_, tween) in self.tracks.iter_mut() {
            tween.tick(dt_ms);
        }

        if self.elapsed_ms >= self.duration_ms as f32 {
            self.complete()
        } else {
            TransitionStatus::Running
        }
    }

    /// Jump every track to its end value
    ///
    /// Returns `Completed` unless the transition had already completed.
    pub fn finish(&mut self) -> TransitionStatus {
        if self.completed {
            return TransitionStatus::Finished;
        }
        self.elapsed_ms = self.duration_ms as f32;
        self.complete()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn complete(&mut self) -> TransitionStatus {
        for (_, tween) in self.tracks.iter_mut() {
            tween.finish();
        }
        self.completed = true;
        tracing::trace!(duration_ms = self.duration_ms, "Transition completed");
        TransitionStatus::Completed
    }
}
