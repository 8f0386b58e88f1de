//! Gesture phases and control events

/// Phase of the pan gesture delivered by the scroll container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Finger went down and started panning
    Began,
    /// Finger moved while panning
    Changed,
    /// Finger lifted
    Ended,
    /// System cancelled the gesture
    Cancelled,
}

impl GesturePhase {
    /// Returns true while the finger is down
    pub fn is_in_progress(&self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }

    /// Returns true once the gesture is over, for whatever reason
    pub fn is_finished(&self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// Action events a refresh control sends to its targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// Refreshing began, either from a pull or from `begin_refreshing()`
    ValueChanged,
}
