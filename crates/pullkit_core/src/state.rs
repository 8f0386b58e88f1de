//! Refresh lifecycle state machine
//!
//! A refresh control cycles `Idle -> Refreshing -> Idle` indefinitely.
//!
//! # Events
//!
//! - `BEGIN`: Pull crossed the trigger, or `begin_refreshing()` was called
//! - `END_COMPLETE`: The end-of-refresh transition finished
//!
//! `end_refreshing()` does not leave `Refreshing` by itself; the control stays
//! refreshing (and owns the container's inset) until its end transition
//! completes.

use std::hash::Hash;

/// Trait for state types driven by `u32` event codes
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Event codes for [`RefreshState`]
pub mod refresh_events {
    /// Start refreshing
    pub const BEGIN: u32 = 20000;
    /// End-of-refresh transition completed
    pub const END_COMPLETE: u32 = 20001;
}

/// Refresh lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshState {
    /// Tracking the pull, not refreshing
    #[default]
    Idle,
    /// Refreshing; the control owns the container's inset and offset
    Refreshing,
}

impl RefreshState {
    pub fn is_refreshing(&self) -> bool {
        matches!(self, RefreshState::Refreshing)
    }
}

impl StateTransitions for RefreshState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use refresh_events::*;

        match (self, event) {
            // Idle -> Refreshing: Pull triggered or programmatic begin
            (RefreshState::Idle, BEGIN) => Some(RefreshState::Refreshing),

            // Refreshing -> Idle: End transition finished
            (RefreshState::Refreshing, END_COMPLETE) => Some(RefreshState::Idle),

            // Begin while refreshing, end while idle: no-op
            _ => None,
        }
    }
}
