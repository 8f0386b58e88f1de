//! Refresh indicator contract
//!
//! The indicator is the visual the user sees while pulling and refreshing.
//! Pullkit never draws it; it only drives its lifecycle.

use pullkit_core::Progress;

/// Visual driven by a refresh control
///
/// Implementations must not call back into the control that owns them.
pub trait RefreshIndicator {
    /// Refreshing started
    fn will_refresh(&mut self);

    /// Refreshing ended; the end transition is about to run
    fn did_refresh(&mut self);

    /// The pull moved while idle
    fn did_scroll(&mut self, progress: Progress);

    /// Measured height. Used as the control height and as the default
    /// trigger height.
    fn height(&self) -> f32;
}
