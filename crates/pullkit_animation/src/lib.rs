//! Pullkit Animation
//!
//! Timed animations for the refresh control's end-of-refresh transition.
//!
//! # Features
//!
//! - **Easing**: Standard ease-in/out curves
//! - **Tweens**: A single value animated from `from` to `to` over a duration
//! - **Transitions**: Several tracks sharing one duration and easing, ticked
//!   by the host each frame, reporting completion exactly once
//!
//! # Example
//!
//! ```rust
//! use pullkit_animation::{Easing, Transition, TransitionStatus};
//!
//! let mut transition = Transition::new(200, Easing::EaseOut);
//! let track = transition.add_track(-60.0, 0.0);
//!
//! let mut status = TransitionStatus::Running;
//! while status == TransitionStatus::Running {
//!     status = transition.tick(1.0 / 60.0);
//! }
//! assert_eq!(status, TransitionStatus::Completed);
//! assert_eq!(transition.value(track), Some(0.0));
//! ```

pub mod easing;
pub mod transition;
pub mod tween;

pub use easing::Easing;
pub use transition::{TrackId, Transition, TransitionStatus};
pub use tween::Tween;
