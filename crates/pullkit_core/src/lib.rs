//! Pullkit Core
//!
//! Platform-independent building blocks for a pull-to-refresh control:
//!
//! - **Progress**: A clamped `[0, 1]` fraction describing how far the user pulled
//! - **Configuration**: Layout placement and trigger policy, loadable from TOML
//! - **State Machine**: The `Idle` / `Refreshing` lifecycle and its transition table
//! - **Geometry**: Points, sizes, rects, and edge insets in logical pixels
//! - **Events**: Gesture phases and control action events
//!
//! # Example
//!
//! ```rust
//! use pullkit_core::{Configuration, Layout, Progress, Trigger};
//!
//! let config = Configuration::new(Layout::Top, Trigger::released().with_height(80.0));
//! assert_eq!(config.trigger.height, Some(80.0));
//!
//! let mut progress = Progress::default();
//! progress.set(1.4);
//! assert!(progress.is_complete());
//! ```

pub mod clamp;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod state;

pub use clamp::{Clamped, Progress};
pub use config::{Configuration, Layout, Trigger, TriggerEvent};
pub use error::{ConfigError, Result};
pub use events::{ControlEvent, GesturePhase};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use state::{refresh_events, RefreshState, StateTransitions};
