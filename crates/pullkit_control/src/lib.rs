//! Pullkit Control
//!
//! A pull-to-refresh engine that attaches to any vertically scrolling
//! container.
//!
//! # Architecture
//!
//! ```text
//! ScrollContainer ──offset/inset/pan──▶ RefreshControl ──lifecycle──▶ RefreshIndicator
//!        ▲                                    │
//!        └────────── inset/offset writes ─────┘
//! ```
//!
//! The container notifies the control synchronously and in order. The
//! control decides when to trigger, writes the container's inset and offset
//! while refreshing, and drives the indicator. Rendering stays with the host:
//! it reads the control's presentation state (hidden, translation, frame) and
//! ticks the end transition each frame.
//!
//! # Example
//!
//! ```rust
//! use pullkit_control::prelude::*;
//! use std::rc::Rc;
//!
//! struct Spinner;
//!
//! impl RefreshIndicator for Spinner {
//!     fn will_refresh(&mut self) {}
//!     fn did_refresh(&mut self) {}
//!     fn did_scroll(&mut self, _progress: Progress) {}
//!     fn height(&self) -> f32 {
//!         60.0
//!     }
//! }
//!
//! let scroll_view = Rc::new(ScrollView::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0)));
//! let control = RefreshControl::new(Spinner, Configuration::default());
//! control.add_to(&scroll_view);
//!
//! scroll_view.begin_pan();
//! scroll_view.pan_to(-60.0);
//! assert!(control.is_refreshing());
//!
//! scroll_view.end_pan();
//! control.end_refreshing();
//! while control.tick(1.0 / 60.0) {}
//! assert!(!control.is_refreshing());
//! ```

pub mod anchor;
pub mod container;
pub mod control;
pub mod controlling;
pub mod indicator;
pub mod scroll_view;

#[cfg(test)]
pub(crate) mod test_support;

pub use anchor::{top_constant, AnchorEdge, ControlAnchor, LayoutGuide};
pub use container::{
    ControlId, InsetAdjustmentBehavior, InsetObserver, ObserverId, OffsetObserver, PanHandler,
    ScrollContainer, ScrollMetrics, TeardownObserver,
};
pub use control::{ActionHandler, RefreshControl, END_TRANSITION_MS};
pub use controlling::RefreshControlling;
pub use indicator::RefreshIndicator;
pub use scroll_view::ScrollView;

/// Commonly used types
pub mod prelude {
    pub use crate::anchor::{AnchorEdge, ControlAnchor, LayoutGuide};
    pub use crate::container::{InsetAdjustmentBehavior, ScrollContainer, ScrollMetrics};
    pub use crate::control::RefreshControl;
    pub use crate::controlling::RefreshControlling;
    pub use crate::indicator::RefreshIndicator;
    pub use crate::scroll_view::ScrollView;

    pub use pullkit_core::{
        Configuration, EdgeInsets, GesturePhase, Layout, Point, Progress, Rect, RefreshState,
        Size, Trigger, TriggerEvent,
    };
}
