//! Scroll container contract
//!
//! Anything that scrolls vertically can host a refresh control by
//! implementing [`ScrollContainer`]. The control only reads and writes the
//! container through this trait and keeps a weak reference to it.
//!
//! # Notifications
//!
//! Observers are invoked synchronously, in the order the container mutated
//! its state, and implementations must not hold any internal borrow or lock
//! while invoking them: observers are allowed to call back into the container
//! (for example to write the content inset from inside a pan handler).

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use pullkit_core::{EdgeInsets, GesturePhase, Point, Rect};
use slotmap::new_key_type;

use crate::anchor::ControlAnchor;

new_key_type! {
    /// Handle to an observer registered on a container
    pub struct ObserverId;
}

/// Identity of a refresh control inside a container's view hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// How the container folds the safe area into its adjusted content inset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsetAdjustmentBehavior {
    #[default]
    Automatic,
    /// Adjust only along scrollable axes
    ScrollableAxes,
    /// Never add the safe area
    Never,
    /// Always add the safe area
    Always,
}

impl InsetAdjustmentBehavior {
    /// Whether the top safe-area inset is part of the adjusted inset
    pub fn includes_safe_area_top(&self) -> bool {
        !matches!(self, InsetAdjustmentBehavior::Never)
    }
}

/// Snapshot of the scroll state delivered with every offset/inset notification
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub content_offset: Point,
    pub content_inset: EdgeInsets,
    /// Content inset plus whatever safe area the container adds
    pub adjusted_content_inset: EdgeInsets,
}

impl ScrollMetrics {
    /// Vertical offset measured from the rest position (negative = pulled down)
    pub fn resting_offset_y(&self) -> f32 {
        self.content_offset.y + self.adjusted_content_inset.top
    }
}

pub type OffsetObserver = Rc<dyn Fn(&ScrollMetrics)>;
pub type InsetObserver = Rc<dyn Fn(&ScrollMetrics)>;
pub type PanHandler = Rc<dyn Fn(GesturePhase)>;
pub type TeardownObserver = Rc<dyn Fn()>;

/// A vertically scrolling container a refresh control can attach to
pub trait ScrollContainer {
    fn content_offset(&self) -> Point;
    fn set_content_offset(&self, offset: Point);

    fn content_inset(&self) -> EdgeInsets;
    fn set_content_inset(&self, inset: EdgeInsets);

    /// Content inset combined with the safe area, as the container applies it
    fn adjusted_content_inset(&self) -> EdgeInsets;
    fn inset_adjustment_behavior(&self) -> InsetAdjustmentBehavior;
    fn safe_area_insets(&self) -> EdgeInsets;

    /// Visible frame in content coordinates
    fn frame_guide(&self) -> Rect;
    /// Content bounds in content coordinates
    fn content_guide(&self) -> Rect;

    fn observe_content_offset(&self, observer: OffsetObserver) -> ObserverId;
    fn observe_content_inset(&self, observer: InsetObserver) -> ObserverId;

    /// Install a pan recognizer that runs alongside the container's own
    /// scrolling gesture. It observes only and never blocks native scrolling.
    fn add_pan_handler(&self, handler: PanHandler) -> ObserverId;

    /// Called once, right before the container is torn down
    fn observe_teardown(&self, observer: TeardownObserver) -> ObserverId;

    /// Unregister any observer or pan handler. Unknown ids are ignored.
    fn remove_observer(&self, id: ObserverId);

    /// Add a control as a child positioned by `anchor`
    fn insert_control(&self, id: ControlId, anchor: ControlAnchor);
    fn remove_control(&self, id: ControlId);
    /// Replace the anchor of an inserted control, keeping its z-order
    fn set_control_anchor(&self, id: ControlId, anchor: ControlAnchor);
    /// Move a control behind the content
    fn send_control_to_back(&self, id: ControlId);

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            content_offset: self.content_offset(),
            content_inset: self.content_inset(),
            adjusted_content_inset: self.adjusted_content_inset(),
        }
    }

    fn set_content_offset_y(&self, y: f32) {
        let offset = self.content_offset();
        self.set_content_offset(Point::new(offset.x, y));
    }

    fn set_content_inset_top(&self, top: f32) {
        self.set_content_inset(self.content_inset().with_top(top));
    }
}
