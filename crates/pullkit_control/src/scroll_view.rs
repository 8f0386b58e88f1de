//! In-memory scroll container
//!
//! `ScrollView` keeps the bookkeeping of a native scroll view (offset,
//! inset, safe area, content size) without rendering anything. Hosts that
//! drive their own scroll physics can feed offsets into it, and it is the
//! container the control's tests run against.
//!
//! # Example
//!
//! ```rust
//! use pullkit_control::prelude::*;
//! use std::rc::Rc;
//!
//! let scroll_view = Rc::new(
//!     ScrollView::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0))
//!         .with_content_inset(EdgeInsets::top(20.0)),
//! );
//! assert_eq!(scroll_view.content_offset().y, -20.0);
//!
//! scroll_view.begin_pan();
//! scroll_view.pan_to(-100.0);
//! scroll_view.end_pan();
//! ```

use std::cell::RefCell;

use pullkit_core::{EdgeInsets, GesturePhase, Point, Rect, Size};
use slotmap::SlotMap;

use crate::anchor::ControlAnchor;
use crate::container::{
    ControlId, InsetAdjustmentBehavior, InsetObserver, ObserverId, OffsetObserver, PanHandler,
    ScrollContainer, ScrollMetrics, TeardownObserver,
};

#[derive(Clone)]
enum Observer {
    Offset(OffsetObserver),
    Inset(InsetObserver),
    Pan(PanHandler),
    Teardown(TeardownObserver),
}

#[derive(Debug, Clone)]
struct ScrollViewState {
    content_offset: Point,
    content_inset: EdgeInsets,
    safe_area_insets: EdgeInsets,
    behavior: InsetAdjustmentBehavior,
    frame_size: Size,
    content_size: Size,
    /// Children back to front
    controls: Vec<(ControlId, ControlAnchor)>,
    torn_down: bool,
}

impl ScrollViewState {
    fn adjusted_content_inset(&self) -> EdgeInsets {
        let mut adjusted = self.content_inset;
        match self.behavior {
            InsetAdjustmentBehavior::Never => {}
            InsetAdjustmentBehavior::Automatic | InsetAdjustmentBehavior::ScrollableAxes => {
                adjusted.top += self.safe_area_insets.top;
                adjusted.bottom += self.safe_area_insets.bottom;
            }
            InsetAdjustmentBehavior::Always => {
                adjusted = adjusted + self.safe_area_insets;
            }
        }
        adjusted
    }

    fn rest_offset_y(&self) -> f32 {
        -self.adjusted_content_inset().top
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            content_offset: self.content_offset,
            content_inset: self.content_inset,
            adjusted_content_inset: self.adjusted_content_inset(),
        }
    }
}

/// A scroll container model with synchronous, ordered notifications
pub struct ScrollView {
    state: RefCell<ScrollViewState>,
    observers: RefCell<SlotMap<ObserverId, Observer>>,
}

impl ScrollView {
    /// Create a scroll view resting at the top of its content
    pub fn new(frame_size: Size, content_size: Size) -> Self {
        Self {
            state: RefCell::new(ScrollViewState {
                content_offset: Point::ZERO,
                content_inset: EdgeInsets::ZERO,
                safe_area_insets: EdgeInsets::ZERO,
                behavior: InsetAdjustmentBehavior::default(),
                frame_size,
                content_size,
                controls: Vec::new(),
                torn_down: false,
            }),
            observers: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Set the initial content inset and move to the new rest position
    pub fn with_content_inset(self, inset: EdgeInsets) -> Self {
        self.configure(|state| state.content_inset = inset)
    }

    /// Set the initial safe area and move to the new rest position
    pub fn with_safe_area(self, insets: EdgeInsets) -> Self {
        self.configure(|state| state.safe_area_insets = insets)
    }

    pub fn with_behavior(self, behavior: InsetAdjustmentBehavior) -> Self {
        self.configure(|state| state.behavior = behavior)
    }

    fn configure(self, f: impl FnOnce(&mut ScrollViewState)) -> Self {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.content_offset.y = state.rest_offset_y();
        }
        self
    }

    /// Offset at which the content rests at the top
    pub fn rest_offset_y(&self) -> f32 {
        self.state.borrow().rest_offset_y()
    }

    pub fn content_size(&self) -> Size {
        self.state.borrow().content_size
    }

    pub fn set_content_size(&self, size: Size) {
        self.state.borrow_mut().content_size = size;
    }

    /// Update the safe area (rotation, bars appearing). Notifies inset observers.
    pub fn set_safe_area_insets(&self, insets: EdgeInsets) {
        self.state.borrow_mut().safe_area_insets = insets;
        self.notify_inset();
    }

    /// Control ids in back-to-front order
    pub fn controls(&self) -> Vec<ControlId> {
        self.state.borrow().controls.iter().map(|(id, _)| *id).collect()
    }

    pub fn control_anchor(&self, id: ControlId) -> Option<ControlAnchor> {
        self.state
            .borrow()
            .controls
            .iter()
            .find(|(control, _)| *control == id)
            .map(|(_, anchor)| *anchor)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().torn_down
    }

    // =========================================================================
    // Gesture simulation
    // =========================================================================

    /// Deliver a pan phase to every pan handler
    pub fn dispatch_pan(&self, phase: GesturePhase) {
        let handlers: Vec<PanHandler> = self
            .observers
            .borrow()
            .values()
            .filter_map(|observer| match observer {
                Observer::Pan(handler) => Some(handler.clone()),
                _ => None,
            })
            .collect();

        for handler in handlers {
            handler(phase);
        }
    }

    pub fn begin_pan(&self) {
        self.dispatch_pan(GesturePhase::Began);
    }

    /// Drag the content to `offset_y`, then report the pan as changed
    pub fn pan_to(&self, offset_y: f32) {
        self.set_content_offset_y(offset_y);
        self.dispatch_pan(GesturePhase::Changed);
    }

    pub fn end_pan(&self) {
        self.dispatch_pan(GesturePhase::Ended);
    }

    pub fn cancel_pan(&self) {
        self.dispatch_pan(GesturePhase::Cancelled);
    }

    /// Notify teardown observers and drop every registration
    pub fn teardown(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
        }

        let observers: Vec<TeardownObserver> = self
            .observers
            .borrow()
            .values()
            .filter_map(|observer| match observer {
                Observer::Teardown(observer) => Some(observer.clone()),
                _ => None,
            })
            .collect();

        for observer in observers {
            observer();
        }

        self.observers.borrow_mut().clear();
        self.state.borrow_mut().controls.clear();
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn register(&self, observer: Observer) -> ObserverId {
        self.observers.borrow_mut().insert(observer)
    }

    fn notify_offset(&self) {
        let metrics = self.state.borrow().metrics();
        let observers: Vec<OffsetObserver> = self
            .observers
            .borrow()
            .values()
            .filter_map(|observer| match observer {
                Observer::Offset(observer) => Some(observer.clone()),
                _ => None,
            })
            .collect();

        for observer in observers {
            observer(&metrics);
        }
    }

    fn notify_inset(&self) {
        let metrics = self.state.borrow().metrics();
        let observers: Vec<InsetObserver> = self
            .observers
            .borrow()
            .values()
            .filter_map(|observer| match observer {
                Observer::Inset(observer) => Some(observer.clone()),
                _ => None,
            })
            .collect();

        for observer in observers {
            observer(&metrics);
        }
    }
}

impl Drop for ScrollView {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl ScrollContainer for ScrollView {
    fn content_offset(&self) -> Point {
        self.state.borrow().content_offset
    }

    fn set_content_offset(&self, offset: Point) {
        self.state.borrow_mut().content_offset = offset;
        self.notify_offset();
    }

    fn content_inset(&self) -> EdgeInsets {
        self.state.borrow().content_inset
    }

    /// Writing the inset while resting moves the content to the new rest
    /// position, like a native scroll view compensating for the change.
    fn set_content_inset(&self, inset: EdgeInsets) {
        let compensated = {
            let mut state = self.state.borrow_mut();
            let was_resting = state.content_offset.y == state.rest_offset_y();
            state.content_inset = inset;
            if was_resting {
                state.content_offset.y = state.rest_offset_y();
            }
            was_resting
        };

        self.notify_inset();
        if compensated {
            self.notify_offset();
        }
    }

    fn adjusted_content_inset(&self) -> EdgeInsets {
        self.state.borrow().adjusted_content_inset()
    }

    fn inset_adjustment_behavior(&self) -> InsetAdjustmentBehavior {
        self.state.borrow().behavior
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        self.state.borrow().safe_area_insets
    }

    fn frame_guide(&self) -> Rect {
        let state = self.state.borrow();
        Rect {
            origin: state.content_offset,
            size: state.frame_size,
        }
    }

    fn content_guide(&self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self.state.borrow().content_size,
        }
    }

    fn observe_content_offset(&self, observer: OffsetObserver) -> ObserverId {
        self.register(Observer::Offset(observer))
    }

    fn observe_content_inset(&self, observer: InsetObserver) -> ObserverId {
        self.register(Observer::Inset(observer))
    }

    fn add_pan_handler(&self, handler: PanHandler) -> ObserverId {
        self.register(Observer::Pan(handler))
    }

    fn observe_teardown(&self, observer: TeardownObserver) -> ObserverId {
        self.register(Observer::Teardown(observer))
    }

    fn remove_observer(&self, id: ObserverId) {
        self.observers.borrow_mut().remove(id);
    }

    fn insert_control(&self, id: ControlId, anchor: ControlAnchor) {
        let mut state = self.state.borrow_mut();
        state.controls.retain(|(control, _)| *control != id);
        state.controls.push((id, anchor));
    }

    fn remove_control(&self, id: ControlId) {
        self.state
            .borrow_mut()
            .controls
            .retain(|(control, _)| *control != id);
    }

    fn set_control_anchor(&self, id: ControlId, anchor: ControlAnchor) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.controls.iter_mut().find(|(control, _)| *control == id) {
            entry.1 = anchor;
        }
    }

    fn send_control_to_back(&self, id: ControlId) {
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.controls.iter().position(|(control, _)| *control == id) {
            let entry = state.controls.remove(index);
            state.controls.insert(0, entry);
        }
    }
}
