//! Pull-to-refresh control
//!
//! `RefreshControl` watches a [`ScrollContainer`]'s offset, inset, and pan
//! gesture, turns the pull distance into a [`Progress`], and runs the
//! refresh lifecycle on its [`RefreshIndicator`].
//!
//! # Inset ownership
//!
//! While idle the control only observes: every inset change made by other
//! code (keyboard avoidance, bars appearing) is snapshotted as the origin
//! inset. While refreshing the control owns the inset and offset and ignores
//! both notifications. The origin snapshot never includes the space the
//! control adds for itself, so restoring it cannot drift.
//!
//! # Ending
//!
//! `end_refreshing()` restores the origin inset at once and starts a short
//! transition that slides the content back to rest. The control reports
//! `is_refreshing() == true` until the host has ticked that transition to
//! completion with [`RefreshControl::tick`]. If the user grabs the content
//! mid-transition the offset track is dropped so the control never fights
//! the user's scroll.
//!
//! # Example
//!
//! ```ignore
//! let control = RefreshControl::new(MyIndicator::new(), Configuration::default());
//! control.on_value_changed(|control| {
//!     start_loading(control.clone());
//! });
//! control.add_to(&scroll_view);
//!
//! // Later, when loading finishes
//! control.end_refreshing();
//!
//! // Every frame
//! control.tick(dt);
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use pullkit_animation::{Easing, TrackId, Transition, TransitionStatus};
use pullkit_core::{
    refresh_events, Configuration, ControlEvent, EdgeInsets, GesturePhase, Layout, Progress,
    Rect, RefreshState, StateTransitions, TriggerEvent,
};
use smallvec::SmallVec;

use crate::anchor::{top_constant, ControlAnchor};
use crate::container::{ControlId, ObserverId, ScrollContainer, ScrollMetrics};
use crate::indicator::RefreshIndicator;

/// Duration of the end-of-refresh transition
pub const END_TRANSITION_MS: u32 = 200;

/// Handler for control action events
pub type ActionHandler = Rc<dyn Fn(&RefreshControl)>;

// ============================================================================
// Internal State
// ============================================================================

struct Attachment {
    container: Weak<dyn ScrollContainer>,
    /// Container inset excluding anything the control added
    origin_inset: EdgeInsets,
    observers: SmallVec<[ObserverId; 4]>,
}

struct EndTransition {
    transition: Transition,
    translation: Option<TrackId>,
    offset: Option<TrackId>,
}

struct ControlCore {
    configuration: Configuration,
    state: RefreshState,
    progress: Progress,
    /// Height of the control, taken from the indicator when it is set
    height: f32,
    is_hidden: bool,
    translation_y: f32,
    top_constant: f32,
    attachment: Option<Attachment>,
    ending: Option<EndTransition>,
}

impl ControlCore {
    fn container(&self) -> Option<Rc<dyn ScrollContainer>> {
        self.attachment
            .as_ref()
            .and_then(|attachment| attachment.container.upgrade())
    }

    fn origin_inset(&self) -> Option<EdgeInsets> {
        self.attachment
            .as_ref()
            .map(|attachment| attachment.origin_inset)
    }

    fn anchor(&self) -> ControlAnchor {
        ControlAnchor::for_layout(self.configuration.layout, self.top_constant)
    }

    fn apply_event(&mut self, event: u32) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                tracing::debug!(from = ?self.state, to = ?next, "Refresh state transition");
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Reveal the control. Returns true if it was hidden.
    fn reveal(&mut self) -> bool {
        std::mem::replace(&mut self.is_hidden, false)
    }
}

struct Shared {
    id: ControlId,
    core: RefCell<ControlCore>,
    indicator: RefCell<Box<dyn RefreshIndicator>>,
    actions: RefCell<Vec<ActionHandler>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(attachment) = self.core.get_mut().attachment.take() {
            if let Some(container) = attachment.container.upgrade() {
                for id in attachment.observers {
                    container.remove_observer(id);
                }
                container.remove_control(self.id);
            }
        }
    }
}

// ============================================================================
// Refresh Control
// ============================================================================

/// A pull-to-refresh control
///
/// Cloning yields another handle to the same control. Containers only hold
/// weak references to it.
#[derive(Clone)]
pub struct RefreshControl {
    shared: Rc<Shared>,
}

impl RefreshControl {
    /// Create a hidden, idle control
    pub fn new(indicator: impl RefreshIndicator + 'static, configuration: Configuration) -> Self {
        Self::with_indicator(Box::new(indicator), configuration)
    }

    pub fn with_indicator(indicator: Box<dyn RefreshIndicator>, configuration: Configuration) -> Self {
        let height = indicator.height();
        Self {
            shared: Rc::new(Shared {
                id: ControlId::next(),
                core: RefCell::new(ControlCore {
                    configuration,
                    state: RefreshState::Idle,
                    progress: Progress::default(),
                    height,
                    is_hidden: true,
                    translation_y: 0.0,
                    top_constant: 0.0,
                    attachment: None,
                    ending: None,
                }),
                indicator: RefCell::new(indicator),
                actions: RefCell::new(Vec::new()),
            }),
        }
    }

    fn core(&self) -> Ref<'_, ControlCore> {
        self.shared.core.borrow()
    }

    fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    fn from_weak(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn id(&self) -> ControlId {
        self.shared.id
    }

    pub fn is_refreshing(&self) -> bool {
        self.core().state.is_refreshing()
    }

    pub fn state(&self) -> RefreshState {
        self.core().state
    }

    pub fn progress(&self) -> Progress {
        self.core().progress
    }

    pub fn configuration(&self) -> Configuration {
        self.core().configuration
    }

    pub fn is_hidden(&self) -> bool {
        self.core().is_hidden
    }

    /// Vertical translation applied on top of the anchored frame
    pub fn translation_y(&self) -> f32 {
        self.core().translation_y
    }

    pub fn height(&self) -> f32 {
        self.core().height
    }

    /// Whether the end-of-refresh transition is running
    pub fn is_ending(&self) -> bool {
        self.core().ending.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.core().container().is_some()
    }

    /// The container's inset as of the last snapshot, without the control's own expansion
    pub fn origin_content_inset(&self) -> Option<EdgeInsets> {
        self.core().origin_inset()
    }

    pub fn anchor(&self) -> ControlAnchor {
        self.core().anchor()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Register a handler called whenever refreshing begins
    ///
    /// Handlers run after the control entered the refreshing state and may
    /// call back into the control, including `end_refreshing()`.
    pub fn on_value_changed<F>(&self, handler: F)
    where
        F: Fn(&RefreshControl) + 'static,
    {
        self.add_action(Rc::new(handler));
    }

    pub fn add_action(&self, handler: ActionHandler) {
        self.shared.actions.borrow_mut().push(handler);
    }

    fn send_actions(&self, event: ControlEvent) {
        let handlers: Vec<ActionHandler> = self.shared.actions.borrow().clone();
        tracing::debug!(?event, handlers = handlers.len(), "Sending control actions");
        for handler in handlers {
            handler(self);
        }
    }

    // =========================================================================
    // Indicator
    // =========================================================================

    /// Replace the indicator, returning the previous one
    ///
    /// The control takes the new indicator's height.
    pub fn set_indicator(&self, indicator: Box<dyn RefreshIndicator>) -> Box<dyn RefreshIndicator> {
        let height = indicator.height();
        let previous = self.shared.indicator.replace(indicator);
        self.shared.core.borrow_mut().height = height;
        previous
    }

    fn notify_indicator<R>(&self, f: impl FnOnce(&mut dyn RefreshIndicator) -> R) -> R {
        let mut indicator = self.shared.indicator.borrow_mut();
        f(&mut **indicator)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Enter the refreshing state. No-op while already refreshing.
    pub fn begin_refreshing(&self) {
        let (container, revealed) = {
            let mut core = self.shared.core.borrow_mut();
            if !core.apply_event(refresh_events::BEGIN) {
                return;
            }
            let revealed = core.reveal();
            core.progress.set(Progress::MAX);
            (core.container(), revealed)
        };

        if let (Some(container), true) = (container, revealed) {
            container.send_control_to_back(self.id());
        }

        self.notify_indicator(|indicator| indicator.will_refresh());
        self.send_actions(ControlEvent::ValueChanged);
    }

    /// Leave the refreshing state
    ///
    /// Restores the origin inset while keeping the content where it is, then
    /// starts the end transition. No-op while idle or already ending.
    pub fn end_refreshing(&self) {
        let container = {
            let mut core = self.shared.core.borrow_mut();
            if !core.state.is_refreshing() || core.ending.is_some() {
                return;
            }
            core.progress.set(Progress::MIN);
            core.container()
        };

        self.notify_indicator(|indicator| indicator.did_refresh());

        let Some(container) = container else {
            self.complete_end();
            return;
        };

        let (origin_top, layout) = {
            let core = self.core();
            (
                core.origin_inset().map_or(0.0, |inset| inset.top),
                core.configuration.layout,
            )
        };

        let previous_offset_y = container.content_offset().y;
        container.set_content_inset_top(origin_top);
        container.set_content_offset_y(previous_offset_y);

        let next_offset_y = -container.adjusted_content_inset().top;

        let mut transition = Transition::new(END_TRANSITION_MS, Easing::EaseOut);
        let mut translation = None;
        let mut translation_y = 0.0;
        if layout == Layout::Top {
            translation_y = (previous_offset_y - next_offset_y).min(0.0);
            translation = Some(transition.add_track(translation_y, 0.0));
        }
        // Only slide back if the content is still pulled past rest
        let offset = (previous_offset_y < next_offset_y)
            .then(|| transition.add_track(previous_offset_y, next_offset_y));

        tracing::debug!(
            previous_offset_y,
            next_offset_y,
            translation_y,
            animates_offset = offset.is_some(),
            "Ending refresh"
        );

        let mut core = self.shared.core.borrow_mut();
        core.translation_y = translation_y;
        core.ending = Some(EndTransition {
            transition,
            translation,
            offset,
        });
    }

    /// Advance the end transition by `dt` seconds
    ///
    /// Returns true while the transition is still running.
    pub fn tick(&self, dt: f32) -> bool {
        let (status, offset_y, container) = {
            let mut core = self.shared.core.borrow_mut();
            let Some(ending) = core.ending.as_mut() else {
                return false;
            };
            let status = ending.transition.tick(dt);
            let translation_y = ending
                .translation
                .and_then(|track| ending.transition.value(track));
            let offset_y = ending
                .offset
                .and_then(|track| ending.transition.value(track));
            if let Some(translation_y) = translation_y {
                core.translation_y = translation_y;
            }
            (status, offset_y, core.container())
        };

        if let (Some(container), Some(offset_y)) = (container, offset_y) {
            container.set_content_offset_y(offset_y);
        }

        match status {
            TransitionStatus::Running => true,
            TransitionStatus::Completed | TransitionStatus::Finished => {
                self.complete_end();
                false
            }
        }
    }

    fn complete_end(&self) {
        let mut core = self.shared.core.borrow_mut();
        core.ending = None;
        core.is_hidden = true;
        core.translation_y = 0.0;
        core.apply_event(refresh_events::END_COMPLETE);
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Attach to a container
    ///
    /// Snapshots the container's inset, starts observing it, installs the
    /// pan handler, and inserts the control as a child. A control attached
    /// elsewhere is detached first.
    pub fn add_to<C>(&self, container: &Rc<C>)
    where
        C: ScrollContainer + 'static,
    {
        let container: Rc<dyn ScrollContainer> = container.clone();

        let current = self.core().container();
        if let Some(current) = current {
            if Rc::ptr_eq(&current, &container) {
                tracing::debug!(control = ?self.id(), "Already attached to this container");
                return;
            }
            tracing::warn!(
                control = ?self.id(),
                "Refresh control is attached to another container, detaching first"
            );
            self.remove_from_container();
        }

        let weak = self.downgrade();
        let mut observers: SmallVec<[ObserverId; 4]> = SmallVec::new();

        observers.push(container.observe_content_inset(Rc::new({
            let weak = weak.clone();
            move |metrics: &ScrollMetrics| {
                if let Some(control) = RefreshControl::from_weak(&weak) {
                    control.handle_inset_changed(metrics);
                }
            }
        })));

        observers.push(container.observe_content_offset(Rc::new({
            let weak = weak.clone();
            move |metrics: &ScrollMetrics| {
                if let Some(control) = RefreshControl::from_weak(&weak) {
                    control.handle_offset_changed(metrics);
                }
            }
        })));

        observers.push(container.add_pan_handler(Rc::new({
            let weak = weak.clone();
            move |phase: GesturePhase| {
                if let Some(control) = RefreshControl::from_weak(&weak) {
                    control.handle_pan(phase);
                }
            }
        })));

        observers.push(container.observe_teardown(Rc::new(move || {
            if let Some(control) = RefreshControl::from_weak(&weak) {
                control.handle_container_teardown();
            }
        })));

        let origin_inset = container.content_inset();
        let anchor = {
            let mut core = self.shared.core.borrow_mut();
            core.attachment = Some(Attachment {
                container: Rc::downgrade(&container),
                origin_inset,
                observers,
            });
            core.anchor()
        };

        container.insert_control(self.id(), anchor);
        self.layout();

        tracing::debug!(control = ?self.id(), origin_top = origin_inset.top, "Attached refresh control");
    }

    /// Detach from the current container. No-op when not attached.
    ///
    /// Puts back the origin inset while keeping the content offset, so
    /// removing the control never leaves its expansion behind.
    pub fn remove_from_container(&self) {
        let attachment = {
            let mut core = self.shared.core.borrow_mut();
            let Some(attachment) = core.attachment.take() else {
                return;
            };
            attachment
        };

        if self.is_ending() {
            self.complete_end();
        }

        let Some(container) = attachment.container.upgrade() else {
            return;
        };

        for id in attachment.observers {
            container.remove_observer(id);
        }
        container.remove_control(self.id());

        let previous_offset_y = container.content_offset().y;
        container.set_content_inset_top(attachment.origin_inset.top);
        container.set_content_offset_y(previous_offset_y);

        tracing::debug!(control = ?self.id(), "Detached refresh control");
    }

    /// Recompute the anchor and frame
    ///
    /// Call from the host's layout pass. A changed top constant is pushed to
    /// the container. Returns the control frame in the container's content
    /// coordinates, or None when detached.
    pub fn layout(&self) -> Option<Rect> {
        let container = self.core().container()?;

        let (frame, moved) = {
            let mut core = self.shared.core.borrow_mut();
            let mut moved = None;
            if core.configuration.layout == Layout::Top {
                let origin_top = core.origin_inset().map_or(0.0, |inset| inset.top);
                let constant = top_constant(
                    container.inset_adjustment_behavior(),
                    container.safe_area_insets().top,
                    origin_top,
                );
                if constant != core.top_constant {
                    core.top_constant = constant;
                    moved = Some(core.anchor());
                }
            }

            let mut frame = core.anchor().resolve(
                container.frame_guide(),
                container.content_guide(),
                core.height,
            );
            frame.origin.y += core.translation_y;
            (frame, moved)
        };

        if let Some(anchor) = moved {
            tracing::trace!(constant = anchor.constant, "Moved control anchor");
            container.set_control_anchor(self.id(), anchor);
        }
        Some(frame)
    }

    // =========================================================================
    // Container notifications
    // =========================================================================

    fn handle_offset_changed(&self, metrics: &ScrollMetrics) {
        let (progress, reveal_in) = {
            let mut core = self.shared.core.borrow_mut();
            if core.state.is_refreshing() {
                return;
            }

            let content_offset_y = metrics.resting_offset_y();
            if content_offset_y >= 0.0 {
                core.is_hidden = true;
                return;
            }

            let revealed = core.reveal();
            let indicator_height = self.shared.indicator.borrow().height();
            let trigger_height = core.configuration.trigger.resolved_height(indicator_height);
            core.progress = Progress::from_pull(content_offset_y, trigger_height);

            tracing::trace!(content_offset_y, trigger_height, progress = %core.progress, "Pull progress");
            let reveal_in = if revealed { core.container() } else { None };
            (core.progress, reveal_in)
        };

        if let Some(container) = reveal_in {
            container.send_control_to_back(self.id());
        }
        self.notify_indicator(|indicator| indicator.did_scroll(progress));
    }

    fn handle_inset_changed(&self, metrics: &ScrollMetrics) {
        let mut core = self.shared.core.borrow_mut();
        if core.state.is_refreshing() {
            return;
        }
        if let Some(attachment) = core.attachment.as_mut() {
            attachment.origin_inset = metrics.content_inset;
        }
    }

    fn handle_pan(&self, phase: GesturePhase) {
        let (should_refresh, should_expand) = {
            let mut core = self.shared.core.borrow_mut();

            if let Some(ending) = core.ending.as_mut() {
                // The user grabbed the content again: stop sliding it back
                if phase == GesturePhase::Began {
                    if let Some(track) = ending.offset.take() {
                        ending.transition.cancel_track(track);
                        tracing::debug!("Pan began during end transition, releasing offset");
                    }
                }
                return;
            }

            let refreshing = core.state.is_refreshing();
            let complete = core.progress.is_complete();

            match core.configuration.trigger.event {
                TriggerEvent::Dragging => {
                    let should_refresh = !refreshing && phase == GesturePhase::Changed && complete;
                    let not_expanded = match (core.container(), core.origin_inset()) {
                        (Some(container), Some(origin)) => {
                            container.content_inset().top == origin.top
                        }
                        _ => false,
                    };
                    let should_expand = refreshing && phase == GesturePhase::Ended && not_expanded;
                    (should_refresh, should_expand)
                }
                TriggerEvent::Released => {
                    let should_refresh = !refreshing && phase == GesturePhase::Ended && complete;
                    (should_refresh, should_refresh)
                }
            }
        };

        if should_refresh {
            tracing::debug!(?phase, "Pull reached trigger height");
            self.begin_refreshing();
        }

        if should_expand {
            self.expand_content_inset_top();
        }
    }

    fn handle_container_teardown(&self) {
        let had_attachment = self.shared.core.borrow_mut().attachment.take().is_some();
        if self.is_ending() {
            self.complete_end();
        }
        if had_attachment {
            tracing::debug!(control = ?self.id(), "Container torn down, dropping attachment");
        }
    }

    /// Reserve room for the control above the content, keeping the offset
    fn expand_content_inset_top(&self) {
        let (container, top) = {
            let core = self.core();
            // A synchronous action handler may already have ended the refresh
            if !core.state.is_refreshing() || core.ending.is_some() {
                return;
            }
            let (Some(container), Some(origin)) = (core.container(), core.origin_inset()) else {
                return;
            };
            (container, origin.top + core.height)
        };

        let previous_offset_y = container.content_offset().y;
        container.set_content_inset_top(top);
        container.set_content_offset_y(previous_offset_y);

        tracing::debug!(inset_top = top, "Expanded content inset for refresh control");
    }
}

impl fmt::Debug for RefreshControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core();
        f.debug_struct("RefreshControl")
            .field("id", &self.shared.id)
            .field("state", &core.state)
            .field("progress", &core.progress.value())
            .field("is_hidden", &core.is_hidden)
            .field("attached", &core.attachment.is_some())
            .finish()
    }
}
