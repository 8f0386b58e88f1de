//! Control binding
//!
//! `RefreshControlling` keeps one refresh control bound to one container and
//! remembers the application's action handlers, so the indicator can be
//! swapped without the application rewiring anything.

use std::rc::Rc;

use pullkit_core::Configuration;

use crate::container::ScrollContainer;
use crate::control::{ActionHandler, RefreshControl};
use crate::indicator::RefreshIndicator;

/// A refresh control bound to a container
pub struct RefreshControlling<C: ScrollContainer + 'static> {
    container: Rc<C>,
    control: RefreshControl,
    actions: Vec<ActionHandler>,
}

impl<C: ScrollContainer + 'static> RefreshControlling<C> {
    /// Create a control and attach it to `container`
    pub fn new(
        container: Rc<C>,
        indicator: impl RefreshIndicator + 'static,
        configuration: Configuration,
    ) -> Self {
        let control = RefreshControl::new(indicator, configuration);
        control.add_to(&container);
        Self {
            container,
            control,
            actions: Vec::new(),
        }
    }

    pub fn container(&self) -> &Rc<C> {
        &self.container
    }

    pub fn control(&self) -> &RefreshControl {
        &self.control
    }

    /// Move the control to another container
    ///
    /// The previous container gets its inset back before the new one is
    /// observed.
    pub fn bind(&mut self, container: Rc<C>) {
        if Rc::ptr_eq(&self.container, &container) {
            return;
        }
        self.control.remove_from_container();
        self.container = container;
        self.control.add_to(&self.container);
        tracing::debug!(control = ?self.control.id(), "Rebound refresh control");
    }

    /// Register a handler called whenever refreshing begins
    ///
    /// Handlers survive indicator swaps.
    pub fn on_value_changed<F>(&mut self, handler: F)
    where
        F: Fn(&RefreshControl) + 'static,
    {
        let handler: ActionHandler = Rc::new(handler);
        self.control.add_action(Rc::clone(&handler));
        self.actions.push(handler);
    }

    /// Replace the control with a new one using `indicator` and `configuration`
    ///
    /// Detach, construction, and attach run back to back, so no container
    /// notification can reach a half-swapped binding. Returns the previous
    /// control, already detached.
    pub fn set_indicator(
        &mut self,
        indicator: impl RefreshIndicator + 'static,
        configuration: Configuration,
    ) -> RefreshControl {
        let control = RefreshControl::new(indicator, configuration);
        for handler in &self.actions {
            control.add_action(Rc::clone(handler));
        }

        self.control.remove_from_container();
        control.add_to(&self.container);

        tracing::debug!(
            previous = ?self.control.id(),
            control = ?control.id(),
            "Swapped refresh indicator"
        );
        std::mem::replace(&mut self.control, control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll_view::ScrollView;
    use crate::test_support::{IndicatorCall, RecordingIndicator};
    use pullkit_core::{EdgeInsets, Layout, Size, Trigger};
    use std::cell::Cell;

    fn scroll_view(inset_top: f32) -> Rc<ScrollView> {
        Rc::new(
            ScrollView::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0))
                .with_content_inset(EdgeInsets::top(inset_top)),
        )
    }

    #[test]
    fn test_new_attaches() {
        let view = scroll_view(0.0);
        let controlling =
            RefreshControlling::new(Rc::clone(&view), RecordingIndicator::new(60.0), Configuration::default());

        assert!(controlling.control().is_attached());
        assert_eq!(view.controls(), vec![controlling.control().id()]);
        assert!(Rc::ptr_eq(controlling.container(), &view));
    }

    #[test]
    fn test_bind_moves_control() {
        let first = scroll_view(10.0);
        let second = scroll_view(30.0);
        let mut controlling =
            RefreshControlling::new(Rc::clone(&first), RecordingIndicator::new(60.0), Configuration::default());

        controlling.control().begin_refreshing();
        first.begin_pan();
        first.end_pan();
        assert_eq!(first.content_inset().top, 70.0);

        controlling.bind(Rc::clone(&second));
        assert_eq!(first.content_inset().top, 10.0);
        assert!(first.controls().is_empty());
        assert_eq!(first.observer_count(), 0);
        assert_eq!(second.controls(), vec![controlling.control().id()]);
        assert_eq!(
            controlling.control().origin_content_inset(),
            Some(EdgeInsets::top(30.0))
        );

        // Binding the same container again changes nothing
        controlling.bind(Rc::clone(&second));
        assert_eq!(second.observer_count(), 4);
    }

    #[test]
    fn test_actions_forwarded() {
        let view = scroll_view(0.0);
        let mut controlling = RefreshControlling::new(
            Rc::clone(&view),
            RecordingIndicator::new(60.0),
            Configuration::new(Layout::Top, Trigger::released().with_height(80.0)),
        );

        let refreshes = Rc::new(Cell::new(0));
        controlling.on_value_changed({
            let refreshes = Rc::clone(&refreshes);
            move |control| {
                assert!(control.is_refreshing());
                refreshes.set(refreshes.get() + 1);
            }
        });

        view.begin_pan();
        view.pan_to(-90.0);
        view.end_pan();
        assert_eq!(refreshes.get(), 1);
    }

    #[test]
    fn test_set_indicator_swaps_atomically() {
        let view = scroll_view(20.0);
        let old_indicator = RecordingIndicator::new(60.0);
        let mut controlling =
            RefreshControlling::new(Rc::clone(&view), old_indicator.clone(), Configuration::default());

        let refreshes = Rc::new(Cell::new(0));
        controlling.on_value_changed({
            let refreshes = Rc::clone(&refreshes);
            move |_| refreshes.set(refreshes.get() + 1)
        });

        controlling.control().begin_refreshing();
        view.begin_pan();
        view.end_pan();
        assert_eq!(view.content_inset().top, 80.0);

        let new_indicator = RecordingIndicator::new(100.0);
        let previous = controlling.set_indicator(
            new_indicator.clone(),
            Configuration::new(Layout::Top, Trigger::released().with_height(50.0)),
        );

        // Old control fully detached, container restored
        assert!(!previous.is_attached());
        assert_eq!(view.content_inset().top, 20.0);
        assert_eq!(view.observer_count(), 4);
        assert_eq!(view.controls(), vec![controlling.control().id()]);
        assert_eq!(controlling.control().height(), 100.0);

        view.set_content_offset_y(-20.0);
        view.begin_pan();
        view.pan_to(-70.0);
        view.end_pan();

        assert!(controlling.control().is_refreshing());
        assert_eq!(new_indicator.count(IndicatorCall::WillRefresh), 1);
        assert_eq!(old_indicator.count(IndicatorCall::WillRefresh), 1);
        assert!(old_indicator.progress_history().is_empty());
        assert_eq!(refreshes.get(), 2);
        assert_eq!(view.content_inset().top, 120.0);
    }
}
