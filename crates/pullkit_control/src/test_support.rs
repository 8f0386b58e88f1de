//! Test helpers shared by the control tests

use std::cell::RefCell;
use std::rc::Rc;

use pullkit_core::Progress;

use crate::indicator::RefreshIndicator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndicatorCall {
    WillRefresh,
    DidRefresh,
    DidScroll(f32),
}

/// Indicator that records every call. Clones share the same log.
#[derive(Clone)]
pub struct RecordingIndicator {
    height: f32,
    calls: Rc<RefCell<Vec<IndicatorCall>>>,
}

impl RecordingIndicator {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<IndicatorCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: IndicatorCall) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn progress_history(&self) -> Vec<f32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                IndicatorCall::DidScroll(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<f32> {
        self.progress_history().last().copied()
    }
}

impl RefreshIndicator for RecordingIndicator {
    fn will_refresh(&mut self) {
        self.calls.borrow_mut().push(IndicatorCall::WillRefresh);
    }

    fn did_refresh(&mut self) {
        self.calls.borrow_mut().push(IndicatorCall::DidRefresh);
    }

    fn did_scroll(&mut self, progress: Progress) {
        self.calls
            .borrow_mut()
            .push(IndicatorCall::DidScroll(progress.value()));
    }

    fn height(&self) -> f32 {
        self.height
    }
}
