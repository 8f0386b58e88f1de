//! Arrow and ring progress indicator
//!
//! A ring fills as the user pulls. Once refreshing begins the arrow turns
//! upside down while the ring closes, then the arrow fades out and a short
//! arc spins around the ring until refreshing ends.
//!
//! This is a model only: the demo prints its frames instead of drawing them.

use std::cell::RefCell;
use std::f32::consts::{PI, TAU};
use std::rc::Rc;

use pullkit_animation::{Easing, Tween};
use pullkit_control::RefreshIndicator;
use pullkit_core::Progress;

pub const INDICATOR_HEIGHT: f32 = 60.0;

const TURN_MS: u32 = 200;
const FADE_MS: u32 = 100;
const SPIN_PERIOD_SECS: f32 = 1.0;

/// What the indicator would draw this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowFrame {
    pub ring_visible: bool,
    pub ring_stroke_end: f32,
    pub spinner_visible: bool,
    /// Radians
    pub spinner_rotation: f32,
    /// Radians
    pub arrow_rotation: f32,
    pub arrow_opacity: f32,
}

impl Default for ArrowFrame {
    fn default() -> Self {
        Self {
            ring_visible: false,
            ring_stroke_end: 0.0,
            spinner_visible: false,
            spinner_rotation: 0.0,
            arrow_rotation: 0.0,
            arrow_opacity: 1.0,
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Turning { arrow: Tween, ring: Tween },
    Fading { opacity: Tween },
    Spinning,
}

#[derive(Debug)]
struct ArrowState {
    frame: ArrowFrame,
    phase: Phase,
}

/// Shared handle to the arrow indicator
///
/// The control owns one handle; the host keeps a clone to tick and draw it.
#[derive(Clone)]
pub struct ArrowProgressIndicator {
    state: Rc<RefCell<ArrowState>>,
}

impl ArrowProgressIndicator {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ArrowState {
                frame: ArrowFrame::default(),
                phase: Phase::Idle,
            })),
        }
    }

    pub fn frame(&self) -> ArrowFrame {
        self.state.borrow().frame
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self.state.borrow().phase, Phase::Idle)
    }

    /// Advance the refreshing animation by `dt` seconds
    ///
    /// Returns true while animating.
    pub fn tick(&self, dt: f32) -> bool {
        let dt_ms = dt * 1000.0;
        let mut state = self.state.borrow_mut();
        let ArrowState { frame, phase } = &mut *state;

        match phase {
            Phase::Idle => return false,
            Phase::Turning { arrow, ring } => {
                arrow.tick(dt_ms);
                ring.tick(dt_ms);
                frame.arrow_rotation = arrow.value();
                frame.ring_stroke_end = ring.value();
                if arrow.is_finished() && ring.is_finished() {
                    frame.spinner_visible = true;
                    *phase = Phase::Fading {
                        opacity: Tween::new(frame.arrow_opacity, 0.0, FADE_MS, Easing::Linear),
                    };
                }
            }
            Phase::Fading { opacity } => {
                opacity.tick(dt_ms);
                frame.arrow_opacity = opacity.value();
                frame.spinner_rotation = spin(frame.spinner_rotation, dt);
                if opacity.is_finished() {
                    *phase = Phase::Spinning;
                }
            }
            Phase::Spinning => {
                frame.spinner_rotation = spin(frame.spinner_rotation, dt);
            }
        }
        true
    }

    fn set_progress(&self, progress: f32) {
        let mut state = self.state.borrow_mut();
        state.frame.ring_visible = true;
        state.frame.ring_stroke_end = progress;
    }

    fn start_animating(&self) {
        let mut state = self.state.borrow_mut();
        if !matches!(state.phase, Phase::Idle) {
            return;
        }
        let ring_from = state.frame.ring_stroke_end;
        state.phase = Phase::Turning {
            arrow: Tween::new(0.0, PI, TURN_MS, Easing::Linear),
            ring: Tween::new(ring_from, 1.0, TURN_MS, Easing::Linear),
        };
    }

    fn stop_animating(&self) {
        let mut state = self.state.borrow_mut();
        if matches!(state.phase, Phase::Idle) {
            return;
        }
        state.phase = Phase::Idle;
        state.frame.spinner_visible = false;
        state.frame.spinner_rotation = 0.0;
        state.frame.arrow_rotation = 0.0;
        state.frame.arrow_opacity = 1.0;
    }
}

impl Default for ArrowProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshIndicator for ArrowProgressIndicator {
    fn will_refresh(&mut self) {
        self.set_progress(Progress::MAX);
        self.start_animating();
    }

    fn did_refresh(&mut self) {
        self.set_progress(Progress::MIN);
        self.stop_animating();
    }

    fn did_scroll(&mut self, progress: Progress) {
        self.set_progress(progress.value());
    }

    fn height(&self) -> f32 {
        INDICATOR_HEIGHT
    }
}

fn spin(rotation: f32, dt: f32) -> f32 {
    (rotation + dt * TAU / SPIN_PERIOD_SECS) % TAU
}
