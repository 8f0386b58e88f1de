//! Control placement
//!
//! The control never runs a layout engine itself. It describes where it
//! wants to sit as a [`ControlAnchor`] and the host's layout system applies
//! it. [`ControlAnchor::resolve`] gives the resulting frame for hosts without
//! a constraint solver.
//!
//! - `Layout::Top`: control top pinned to the visible frame top, pushed down
//!   by the origin inset (plus the safe area unless adjustment is `Never`).
//! - `Layout::Bottom`: control bottom pinned to the top of the content, so it
//!   scrolls with the content and is uncovered only by pulling past rest.
//!
//! In both layouts the control spans the visible frame horizontally.

use pullkit_core::{Layout, Rect};

use crate::container::InsetAdjustmentBehavior;

/// Vertical edge of a view or layout guide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorEdge {
    Top,
    Bottom,
}

/// Layout guide exposed by a scroll container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutGuide {
    /// The visible frame; stays put while content scrolls
    Frame,
    /// The content bounds; moves with the content
    Content,
}

/// `control.edge == guide.guide_edge + constant`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlAnchor {
    pub edge: AnchorEdge,
    pub guide: LayoutGuide,
    pub guide_edge: AnchorEdge,
    pub constant: f32,
}

impl ControlAnchor {
    pub fn for_layout(layout: Layout, top_constant: f32) -> Self {
        match layout {
            Layout::Top => Self {
                edge: AnchorEdge::Top,
                guide: LayoutGuide::Frame,
                guide_edge: AnchorEdge::Top,
                constant: top_constant,
            },
            Layout::Bottom => Self {
                edge: AnchorEdge::Bottom,
                guide: LayoutGuide::Content,
                guide_edge: AnchorEdge::Top,
                constant: 0.0,
            },
        }
    }

    /// Frame of a control of `height` given the container's guides
    pub fn resolve(&self, frame_guide: Rect, content_guide: Rect, height: f32) -> Rect {
        let guide = match self.guide {
            LayoutGuide::Frame => frame_guide,
            LayoutGuide::Content => content_guide,
        };
        let guide_y = match self.guide_edge {
            AnchorEdge::Top => guide.min_y(),
            AnchorEdge::Bottom => guide.max_y(),
        };
        let y = match self.edge {
            AnchorEdge::Top => guide_y + self.constant,
            AnchorEdge::Bottom => guide_y + self.constant - height,
        };
        Rect::new(frame_guide.min_x(), y, frame_guide.width(), height)
    }
}

/// Top constant for `Layout::Top`, recomputed on every layout pass
pub fn top_constant(
    behavior: InsetAdjustmentBehavior,
    safe_area_top: f32,
    origin_inset_top: f32,
) -> f32 {
    if behavior.includes_safe_area_top() {
        safe_area_top + origin_inset_top
    } else {
        origin_inset_top
    }
}
