//! Single-pointer drag tracking and release classification.

use crate::gesture_constants::{FLICK_MAX_DURATION_MILLIS, FLICK_MIN_DISTANCE};
use crate::layout::Layout;
use crate::velocity::VelocityRing;

/// One pointer event as seen by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub time_millis: u64,
    /// Simultaneous contacts reported with the event.
    pub contacts: u8,
    /// Pinch scale, when the host reports one.
    pub scale: Option<f32>,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, time_millis: u64) -> Self {
        Self {
            x,
            y,
            time_millis,
            contacts: 1,
            scale: None,
        }
    }

    pub fn with_contacts(mut self, contacts: u8) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn is_multi_contact(&self) -> bool {
        self.contacts > 1
    }

    fn is_pinch(&self) -> bool {
        self.scale.is_some_and(|scale| scale != 1.0)
    }
}

/// What the first move of a gesture said about the user's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollIntent {
    #[default]
    Unknown,
    Horizontal,
    Vertical,
}

/// Live state of one tracked gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub start_x: f32,
    pub start_y: f32,
    pub start_time: u64,
    pub delta_x: f32,
    pub delta_y: f32,
    pub intent: ScrollIntent,
    pub velocity: VelocityRing,
    pub last_sample_time: u64,
}

impl GestureState {
    fn begin(sample: &PointerSample) -> Self {
        Self {
            start_x: sample.x,
            start_y: sample.y,
            start_time: sample.time_millis,
            delta_x: 0.0,
            delta_y: 0.0,
            intent: ScrollIntent::Unknown,
            velocity: VelocityRing::new(),
            last_sample_time: sample.time_millis,
        }
    }
}

/// Result of feeding a move sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Not tracking, or the sample was multi-contact or a pinch.
    Ignored,
    /// Vertical gesture; the host keeps scrolling natively unless told not to.
    Scroll { suppress_native_scroll: bool },
    /// Horizontal drag by `delta_x` from the gesture origin.
    Drag { delta_x: f32 },
}

impl MoveOutcome {
    pub fn suppresses_native_scroll(&self) -> bool {
        match self {
            MoveOutcome::Ignored => false,
            MoveOutcome::Scroll {
                suppress_native_scroll,
            } => *suppress_native_scroll,
            MoveOutcome::Drag { .. } => true,
        }
    }
}

/// Carousel state needed to classify a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseContext {
    pub index: usize,
    pub layout: Layout,
    pub continuous: bool,
    /// Allow momentum even when only one page is visible.
    pub momentum_single_view: bool,
}

impl ReleaseContext {
    fn uses_momentum(&self) -> bool {
        self.layout.pages_per_view > 1 || self.momentum_single_view
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseKind {
    /// The gesture was a page scroll; nothing to do.
    Vertical,
    /// Return to the current index.
    SnapBack,
    /// Hand the averaged release velocity (px/ms) to the momentum simulator.
    Toss { velocity: f32 },
    /// Slide to `target`. Unresolved in continuous mode, so it may be out of
    /// range and needs wrapping.
    Step { target: isize },
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub kind: ReleaseKind,
    pub delta_x: f32,
    pub duration_millis: u64,
    /// The gesture moved far or fast enough that the click following it
    /// should be swallowed.
    pub suppress_click: bool,
}

/// Classifies a pointer stream into drags, page scrolls and releases.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: Option<GestureState>,
    disable_native_scroll: bool,
}

impl GestureTracker {
    pub fn new(disable_native_scroll: bool) -> Self {
        Self {
            state: None,
            disable_native_scroll,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&GestureState> {
        self.state.as_ref()
    }

    pub fn intent(&self) -> ScrollIntent {
        self.state
            .as_ref()
            .map_or(ScrollIntent::Unknown, |state| state.intent)
    }

    /// Begins tracking. Multi-contact samples are ignored and return `false`.
    pub fn on_start(&mut self, sample: PointerSample) -> bool {
        if sample.is_multi_contact() {
            log::trace!("ignoring multi-contact start ({} contacts)", sample.contacts);
            return false;
        }
        self.state = Some(GestureState::begin(&sample));
        true
    }

    pub fn on_move(&mut self, sample: PointerSample) -> MoveOutcome {
        let disable_native_scroll = self.disable_native_scroll;
        let Some(state) = self.state.as_mut() else {
            return MoveOutcome::Ignored;
        };
        if sample.is_multi_contact() || sample.is_pinch() {
            return MoveOutcome::Ignored;
        }

        let previous_delta = state.delta_x;
        state.delta_x = sample.x - state.start_x;
        state.delta_y = sample.y - state.start_y;

        let elapsed = sample.time_millis.saturating_sub(state.last_sample_time);
        state.last_sample_time = sample.time_millis;
        state
            .velocity
            .push(VelocityRing::sample_velocity(state.delta_x - previous_delta, elapsed));

        if state.intent == ScrollIntent::Unknown {
            state.intent = if state.delta_x.abs() < state.delta_y.abs() {
                ScrollIntent::Vertical
            } else {
                ScrollIntent::Horizontal
            };
            log::trace!("gesture classified as {:?}", state.intent);
        }

        match state.intent {
            ScrollIntent::Vertical => MoveOutcome::Scroll {
                suppress_native_scroll: disable_native_scroll,
            },
            _ => MoveOutcome::Drag {
                delta_x: state.delta_x,
            },
        }
    }

    /// Ends the gesture and decides what it means. `None` when not tracking.
    pub fn on_end(&mut self, time_millis: u64, context: &ReleaseContext) -> Option<Release> {
        let state = self.state.take()?;
        let duration_millis = time_millis.saturating_sub(state.start_time);
        let delta_x = state.delta_x;
        let abs_delta = delta_x.abs();
        let layout = &context.layout;

        if state.intent == ScrollIntent::Vertical {
            return Some(Release {
                kind: ReleaseKind::Vertical,
                delta_x,
                duration_millis,
                suppress_click: false,
            });
        }

        let is_valid_slide = (duration_millis < FLICK_MAX_DURATION_MILLIS
            && abs_delta > FLICK_MIN_DISTANCE)
            || abs_delta > layout.page_width / 2.0;

        let is_past_bounds = !context.continuous
            && ((context.index == 0 && delta_x > 0.0)
                || (context.index >= layout.max_index() && delta_x < 0.0));

        let kind = if !is_valid_slide || is_past_bounds {
            ReleaseKind::SnapBack
        } else if context.uses_momentum() {
            ReleaseKind::Toss {
                velocity: state.velocity.average(),
            }
        } else {
            let index = context.index as isize;
            let target = if layout.page_width > 0.0 && abs_delta > layout.page_width / 2.0 {
                index - (delta_x / layout.page_width).round() as isize
            } else if delta_x > 0.0 {
                index - 1
            } else {
                index + 1
            };
            let target = if context.continuous {
                target
            } else {
                layout.clamp_index(target) as isize
            };
            ReleaseKind::Step { target }
        };

        log::debug!(
            "release after {duration_millis}ms, dx {delta_x}: {kind:?} (valid {is_valid_slide}, past bounds {is_past_bounds})"
        );

        Some(Release {
            kind,
            delta_x,
            duration_millis,
            suppress_click: is_valid_slide,
        })
    }

    /// Drops the current gesture without classifying it.
    pub fn cancel(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
