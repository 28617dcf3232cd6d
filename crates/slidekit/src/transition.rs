//! Settle transitions between two resting indices.

use smallvec::SmallVec;

use slidekit_animation::{FrameTween, Lerp, TweenSpec};
use slidekit_core::{FrameClock, RuntimeHandle, TaskHandle};

use crate::surface::Placement;

/// One page travelling from `from` to `to` during a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMove {
    pub page: usize,
    pub from: f32,
    pub to: f32,
}

impl PageMove {
    pub fn at(&self, progress: f32) -> Placement {
        Placement::immediate(self.page, self.from.lerp(&self.to, progress))
    }
}

pub type PageMoves = SmallVec<[PageMove; 8]>;

/// An in-flight transition. Dropping it cancels the pending settle.
pub(crate) enum Transition {
    /// The surface animates natively; a timer marks the end.
    Timer(TaskHandle),
    /// Offsets are interpolated here, one placement per page per frame.
    Tween { tween: FrameTween, moves: PageMoves },
}

impl Transition {
    pub(crate) fn timer(
        runtime: &RuntimeHandle,
        duration_millis: u32,
        on_settle: impl FnOnce() + 'static,
    ) -> Self {
        let handle = runtime.schedule_timer(u64::from(duration_millis), move |_| on_settle());
        Transition::Timer(handle)
    }

    /// Tweens `moves` with the ease-out curve native transitions use.
    pub(crate) fn tween(
        clock: FrameClock,
        duration_millis: u32,
        moves: PageMoves,
        on_frame: impl Fn(&[Placement]) + 'static,
        on_settle: impl FnOnce() + 'static,
    ) -> Self {
        let frame_moves = moves.clone();
        let spec = TweenSpec::new(u64::from(duration_millis));
        let tween = FrameTween::start(
            clock,
            spec,
            move |progress| {
                let placements: SmallVec<[Placement; 8]> =
                    frame_moves.iter().map(|page_move| page_move.at(progress)).collect();
                on_frame(&placements);
            },
            on_settle,
        );
        Transition::Tween { tween, moves }
    }

    /// Stops the transition. A tween reports the placements that put its
    /// pages at their destinations so the caller can jump there.
    pub(crate) fn cancel(self) -> SmallVec<[Placement; 8]> {
        match self {
            Transition::Timer(handle) => {
                handle.cancel();
                SmallVec::new()
            }
            Transition::Tween { tween, moves } => {
                tween.cancel();
                moves.iter().map(|page_move| page_move.at(1.0)).collect()
            }
        }
    }
}
