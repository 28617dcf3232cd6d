//! Rubber-band behaviour past the first and last page.

use smallvec::SmallVec;

use crate::layout::Layout;

/// Per-page offsets for one frame. Inline for typical carousel sizes.
pub type FrameOffsets = SmallVec<[f32; 8]>;

/// Signed distance a drag of `x` pushes past the ends of the carousel.
///
/// Positive when the first page leaves a gap at the leading edge, negative
/// when the last page no longer fills the trailing edge, zero otherwise.
pub fn overshoot(x: f32, positions: &[f32], layout: &Layout) -> f32 {
    let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
        return 0.0;
    };
    let remainder = layout.remainder();
    let first = x + first;
    let last = x + last + remainder;

    if first > 0.0 {
        first
    } else if last < layout.viewport_width - layout.page_width - remainder {
        last - layout.page_width * (layout.pages_per_view as f32 - 1.0)
    } else {
        0.0
    }
}

/// Share of an overshoot that the drag does not translate into movement.
pub fn resistance(overshoot: f32) -> f32 {
    overshoot / 2.0
}

/// Visible displacement for a given overshoot.
pub fn damped_displacement(overshoot: f32) -> f32 {
    overshoot - resistance(overshoot)
}

/// Offsets of every page for a drag of `x` from `positions`.
///
/// Pages beyond the visible band are parked just offscreen. The band is
/// widened by one viewport on the overshooting side so pages springing back
/// do not overlap.
pub fn frame_offsets(x: f32, positions: &[f32], layout: &Layout) -> FrameOffsets {
    let overshoot = overshoot(x, positions, layout);
    let mut left_boundary = -layout.page_width;
    let mut right_boundary = layout.viewport_width;
    let mut x = x;

    if overshoot < 0.0 {
        left_boundary -= layout.viewport_width;
        x -= resistance(overshoot);
    } else if overshoot > 0.0 {
        right_boundary += layout.viewport_width;
        x -= resistance(overshoot);
    }

    positions
        .iter()
        .map(|position| {
            let location = x + position;
            if location < left_boundary {
                -layout.page_width
            } else if location > right_boundary {
                layout.viewport_width
            } else {
                location
            }
        })
        .collect()
}
