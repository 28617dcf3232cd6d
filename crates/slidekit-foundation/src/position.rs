//! Resting page offsets and the pass-through test used to decide which pages
//! animate during a transition.

use crate::layout::Layout;

/// Offset of `page` when the carousel rests at `index`.
///
/// At the last reachable index every page is shifted by the layout remainder
/// so the final page sits flush with the trailing edge.
pub fn resting_offset(page: usize, index: usize, layout: &Layout) -> f32 {
    let offset = (page as f32 - index as f32) * layout.page_width;
    if index == layout.max_index() {
        offset + layout.remainder()
    } else {
        offset
    }
}

pub fn resting_offsets(index: usize, layout: &Layout) -> Vec<f32> {
    (0..layout.total_pages)
        .map(|page| resting_offset(page, index, layout))
        .collect()
}

/// Whether `page` is on screen at any point while moving from `from` to `to`.
///
/// The origin is widened by one page against the drag direction so pages the
/// finger already uncovered keep animating, and a destination at the last
/// index is pulled back by one before the range test.
pub fn will_pass_through_viewport(
    page: usize,
    from: usize,
    to: usize,
    drag_delta: f32,
    layout: &Layout,
) -> bool {
    let page = page as isize;
    let mut from = from as isize;
    let mut to = to as isize;
    let per_view = layout.pages_per_view as isize;

    if (drag_delta > 0.0) == (from >= to) {
        from -= 1;
    } else if (drag_delta < 0.0) == (from < to) {
        from += 1;
    }

    if to == layout.max_index() as isize {
        to -= 1;
    }

    if from < to {
        page >= from && page <= to + per_view
    } else {
        page <= from + per_view && page >= to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PagesPerViewRounding;

    fn single_view(pages: usize) -> Layout {
        Layout::new(320.0, 320.0, pages, PagesPerViewRounding::Floor)
    }

    #[test]
    fn resting_offsets_step_by_page_width() {
        let layout = single_view(5);
        assert_eq!(resting_offsets(2, &layout), vec![-640.0, -320.0, 0.0, 320.0, 640.0]);
    }

    #[test]
    fn last_page_at_last_index_rests_at_zero() {
        let layout = single_view(5);
        assert_eq!(resting_offset(4, 4, &layout), 0.0);
    }

    #[test]
    fn last_index_adds_the_remainder() {
        let layout = Layout::new(700.0, 320.0, 5, PagesPerViewRounding::Floor);
        assert_eq!(layout.max_index(), 3);
        assert_eq!(resting_offset(4, 3, &layout), 380.0);
        assert_eq!(resting_offset(4, 2, &layout), 640.0);
    }

    #[test]
    fn forward_transition_covers_origin_through_destination() {
        let layout = single_view(10);
        let passing: Vec<usize> = (0..10)
            .filter(|&page| will_pass_through_viewport(page, 2, 5, 0.0, &layout))
            .collect();
        assert_eq!(passing, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn backward_transition_covers_destination_through_origin() {
        let layout = single_view(10);
        let passing: Vec<usize> = (0..10)
            .filter(|&page| will_pass_through_viewport(page, 5, 3, 0.0, &layout))
            .collect();
        assert_eq!(passing, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn drag_direction_widens_the_origin() {
        let layout = single_view(10);
        // Dragged left towards the next page: the page behind stays in play.
        assert!(will_pass_through_viewport(3, 4, 5, -30.0, &layout));
        assert!(!will_pass_through_viewport(2, 4, 5, -30.0, &layout));
    }

    #[test]
    fn far_pages_are_skipped() {
        let layout = single_view(10);
        assert!(!will_pass_through_viewport(9, 1, 2, 0.0, &layout));
        assert!(!will_pass_through_viewport(0, 5, 6, 0.0, &layout));
    }
}
