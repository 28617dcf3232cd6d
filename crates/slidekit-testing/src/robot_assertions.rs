//! Assertion utilities for robot tests.

use slidekit::Placement;

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that two offset lists match element by element.
pub fn assert_offsets_approx_eq(actual: &[f32], expected: &[f32], tolerance: f32, msg: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: offset count differs ({:?} vs {:?})",
        msg,
        actual,
        expected
    );
    for (page, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        assert_approx_eq(*actual, *expected, tolerance, &format!("{} - page {}", msg, page));
    }
}

/// Assert that a placement jumps (no animation) to `offset`.
pub fn assert_immediate_at(placement: Option<Placement>, offset: f32, msg: &str) {
    let Some(placement) = placement else {
        panic!("{}: page was never placed", msg);
    };
    assert!(
        !placement.is_animated(),
        "{}: expected an immediate placement, got {:?}",
        msg,
        placement
    );
    assert_approx_eq(placement.offset, offset, 0.01, msg);
}
