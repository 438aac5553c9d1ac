//! Assertion utilities for robot testing

use slidepanel::PanelFrame;

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64, msg: &str) {
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

/// Assert that every numeric field of a presentation frame matches.
pub fn assert_frame_approx_eq(actual: PanelFrame, expected: PanelFrame, tolerance: f64, msg: &str) {
    assert_approx_eq(actual.position, expected.position, tolerance, &format!("{} - position", msg));
    assert_approx_eq(actual.height, expected.height, tolerance, &format!("{} - height", msg));
    assert_approx_eq(
        actual.backdrop_opacity,
        expected.backdrop_opacity,
        tolerance,
        &format!("{} - backdrop_opacity", msg),
    );
    assert_approx_eq(
        actual.collapsed_opacity,
        expected.collapsed_opacity,
        tolerance,
        &format!("{} - collapsed_opacity", msg),
    );
    assert_approx_eq(
        actual.parallax_translation,
        expected.parallax_translation,
        tolerance,
        &format!("{} - parallax_translation", msg),
    );
    assert_eq!(actual.visible, expected.visible, "{} - visible", msg);
}
