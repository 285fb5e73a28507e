//! Assertion utilities for sheet tests
//!
//! Positions and colors come out of frame-stepped animations, so most
//! comparisons allow a tolerance.

use sheetpose_transition::BottomSheet;
use sheetpose_ui_graphics::{Color, Rect};

/// Assert that a value is within an expected range.
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

/// Assert that a rectangle is approximately equal to another.
pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

pub fn assert_color_approx_eq(actual: Color, expected: Color, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.r(), expected.r(), tolerance, &format!("{} - red", msg));
    assert_approx_eq(actual.g(), expected.g(), tolerance, &format!("{} - green", msg));
    assert_approx_eq(actual.b(), expected.b(), tolerance, &format!("{} - blue", msg));
    assert_approx_eq(actual.a(), expected.a(), tolerance, &format!("{} - alpha", msg));
}

/// Vertical translation currently applied to the sheet's content.
pub fn content_translation(sheet: &BottomSheet) -> f32 {
    let surface = sheet.surface();
    let surface = surface.borrow();
    match surface.content_view() {
        Some(content) => content.layer.translation_y,
        None => panic!("{} has no content view", surface.name()),
    }
}

pub fn container_background(sheet: &BottomSheet) -> Color {
    sheet.surface().borrow().container().background
}

pub fn assert_content_translation(sheet: &BottomSheet, expected: f32, msg: &str) {
    assert_approx_eq(content_translation(sheet), expected, 0.5, msg);
}
