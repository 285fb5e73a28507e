//! Shared gesture constants for consistent touch/pointer handling.
//!
//! Values are in logical points. The drag and tap recognizers use the same
//! threshold so there is no movement range where neither of them claims the
//! touch.

/// Drag threshold in logical points.
///
/// Once the pointer moves further than this from the press position:
/// - the drag recognizer may begin
/// - the tap recognizer fails (no tap fires on release)
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Maximum reported drag velocity in logical points per second.
pub const MAX_DRAG_VELOCITY: f32 = 8_000.0;

/// Only samples this recent contribute to the release velocity.
pub const VELOCITY_WINDOW_MILLIS: u64 = 100;
