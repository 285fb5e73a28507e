//! Release velocity estimation.

use smallvec::SmallVec;
use sheetpose_ui_graphics::Point;

use crate::gesture_constants::{MAX_DRAG_VELOCITY, VELOCITY_WINDOW_MILLIS};

#[derive(Clone, Copy, Debug)]
struct VelocitySample {
    uptime_nanos: u64,
    position: Point,
}

/// Tracks recent pointer positions and estimates velocity over a short
/// trailing window.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: SmallVec<[VelocitySample; 16]>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, uptime_nanos: u64, position: Point) {
        if let Some(last) = self.samples.last() {
            if uptime_nanos < last.uptime_nanos {
                // Out-of-order timestamps mean a new stream.
                self.samples.clear();
            }
        }
        self.samples.push(VelocitySample {
            uptime_nanos,
            position,
        });
        let window_start = uptime_nanos.saturating_sub(VELOCITY_WINDOW_MILLIS * 1_000_000);
        self.samples
            .retain(|sample| sample.uptime_nanos >= window_start);
    }

    /// Velocity in points per second, clamped to [`MAX_DRAG_VELOCITY`] on each axis.
    pub fn velocity(&self) -> Point {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return Point::ZERO;
        };
        let dt_nanos = last.uptime_nanos.saturating_sub(first.uptime_nanos);
        if dt_nanos == 0 {
            return Point::ZERO;
        }
        let seconds = dt_nanos as f32 / 1_000_000_000.0;
        let delta = last.position - first.position;
        Point::new(
            (delta.x / seconds).clamp(-MAX_DRAG_VELOCITY, MAX_DRAG_VELOCITY),
            (delta.y / seconds).clamp(-MAX_DRAG_VELOCITY, MAX_DRAG_VELOCITY),
        )
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, Point::new(0.0, 10.0));
        assert_eq!(tracker.velocity(), Point::ZERO);
    }

    #[test]
    fn steady_motion_reports_points_per_second() {
        let mut tracker = VelocityTracker::new();
        for i in 0..5u64 {
            tracker.add_position(i * 10 * MS, Point::new(0.0, i as f32 * 10.0));
        }
        let velocity = tracker.velocity();
        assert!((velocity.y - 1000.0).abs() < 0.5, "got {velocity:?}");
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn old_samples_fall_out_of_window() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, Point::new(0.0, 0.0));
        tracker.add_position(10 * MS, Point::new(0.0, 300.0));
        // A long pause, then the finger rests.
        tracker.add_position(500 * MS, Point::new(0.0, 300.0));
        tracker.add_position(520 * MS, Point::new(0.0, 300.0));
        assert_eq!(tracker.velocity().y, 0.0);
    }

    #[test]
    fn velocity_is_clamped() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, Point::new(0.0, 0.0));
        tracker.add_position(MS, Point::new(0.0, 500.0));
        assert_eq!(tracker.velocity().y, MAX_DRAG_VELOCITY);
    }
}
