//! Tap gesture recognizer.

use sheetpose_ui_graphics::Point;

use crate::gesture_constants::DRAG_THRESHOLD;
use crate::input::types::{PointerEvent, PointerEventKind, PointerId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapGesture {
    enabled: bool,
    /// When false, a recognized tap leaves the release event unconsumed so
    /// regular view interaction still sees it.
    cancels_touches_in_view: bool,
    pressed: Option<(PointerId, Point)>,
}

impl Default for TapGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl TapGesture {
    pub fn new() -> Self {
        Self {
            enabled: true,
            cancels_touches_in_view: true,
            pressed: None,
        }
    }

    pub fn with_cancels_touches_in_view(mut self, cancels: bool) -> Self {
        self.cancels_touches_in_view = cancels;
        self
    }

    pub fn cancels_touches_in_view(&self) -> bool {
        self.cancels_touches_in_view
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Returns the tap location when a press is released within the drag
    /// threshold of where it started.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> Option<Point> {
        if !self.enabled {
            return None;
        }
        match event.kind {
            PointerEventKind::Down => {
                if self.pressed.is_none() {
                    self.pressed = Some((event.id, event.position));
                }
                None
            }
            PointerEventKind::Move => {
                if let Some((pointer, origin)) = self.pressed {
                    if pointer == event.id && (event.position - origin).length() > DRAG_THRESHOLD {
                        self.pressed = None;
                    }
                }
                None
            }
            PointerEventKind::Up => {
                let (pointer, origin) = self.pressed?;
                if pointer != event.id {
                    return None;
                }
                self.pressed = None;
                if event.is_consumed() || (event.position - origin).length() > DRAG_THRESHOLD {
                    return None;
                }
                if self.cancels_touches_in_view {
                    event.consume();
                }
                Some(event.position)
            }
            PointerEventKind::Cancel => {
                self.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn press_and_release_in_place_is_a_tap() {
        let mut tap = TapGesture::new();
        tap.on_pointer_event(&PointerEvent::down(Point::new(10.0, 10.0), 0));
        let up = PointerEvent::up(Point::new(12.0, 11.0), 50 * MS);
        assert_eq!(tap.on_pointer_event(&up), Some(Point::new(12.0, 11.0)));
        assert!(up.is_consumed());
    }

    #[test]
    fn non_cancelling_tap_leaves_event_unconsumed() {
        let mut tap = TapGesture::new().with_cancels_touches_in_view(false);
        tap.on_pointer_event(&PointerEvent::down(Point::new(10.0, 10.0), 0));
        let up = PointerEvent::up(Point::new(10.0, 10.0), 50 * MS);
        assert!(tap.on_pointer_event(&up).is_some());
        assert!(!up.is_consumed());
    }

    #[test]
    fn movement_beyond_threshold_fails_the_tap() {
        let mut tap = TapGesture::new();
        tap.on_pointer_event(&PointerEvent::down(Point::new(10.0, 10.0), 0));
        tap.on_pointer_event(&PointerEvent::moved(Point::new(10.0, 40.0), 16 * MS));
        let up = PointerEvent::up(Point::new(10.0, 10.0), 32 * MS);
        assert_eq!(tap.on_pointer_event(&up), None);
    }

    #[test]
    fn consumed_release_is_not_a_tap() {
        let mut tap = TapGesture::new();
        tap.on_pointer_event(&PointerEvent::down(Point::new(10.0, 10.0), 0));
        let up = PointerEvent::up(Point::new(10.0, 10.0), 32 * MS);
        up.consume();
        assert_eq!(tap.on_pointer_event(&up), None);
    }
}
