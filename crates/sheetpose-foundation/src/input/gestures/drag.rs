//! Drag gesture recognizer.
//!
//! Phases are strictly ordered per touch: `Began`, any number of `Changed`,
//! then exactly one of `Ended` or `Cancelled`.

use sheetpose_ui_graphics::Point;

use crate::gesture_constants::DRAG_THRESHOLD;
use crate::input::delegate::{GestureDelegate, GestureKind, OtherGesture, RecognizerInfo};
use crate::input::types::{PointerEvent, PointerEventKind, PointerId};
use crate::input::velocity::VelocityTracker;

/// Cumulative translation since the press plus instantaneous velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragUpdate {
    pub translation: Point,
    /// Points per second.
    pub velocity: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Began(DragUpdate),
    Changed(DragUpdate),
    Ended(DragUpdate),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Possible,
    Tracking { pointer: PointerId, origin: Point },
    Dragging { pointer: PointerId, origin: Point },
    /// Recognition was refused; ignore the pointer until it lifts.
    Failed { pointer: PointerId },
}

#[derive(Clone, Debug)]
pub struct DragGesture {
    enabled: bool,
    state: DragState,
    velocity: VelocityTracker,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl DragGesture {
    pub fn new() -> Self {
        Self {
            enabled: true,
            state: DragState::Possible,
            velocity: VelocityTracker::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling an active recognizer cancels its gesture.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<DragEvent> {
        self.enabled = enabled;
        if enabled {
            return None;
        }
        let was_dragging = self.is_dragging();
        self.reset();
        was_dragging.then_some(DragEvent::Cancelled)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether a press is currently being followed, recognized or not yet.
    pub fn is_tracking(&self) -> bool {
        !matches!(self.state, DragState::Possible)
    }

    /// Feed one pointer event.
    ///
    /// Callers forward a `Down` only when it landed on the view the recognizer
    /// is attached to. `competing` describes a gesture that already owns the
    /// touch, if any; the delegate must then allow simultaneous recognition
    /// for the drag to begin.
    pub fn on_pointer_event(
        &mut self,
        event: &PointerEvent,
        delegate: &dyn GestureDelegate,
        competing: Option<&OtherGesture>,
    ) -> Option<DragEvent> {
        if !self.enabled {
            return None;
        }
        match (event.kind, self.state) {
            (PointerEventKind::Down, DragState::Possible) => {
                self.velocity.reset();
                self.velocity.add_position(event.uptime_nanos, event.position);
                self.state = DragState::Tracking {
                    pointer: event.id,
                    origin: event.position,
                };
                None
            }
            (PointerEventKind::Move, DragState::Tracking { pointer, origin })
                if pointer == event.id =>
            {
                self.velocity.add_position(event.uptime_nanos, event.position);
                let translation = event.position - origin;
                if translation.length() <= DRAG_THRESHOLD {
                    return None;
                }
                let info = RecognizerInfo {
                    kind: GestureKind::Drag,
                    translation,
                };
                let allowed = delegate.should_begin(&info)
                    && competing.map_or(true, |other| {
                        delegate.should_recognize_simultaneously(&info, other)
                    });
                if !allowed {
                    log::debug!("drag refused at translation {translation:?}");
                    self.state = DragState::Failed { pointer };
                    return None;
                }
                self.state = DragState::Dragging { pointer, origin };
                event.consume();
                Some(DragEvent::Began(self.update(translation)))
            }
            (PointerEventKind::Move, DragState::Dragging { pointer, origin })
                if pointer == event.id =>
            {
                self.velocity.add_position(event.uptime_nanos, event.position);
                event.consume();
                Some(DragEvent::Changed(self.update(event.position - origin)))
            }
            (PointerEventKind::Up, DragState::Dragging { pointer, origin })
                if pointer == event.id =>
            {
                self.velocity.add_position(event.uptime_nanos, event.position);
                event.consume();
                let update = self.update(event.position - origin);
                self.reset();
                Some(DragEvent::Ended(update))
            }
            (PointerEventKind::Cancel, DragState::Dragging { pointer, .. })
                if pointer == event.id =>
            {
                self.reset();
                Some(DragEvent::Cancelled)
            }
            (
                PointerEventKind::Up | PointerEventKind::Cancel,
                DragState::Tracking { pointer, .. } | DragState::Failed { pointer },
            ) if pointer == event.id => {
                self.reset();
                None
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = DragState::Possible;
        self.velocity.reset();
    }

    fn update(&self, translation: Point) -> DragUpdate {
        DragUpdate {
            translation,
            velocity: self.velocity.velocity(),
        }
    }
}
