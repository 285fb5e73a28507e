use sheetpose_ui_graphics::Point;
use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer event with consumption tracking for gesture disambiguation.
///
/// A recognizer that claims a touch consumes the event so that ordinary view
/// interaction underneath does not also react to it.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub phase: PointerPhase,
    /// Position in host coordinates.
    pub position: Point,
    /// Monotonic event timestamp.
    pub uptime_nanos: u64,
    /// Shared via Rc<Cell> so consumption can be tracked across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            id: 0,
            kind,
            phase: match kind {
                PointerEventKind::Down => PointerPhase::Start,
                PointerEventKind::Move => PointerPhase::Move,
                PointerEventKind::Up => PointerPhase::End,
                PointerEventKind::Cancel => PointerPhase::Cancel,
            },
            position,
            uptime_nanos: 0,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(position: Point, uptime_nanos: u64) -> Self {
        Self::new(PointerEventKind::Down, position).at(uptime_nanos)
    }

    pub fn moved(position: Point, uptime_nanos: u64) -> Self {
        Self::new(PointerEventKind::Move, position).at(uptime_nanos)
    }

    pub fn up(position: Point, uptime_nanos: u64) -> Self {
        Self::new(PointerEventKind::Up, position).at(uptime_nanos)
    }

    pub fn cancel(position: Point, uptime_nanos: u64) -> Self {
        Self::new(PointerEventKind::Cancel, position).at(uptime_nanos)
    }

    /// Set the event timestamp.
    pub fn at(mut self, uptime_nanos: u64) -> Self {
        self.uptime_nanos = uptime_nanos;
        self
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    /// Mark this event as consumed, preventing other handlers from processing it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    /// Check if this event has been consumed by another handler.
    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}
