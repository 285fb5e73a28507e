//! Arbitration seam between recognizers.

use sheetpose_ui_graphics::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Tap,
}

/// Snapshot of a recognizer at the moment it asks to begin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecognizerInfo {
    pub kind: GestureKind,
    /// Movement since the press, in host coordinates.
    pub translation: Point,
}

/// A gesture already owned by someone other than the asking recognizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OtherGesture {
    /// Pan of a nested scrollable region, with its current content offset.
    NestedScroll { content_offset: Point },
    Unknown,
}

/// Decides which recognizer may begin and which may run together.
pub trait GestureDelegate {
    fn should_begin(&self, recognizer: &RecognizerInfo) -> bool {
        let _ = recognizer;
        true
    }

    fn should_recognize_simultaneously(
        &self,
        recognizer: &RecognizerInfo,
        other: &OtherGesture,
    ) -> bool {
        let _ = (recognizer, other);
        false
    }
}

/// Delegate that allows everything to begin and nothing to run together.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultGestureDelegate;

impl GestureDelegate for DefaultGestureDelegate {}
