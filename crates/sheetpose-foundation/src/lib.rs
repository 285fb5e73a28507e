//! Pointer input and gesture recognition for Sheetpose
//!
//! Recognizers are plain state machines: they consume [`PointerEvent`]s and
//! report phase events back to the caller. Arbitration between recognizers is
//! delegated to a [`GestureDelegate`].

pub mod gesture_constants;
pub mod input;

pub use input::delegate::{
    DefaultGestureDelegate, GestureDelegate, GestureKind, OtherGesture, RecognizerInfo,
};
pub use input::gestures::{DragEvent, DragGesture, DragUpdate, TapGesture};
pub use input::types::{PointerEvent, PointerEventKind, PointerId, PointerPhase};
pub use input::velocity::VelocityTracker;

pub mod prelude {
    pub use crate::input::delegate::{GestureDelegate, GestureKind, OtherGesture, RecognizerInfo};
    pub use crate::input::gestures::{DragEvent, DragGesture, DragUpdate, TapGesture};
    pub use crate::input::types::{PointerEvent, PointerEventKind, PointerId, PointerPhase};
}
