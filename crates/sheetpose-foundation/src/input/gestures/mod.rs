pub mod drag;
pub mod tap;

pub use drag::{DragEvent, DragGesture, DragUpdate};
pub use tap::TapGesture;
