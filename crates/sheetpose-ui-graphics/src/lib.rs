//! Pure math/data for geometry & colors in Sheetpose
//!
//! This crate contains the geometry primitives and color definitions that the
//! gesture and transition crates share.

mod color;
mod geometry;

pub use color::*;
pub use geometry::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{EdgeInsets, GraphicsLayer, Point, Rect, Size};
}
