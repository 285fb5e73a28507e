//! Animation system for Sheetpose
//!
//! Provides the frame clock that drives every motion, easing curves, tween
//! and spring specifications, and the frame-driven [`Animatable`].

mod animation;
mod frame_clock;

pub use animation::*;
pub use frame_clock::*;
