pub mod delegate;
pub mod gestures;
pub mod types;
pub mod velocity;
