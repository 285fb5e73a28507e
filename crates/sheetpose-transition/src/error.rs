use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("completion speed must be a positive finite number, got {0}")]
    InvalidCompletionSpeed(f32),
    #[error("top inset must be a non-negative finite number, got {0}")]
    InvalidTopInset(f32),
    #[error("{field} has a component outside 0.0..=1.0")]
    InvalidColor { field: &'static str },
}

/// Host API misuse. Gesture races never surface here; they are ignored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetError {
    #[error("a sheet is already presented by this host")]
    AlreadyPresenting,
    #[error("no sheet is presented")]
    NotPresented,
    #[error("sheet is in state {state:?}, a transition is already running")]
    TransitionInProgress { state: SessionState },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
