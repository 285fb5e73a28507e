//! Interactive bottom-sheet transitions for Sheetpose
//!
//! A [`ModalHost`] presents one [`BottomSheet`] at a time. Presentation
//! slides the sheet's content up from below while the background dims.
//! Dismissal runs the reverse, either on the clock (programmatic dismissal or
//! a tap outside the content) or scrubbed by a downward drag that finishes
//! or snaps back when released.

mod animator;
mod config;
mod context;
mod coordinator;
mod delegate;
mod error;
mod host;
mod interactive;
pub mod layout;
mod session;
mod sheet;
mod surface;

pub use animator::{PresentationAnimator, SheetAnimation, SheetFrame, TimedTransition};
pub use config::*;
pub use context::{TransitionContext, TransitionKind};
pub use coordinator::{drag_percent, should_commit, DragSample, GestureCoordinator, ScrollRegionId};
pub use delegate::TransitionDelegate;
pub use error::{ConfigError, SheetError};
pub use host::ModalHost;
pub use interactive::{InteractivePhase, InteractiveTransition};
pub use session::{DismissOrigin, PresentationSession, SessionState};
pub use sheet::BottomSheet;
pub use surface::{shared, BottomSheetSurface, PlainSurface, SharedSurface, SheetSurface, View};

pub mod prelude {
    pub use crate::config::SheetConfig;
    pub use crate::host::ModalHost;
    pub use crate::session::SessionState;
    pub use crate::sheet::BottomSheet;
    pub use crate::surface::{BottomSheetSurface, SheetSurface};
}
