//! Lifecycle of one presentation of a sheet.

use crate::config::SheetConfig;
use crate::error::SheetError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Presenting,
    Presented,
    /// The user is dragging; `percent` is the current dismissal progress.
    Dragging { percent: f32 },
    /// Dismissal is running to completion.
    Committing,
    /// A released drag is animating back to the presented position.
    Reverting,
    Dismissed,
}

impl SessionState {
    pub fn is_transitioning(&self) -> bool {
        matches!(
            self,
            SessionState::Presenting
                | SessionState::Dragging { .. }
                | SessionState::Committing
                | SessionState::Reverting
        )
    }
}

/// What started a dismissal. Only user-initiated dismissals notify the
/// sheet's dismiss listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissOrigin {
    Drag,
    OutsideTap,
    Programmatic,
}

impl DismissOrigin {
    pub fn is_user_initiated(&self) -> bool {
        !matches!(self, DismissOrigin::Programmatic)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentationSession {
    state: SessionState,
    pub can_dismiss_on_outside_tap: bool,
    pub pan_gesture_enabled: bool,
    content_extent: Option<f32>,
    origin: Option<DismissOrigin>,
}

impl PresentationSession {
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            state: SessionState::Idle,
            can_dismiss_on_outside_tap: config.can_dismiss_on_outside_tap,
            pan_gesture_enabled: config.pan_gesture_enabled,
            content_extent: None,
            origin: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sheet height captured when the current drag began.
    pub fn content_extent(&self) -> Option<f32> {
        self.content_extent
    }

    pub fn dismiss_origin(&self) -> Option<DismissOrigin> {
        self.origin
    }

    pub fn begin_presentation(&mut self) -> Result<(), SheetError> {
        match self.state {
            SessionState::Idle => {
                self.transition(SessionState::Presenting);
                Ok(())
            }
            state => Err(SheetError::TransitionInProgress { state }),
        }
    }

    pub fn did_present(&mut self) {
        debug_assert_eq!(self.state, SessionState::Presenting);
        self.transition(SessionState::Presented);
    }

    /// Starts a dismissal. A drag enters [`SessionState::Dragging`] at zero
    /// progress; every other origin commits straight away.
    pub fn begin_dismissal(&mut self, origin: DismissOrigin) -> Result<(), SheetError> {
        match self.state {
            SessionState::Presented => {}
            SessionState::Idle | SessionState::Dismissed => return Err(SheetError::NotPresented),
            state => return Err(SheetError::TransitionInProgress { state }),
        }
        self.origin = Some(origin);
        let next = match origin {
            DismissOrigin::Drag => SessionState::Dragging { percent: 0.0 },
            DismissOrigin::OutsideTap | DismissOrigin::Programmatic => SessionState::Committing,
        };
        self.transition(next);
        Ok(())
    }

    pub(crate) fn set_content_extent(&mut self, extent: f32) {
        self.content_extent = Some(extent);
    }

    pub fn drag_to(&mut self, percent: f32) {
        if let SessionState::Dragging { .. } = self.state {
            self.state = SessionState::Dragging { percent };
            log::trace!("dragging at {percent:.3}");
        }
    }

    pub fn commit(&mut self) {
        if let SessionState::Dragging { .. } = self.state {
            self.transition(SessionState::Committing);
        }
    }

    pub fn revert(&mut self) {
        if let SessionState::Dragging { .. } = self.state {
            self.transition(SessionState::Reverting);
        }
    }

    /// A cancelled dismissal leaves the sheet presented and forgets the origin.
    pub fn did_revert(&mut self) {
        self.origin = None;
        self.content_extent = None;
        self.transition(SessionState::Presented);
    }

    /// Returns the origin of the dismissal that just completed.
    pub fn did_dismiss(&mut self) -> Option<DismissOrigin> {
        self.content_extent = None;
        self.transition(SessionState::Dismissed);
        self.origin.take()
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("session {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented() -> PresentationSession {
        let mut session = PresentationSession::new(&SheetConfig::default());
        session.begin_presentation().expect("idle session presents");
        session.did_present();
        session
    }

    #[test]
    fn drag_walks_through_dragging_and_commit() {
        let mut session = presented();
        session.begin_dismissal(DismissOrigin::Drag).expect("presented");
        assert_eq!(session.state(), SessionState::Dragging { percent: 0.0 });
        session.drag_to(0.3);
        assert_eq!(session.state(), SessionState::Dragging { percent: 0.3 });
        session.commit();
        assert_eq!(session.state(), SessionState::Committing);
        assert_eq!(session.did_dismiss(), Some(DismissOrigin::Drag));
        assert_eq!(session.state(), SessionState::Dismissed);
    }

    #[test]
    fn revert_returns_to_presented_without_origin() {
        let mut session = presented();
        session.begin_dismissal(DismissOrigin::Drag).expect("presented");
        session.revert();
        assert_eq!(session.state(), SessionState::Reverting);
        session.did_revert();
        assert_eq!(session.state(), SessionState::Presented);
        assert_eq!(session.dismiss_origin(), None);
    }

    #[test]
    fn second_dismissal_is_rejected_while_one_runs() {
        let mut session = presented();
        session
            .begin_dismissal(DismissOrigin::OutsideTap)
            .expect("presented");
        assert_eq!(
            session.begin_dismissal(DismissOrigin::Programmatic),
            Err(SheetError::TransitionInProgress {
                state: SessionState::Committing
            })
        );
    }

    #[test]
    fn dismissal_before_presentation_is_rejected() {
        let mut session = PresentationSession::new(&SheetConfig::default());
        assert_eq!(
            session.begin_dismissal(DismissOrigin::Programmatic),
            Err(SheetError::NotPresented)
        );
    }

    #[test]
    fn drag_updates_are_ignored_outside_dragging() {
        let mut session = presented();
        session.drag_to(0.5);
        session.commit();
        assert_eq!(session.state(), SessionState::Presented);
    }

    #[test]
    fn only_gesture_origins_are_user_initiated() {
        assert!(DismissOrigin::Drag.is_user_initiated());
        assert!(DismissOrigin::OutsideTap.is_user_initiated());
        assert!(!DismissOrigin::Programmatic.is_user_initiated());
    }
}
