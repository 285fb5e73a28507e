//! Vends animators and, for drag-driven dismissals, the interaction
//! controller to the host.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::animator::PresentationAnimator;
use crate::interactive::InteractiveTransition;

/// Holds a non-owning link to the controller of the drag in progress. The
/// gesture coordinator owns the controller; this side can only observe it.
#[derive(Default)]
pub struct TransitionDelegate {
    interaction: RefCell<Weak<InteractiveTransition>>,
}

impl TransitionDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animation_controller_for_presented(&self) -> PresentationAnimator {
        PresentationAnimator::new(true, false)
    }

    pub fn animation_controller_for_dismissed(&self) -> PresentationAnimator {
        PresentationAnimator::new(false, self.interaction_controller().is_some())
    }

    pub fn interaction_controller_for_presentation(
        &self,
        _animator: &PresentationAnimator,
    ) -> Option<Rc<InteractiveTransition>> {
        None
    }

    /// The live drag controller, if this dismissal is drag driven.
    pub fn interaction_controller_for_dismissal(
        &self,
        animator: &PresentationAnimator,
    ) -> Option<Rc<InteractiveTransition>> {
        if animator.is_presenting() || !animator.is_interactive() {
            return None;
        }
        self.interaction_controller()
    }

    pub(crate) fn set_interaction_controller(&self, controller: Option<&Rc<InteractiveTransition>>) {
        *self.interaction.borrow_mut() = controller.map_or_else(Weak::new, Rc::downgrade);
    }

    fn interaction_controller(&self) -> Option<Rc<InteractiveTransition>> {
        self.interaction.borrow().upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetpose_animation::{AnimationType, FrameClock, SpringSpec};

    #[test]
    fn presentation_is_never_interactive() {
        let delegate = TransitionDelegate::new();
        let animator = delegate.animation_controller_for_presented();
        assert!(animator.is_presenting());
        assert!(delegate
            .interaction_controller_for_presentation(&animator)
            .is_none());
    }

    #[test]
    fn dismissal_is_interactive_only_while_a_drag_owns_a_controller() {
        let delegate = TransitionDelegate::new();
        let animator = delegate.animation_controller_for_dismissed();
        assert!(!animator.is_interactive());
        assert!(delegate.interaction_controller_for_dismissal(&animator).is_none());

        let controller = InteractiveTransition::new(
            FrameClock::new(),
            1.0,
            AnimationType::Spring(SpringSpec::default()),
        );
        delegate.set_interaction_controller(Some(&controller));
        let animator = delegate.animation_controller_for_dismissed();
        assert!(animator.is_interactive());
        let vended = delegate.interaction_controller_for_dismissal(&animator);
        assert!(vended.is_some_and(|vended| Rc::ptr_eq(&vended, &controller)));
    }

    #[test]
    fn dropped_controller_is_not_vended() {
        let delegate = TransitionDelegate::new();
        let controller = InteractiveTransition::new(
            FrameClock::new(),
            1.0,
            AnimationType::Spring(SpringSpec::default()),
        );
        delegate.set_interaction_controller(Some(&controller));
        drop(controller);
        assert!(!delegate.animation_controller_for_dismissed().is_interactive());
    }
}
