use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sheetpose_ui_graphics::Rect;

use crate::surface::SharedSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Presentation,
    Dismissal,
}

type CompletionHandler = Box<dyn FnOnce(bool)>;

/// Everything an animator needs for one transition, plus the handle that
/// reports its outcome back to the host.
pub struct TransitionContext {
    kind: TransitionKind,
    surface: SharedSurface,
    container_bounds: Rect,
    interactive: bool,
    cancelled: Cell<bool>,
    completion: RefCell<Option<CompletionHandler>>,
}

impl TransitionContext {
    pub fn new(
        kind: TransitionKind,
        surface: SharedSurface,
        container_bounds: Rect,
        interactive: bool,
        completion: impl FnOnce(bool) + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            kind,
            surface,
            container_bounds,
            interactive,
            cancelled: Cell::new(false),
            completion: RefCell::new(Some(Box::new(completion))),
        })
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn is_presenting(&self) -> bool {
        self.kind == TransitionKind::Presentation
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn container_bounds(&self) -> Rect {
        self.container_bounds
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn transition_was_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Marks the transition as cancelled. The animator still reports
    /// completion once its motion has settled.
    pub fn cancel_interactive_transition(&self) {
        self.cancelled.set(true);
    }

    /// Reports the outcome. Only the first call reaches the host.
    pub fn complete_transition(&self, did_complete: bool) {
        let completion = self.completion.borrow_mut().take();
        match completion {
            Some(completion) => {
                log::debug!("{:?} transition complete: {did_complete}", self.kind);
                completion(did_complete);
            }
            None => log::warn!("{:?} transition completed twice", self.kind),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion.borrow().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{shared, SheetSurface};

    #[test]
    fn completion_fires_once() {
        let calls = Rc::new(Cell::new(0));
        let observed = Rc::clone(&calls);
        let context = TransitionContext::new(
            TransitionKind::Dismissal,
            shared(SheetSurface::new("sheet", 300.0)),
            Rect::default(),
            false,
            move |completed| {
                assert!(completed);
                observed.set(observed.get() + 1);
            },
        );

        context.complete_transition(true);
        context.complete_transition(true);
        assert_eq!(calls.get(), 1);
        assert!(context.is_completed());
    }
}
