//! The modal host: presents one sheet at a time and runs its transitions.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use sheetpose_animation::FrameClock;
use sheetpose_foundation::PointerEvent;
use sheetpose_ui_graphics::Rect;
use web_time::Instant;

use crate::animator::{PresentationAnimator, TimedTransition};
use crate::context::{TransitionContext, TransitionKind};
use crate::error::SheetError;
use crate::interactive::InteractiveTransition;
use crate::session::DismissOrigin;
use crate::sheet::BottomSheet;

type DismissCompletion = Box<dyn FnOnce()>;

enum RunningTransition {
    Timed(TimedTransition),
    Interactive(Rc<InteractiveTransition>),
}

pub(crate) struct HostInner {
    clock: FrameClock,
    bounds: Cell<Rect>,
    epoch: Instant,
    presented: RefCell<Option<BottomSheet>>,
    running: RefCell<Option<RunningTransition>>,
    dismiss_completion: RefCell<Option<DismissCompletion>>,
}

/// Cheap to clone; clones drive the same host.
#[derive(Clone)]
pub struct ModalHost {
    inner: Rc<HostInner>,
}

impl ModalHost {
    pub fn new(bounds: Rect) -> Self {
        Self::with_clock(bounds, FrameClock::new())
    }

    pub fn with_clock(bounds: Rect, clock: FrameClock) -> Self {
        Self {
            inner: Rc::new(HostInner {
                clock,
                bounds: Cell::new(bounds),
                epoch: Instant::now(),
                presented: RefCell::new(None),
                running: RefCell::new(None),
                dismiss_completion: RefCell::new(None),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<HostInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<HostInner> {
        Rc::downgrade(&self.inner)
    }

    pub fn clock(&self) -> FrameClock {
        self.inner.clock.clone()
    }

    pub fn bounds(&self) -> Rect {
        self.inner.bounds.get()
    }

    /// Takes effect for the next presentation.
    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.bounds.set(bounds);
    }

    pub fn presented_sheet(&self) -> Option<BottomSheet> {
        self.inner.presented.borrow().clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.running.borrow().is_some()
    }

    /// Linear progress of the running transition, if any.
    pub fn transition_progress(&self) -> Option<f32> {
        self.inner
            .running
            .borrow()
            .as_ref()
            .map(|running| match running {
                RunningTransition::Timed(timed) => timed.progress(),
                RunningTransition::Interactive(controller) => controller.percent_complete(),
            })
    }

    /// Presents `sheet` on the clock.
    ///
    /// # Panics
    ///
    /// Panics if the sheet's surface has no content view.
    pub fn present(&self, sheet: &BottomSheet) -> Result<(), SheetError> {
        if self.inner.presented.borrow().is_some() {
            return Err(SheetError::AlreadyPresenting);
        }
        sheet.attach(self)?;
        *self.inner.presented.borrow_mut() = Some(sheet.clone());

        let config = sheet.config();
        sheet.surface().borrow_mut().layout(self.bounds(), &config);
        log::info!("presenting {sheet:?}");

        let delegate = sheet.delegate();
        let animator = delegate.animation_controller_for_presented();
        let interaction = delegate.interaction_controller_for_presentation(&animator);
        self.start_transition(sheet, TransitionKind::Presentation, animator, interaction);
        Ok(())
    }

    /// Dismisses the presented sheet on the clock. The sheet's user dismiss
    /// listener is not called.
    pub fn dismiss(&self) -> Result<(), SheetError> {
        self.begin_dismissal(DismissOrigin::Programmatic, None)
    }

    /// Like [`ModalHost::dismiss`], calling `completion` once the sheet is gone.
    pub fn dismiss_with(&self, completion: impl FnOnce() + 'static) -> Result<(), SheetError> {
        self.begin_dismissal(DismissOrigin::Programmatic, Some(Box::new(completion)))
    }

    pub(crate) fn begin_dismissal(
        &self,
        origin: DismissOrigin,
        completion: Option<DismissCompletion>,
    ) -> Result<(), SheetError> {
        let sheet = self.presented_sheet().ok_or(SheetError::NotPresented)?;
        if self.is_transitioning() {
            return Err(SheetError::TransitionInProgress {
                state: sheet.state(),
            });
        }
        sheet.begin_dismissal(origin)?;
        *self.inner.dismiss_completion.borrow_mut() = completion;
        log::info!("dismissing {sheet:?} ({origin:?})");

        let delegate = sheet.delegate();
        let animator = delegate.animation_controller_for_dismissed();
        let interaction = delegate.interaction_controller_for_dismissal(&animator);
        if origin == DismissOrigin::Drag && interaction.is_none() {
            log::warn!("drag dismissal has no interaction controller, running on the clock");
        }
        self.start_transition(&sheet, TransitionKind::Dismissal, animator, interaction);
        Ok(())
    }

    fn start_transition(
        &self,
        sheet: &BottomSheet,
        kind: TransitionKind,
        animator: PresentationAnimator,
        interaction: Option<Rc<InteractiveTransition>>,
    ) {
        let host = self.downgrade();
        let context = TransitionContext::new(
            kind,
            sheet.surface(),
            self.bounds(),
            interaction.is_some(),
            move |completed| {
                if let Some(inner) = host.upgrade() {
                    ModalHost::from_inner(inner).transition_completed(kind, completed);
                }
            },
        );
        let animation = animator.animate_transition(&context);
        let running = match interaction {
            Some(controller) => {
                controller.start_interactive_transition(animation);
                RunningTransition::Interactive(controller)
            }
            None => RunningTransition::Timed(animation.run(&self.inner.clock)),
        };
        *self.inner.running.borrow_mut() = Some(running);
    }

    fn transition_completed(&self, kind: TransitionKind, completed: bool) {
        // Dropped last: the finished motion may still be on the stack.
        let _finished = self.inner.running.borrow_mut().take();
        let Some(sheet) = self.presented_sheet() else {
            return;
        };

        match (kind, completed) {
            (TransitionKind::Presentation, true) => {
                sheet.did_present();
                log::info!("presented {sheet:?}");
            }
            (TransitionKind::Dismissal, false) => {
                self.inner.dismiss_completion.borrow_mut().take();
                sheet.did_revert();
                log::info!("dismissal of {sheet:?} cancelled");
            }
            (TransitionKind::Presentation, false) | (TransitionKind::Dismissal, true) => {
                self.inner.presented.borrow_mut().take();
                let origin = sheet.finish_dismissal();
                log::info!("dismissed {sheet:?}");
                let completion = self.inner.dismiss_completion.borrow_mut().take();
                if let Some(completion) = completion {
                    completion();
                }
                if origin.is_some_and(|origin| origin.is_user_initiated()) {
                    sheet.notify_user_dismiss();
                }
            }
        }
    }

    /// Forwards a pointer event to the presented sheet, if any.
    pub fn dispatch_pointer_event(&self, event: &PointerEvent) {
        let sheet = self.presented_sheet();
        if let Some(sheet) = sheet {
            sheet.handle_pointer_event(event);
        }
    }

    /// Runs one frame at `frame_time_nanos`.
    pub fn drain_frame(&self, frame_time_nanos: u64) {
        self.inner.clock.drain_frame_callbacks(frame_time_nanos);
    }

    /// Runs one frame at wall-clock time `now`.
    pub fn advance_to(&self, now: Instant) {
        let nanos = now.saturating_duration_since(self.inner.epoch).as_nanos();
        self.drain_frame(u64::try_from(nanos).unwrap_or(u64::MAX));
    }

    pub fn has_pending_frames(&self) -> bool {
        self.inner.clock.has_frame_callbacks()
    }
}

impl std::fmt::Debug for ModalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHost")
            .field("bounds", &self.bounds())
            .field("presented", &self.presented_sheet())
            .field("transitioning", &self.is_transitioning())
            .finish()
    }
}
