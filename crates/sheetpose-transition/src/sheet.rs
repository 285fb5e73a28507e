//! A presentable bottom sheet and its pointer routing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sheetpose_foundation::{DragGesture, PointerEvent, PointerEventKind, TapGesture};
use sheetpose_ui_graphics::{Color, Rect};

use crate::config::{SheetConfig, CONTENT_EXTENT_PROPORTION};
use crate::coordinator::{GestureCoordinator, ScrollRegionId};
use crate::delegate::TransitionDelegate;
use crate::error::SheetError;
use crate::host::{HostInner, ModalHost};
use crate::session::{DismissOrigin, PresentationSession, SessionState};
use crate::surface::{shared, BottomSheetSurface, SharedSurface};

type DismissListener = Box<dyn FnMut()>;

pub(crate) struct SheetInner {
    pub(crate) surface: SharedSurface,
    pub(crate) config: RefCell<SheetConfig>,
    pub(crate) session: RefCell<PresentationSession>,
    pub(crate) coordinator: GestureCoordinator,
    pub(crate) delegate: TransitionDelegate,
    drag: RefCell<DragGesture>,
    tap: RefCell<TapGesture>,
    host: RefCell<Weak<HostInner>>,
    on_user_dismiss: RefCell<Option<DismissListener>>,
}

impl SheetInner {
    pub(crate) fn host(&self) -> Option<ModalHost> {
        self.host.borrow().upgrade().map(ModalHost::from_inner)
    }

    /// Height the sheet travels when dismissed.
    ///
    /// # Panics
    ///
    /// Panics if the surface has no content view.
    pub(crate) fn content_extent(&self) -> f32 {
        let surface = self.surface.borrow();
        match surface.content_view() {
            Some(content) => content.frame.height * CONTENT_EXTENT_PROPORTION,
            None => panic!("{} is not a bottom sheet: it has no content view", surface.name()),
        }
    }

    pub(crate) fn presented_content_frame(&self) -> Option<Rect> {
        self.surface
            .borrow()
            .content_view()
            .map(|content| content.presented_frame())
    }
}

/// Shared handle to a sheet. Clones refer to the same sheet.
#[derive(Clone)]
pub struct BottomSheet {
    inner: Rc<SheetInner>,
}

impl BottomSheet {
    pub fn new(
        surface: impl BottomSheetSurface + 'static,
        config: SheetConfig,
    ) -> Result<Self, SheetError> {
        Self::from_shared(shared(surface), config)
    }

    pub fn from_shared(surface: SharedSurface, config: SheetConfig) -> Result<Self, SheetError> {
        config.validate()?;
        let mut drag = DragGesture::new();
        drag.set_enabled(config.pan_gesture_enabled);
        let inner = Rc::new_cyclic(|sheet| SheetInner {
            surface,
            session: RefCell::new(PresentationSession::new(&config)),
            config: RefCell::new(config),
            coordinator: GestureCoordinator::new(sheet.clone()),
            delegate: TransitionDelegate::new(),
            drag: RefCell::new(drag),
            tap: RefCell::new(TapGesture::new().with_cancels_touches_in_view(false)),
            host: RefCell::new(Weak::new()),
            on_user_dismiss: RefCell::new(None),
        });
        Ok(Self { inner })
    }

    pub fn state(&self) -> SessionState {
        self.inner.session.borrow().state()
    }

    pub fn session(&self) -> PresentationSession {
        self.inner.session.borrow().clone()
    }

    pub fn config(&self) -> SheetConfig {
        self.inner.config.borrow().clone()
    }

    pub fn surface(&self) -> SharedSurface {
        Rc::clone(&self.inner.surface)
    }

    pub fn coordinator(&self) -> &GestureCoordinator {
        &self.inner.coordinator
    }

    pub fn delegate(&self) -> &TransitionDelegate {
        &self.inner.delegate
    }

    /// Content frame as currently drawn, in host coordinates.
    pub fn content_frame(&self) -> Option<Rect> {
        self.inner.presented_content_frame()
    }

    pub fn ptr_eq(&self, other: &BottomSheet) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Called once per dismissal the user caused by dragging or tapping
    /// outside. Programmatic dismissals do not call it.
    pub fn set_on_user_dismiss(&self, listener: impl FnMut() + 'static) {
        *self.inner.on_user_dismiss.borrow_mut() = Some(Box::new(listener));
    }

    pub fn set_can_dismiss_on_outside_tap(&self, enabled: bool) {
        self.inner.config.borrow_mut().can_dismiss_on_outside_tap = enabled;
        self.inner.session.borrow_mut().can_dismiss_on_outside_tap = enabled;
    }

    /// Disabling the drag mid-gesture cancels it and restores the sheet.
    pub fn set_pan_gesture_enabled(&self, enabled: bool) {
        self.inner.config.borrow_mut().pan_gesture_enabled = enabled;
        self.inner.session.borrow_mut().pan_gesture_enabled = enabled;
        let cancelled = self.inner.drag.borrow_mut().set_enabled(enabled);
        if let Some(event) = cancelled {
            self.inner.coordinator.handle_drag_event(event);
        }
    }

    pub fn set_inset_background_color(&self, color: Color) {
        self.inner.config.borrow_mut().inset_background_color = color;
        self.inner.surface.borrow_mut().set_inset_background(color);
    }

    /// Declares a scrollable region of the content that may compete with
    /// the dismiss drag. `frame` is in content view coordinates.
    pub fn add_nested_scroll(&self, frame: Rect, content_offset_y: f32) -> ScrollRegionId {
        self.inner.coordinator.add_scroll_region(frame, content_offset_y)
    }

    pub fn set_nested_scroll_offset(&self, id: ScrollRegionId, content_offset_y: f32) {
        self.inner.coordinator.set_scroll_offset(id, content_offset_y);
    }

    pub fn remove_nested_scroll(&self, id: ScrollRegionId) {
        self.inner.coordinator.remove_scroll_region(id);
    }

    /// Routes one pointer event. The drag recognizer sits on the content
    /// view and the tap recognizer on the full-screen container.
    pub fn handle_pointer_event(&self, event: &PointerEvent) {
        let inner = &self.inner;
        let forward_to_drag = match event.kind {
            PointerEventKind::Down => match inner.presented_content_frame() {
                Some(content) if content.contains_point(event.position) => {
                    inner
                        .coordinator
                        .track_press(event.position - content.origin());
                    true
                }
                _ => false,
            },
            _ => true,
        };
        if forward_to_drag {
            let competing = inner.coordinator.competing_gesture();
            let drag_event = inner.drag.borrow_mut().on_pointer_event(
                event,
                &inner.coordinator,
                competing.as_ref(),
            );
            if let Some(drag_event) = drag_event {
                inner.coordinator.handle_drag_event(drag_event);
            }
        }

        let tap = inner.tap.borrow_mut().on_pointer_event(event);
        if let Some(location) = tap {
            inner.coordinator.on_outside_tap(location);
        }
    }

    pub(crate) fn attach(&self, host: &ModalHost) -> Result<(), SheetError> {
        let state = self.state();
        if !matches!(state, SessionState::Idle | SessionState::Dismissed) {
            return Err(SheetError::TransitionInProgress { state });
        }
        let mut session = PresentationSession::new(&self.inner.config.borrow());
        session.begin_presentation()?;
        *self.inner.session.borrow_mut() = session;
        *self.inner.host.borrow_mut() = host.downgrade();
        Ok(())
    }

    pub(crate) fn begin_dismissal(&self, origin: DismissOrigin) -> Result<(), SheetError> {
        self.inner.session.borrow_mut().begin_dismissal(origin)
    }

    pub(crate) fn did_present(&self) {
        self.inner.session.borrow_mut().did_present();
    }

    pub(crate) fn did_revert(&self) {
        self.inner.session.borrow_mut().did_revert();
    }

    /// Ends the session and detaches from the host. Returns what started the
    /// dismissal.
    pub(crate) fn finish_dismissal(&self) -> Option<DismissOrigin> {
        let origin = self.inner.session.borrow_mut().did_dismiss();
        self.inner.coordinator.reset();
        self.inner.delegate.set_interaction_controller(None);
        self.inner.drag.borrow_mut().reset();
        self.inner.tap.borrow_mut().reset();
        *self.inner.host.borrow_mut() = Weak::new();
        origin
    }

    pub(crate) fn notify_user_dismiss(&self) {
        let listener = self.inner.on_user_dismiss.borrow_mut().take();
        if let Some(mut listener) = listener {
            listener();
            let mut slot = self.inner.on_user_dismiss.borrow_mut();
            if slot.is_none() {
                *slot = Some(listener);
            }
        }
    }
}

impl std::fmt::Debug for BottomSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BottomSheet")
            .field("surface", &self.inner.surface.borrow().name())
            .field("state", &self.state())
            .finish()
    }
}
