//! Turns drag and tap gestures on a presented sheet into dismissal
//! transitions.
//!
//! A drag that starts while the sheet is presented creates an
//! [`InteractiveTransition`] and asks the host to dismiss; the drag then
//! scrubs that transition and its release decides between finishing and
//! cancelling. A tap on the dimmed background outside the content dismisses
//! on the clock.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use sheetpose_foundation::{
    DragEvent, DragUpdate, GestureDelegate, GestureKind, OtherGesture, RecognizerInfo,
};
use sheetpose_ui_graphics::{Point, Rect};

use crate::config::{DISMISS_THRESHOLD_FRACTION, DISMISS_THRESHOLD_VELOCITY};
use crate::interactive::InteractiveTransition;
use crate::session::{DismissOrigin, SessionState};
use crate::sheet::SheetInner;

/// Vertical component of a drag, in host coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragSample {
    /// Downward distance since the press.
    pub translation_y: f32,
    /// Points per second, positive downward.
    pub velocity_y: f32,
}

impl DragSample {
    pub fn new(translation_y: f32, velocity_y: f32) -> Self {
        Self {
            translation_y,
            velocity_y,
        }
    }
}

impl From<DragUpdate> for DragSample {
    fn from(update: DragUpdate) -> Self {
        Self::new(update.translation.y, update.velocity.y)
    }
}

/// Dismissal progress for a drag of `translation_y` over a sheet of height
/// `extent`, clamped to `0.0..=1.0`.
pub fn drag_percent(translation_y: f32, extent: f32) -> f32 {
    if extent <= 0.0 || extent.is_nan() {
        return if translation_y > 0.0 { 1.0 } else { 0.0 };
    }
    (translation_y / extent).clamp(0.0, 1.0)
}

/// Whether a drag released at `percent` with `velocity_y` dismisses.
pub fn should_commit(percent: f32, velocity_y: f32) -> bool {
    percent > DISMISS_THRESHOLD_FRACTION || velocity_y > DISMISS_THRESHOLD_VELOCITY
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollRegionId(u32);

#[derive(Clone, Copy, Debug)]
struct ScrollRegion {
    id: ScrollRegionId,
    /// In content view coordinates.
    frame: Rect,
    content_offset_y: f32,
}

pub struct GestureCoordinator {
    sheet: Weak<SheetInner>,
    interactive: RefCell<Option<Rc<InteractiveTransition>>>,
    scroll_regions: RefCell<Vec<ScrollRegion>>,
    next_region: Cell<u32>,
    pressed_region: Cell<Option<ScrollRegionId>>,
}

impl GestureCoordinator {
    pub(crate) fn new(sheet: Weak<SheetInner>) -> Self {
        Self {
            sheet,
            interactive: RefCell::new(None),
            scroll_regions: RefCell::new(Vec::new()),
            next_region: Cell::new(0),
            pressed_region: Cell::new(None),
        }
    }

    /// The controller of the drag in progress, if any.
    pub fn interaction_controller(&self) -> Option<Rc<InteractiveTransition>> {
        self.interactive.borrow().clone()
    }

    pub fn is_driving(&self) -> bool {
        self.interactive.borrow().is_some()
    }

    pub fn on_drag_begin(&self) {
        let Some(sheet) = self.sheet.upgrade() else {
            return;
        };
        if self.is_driving() {
            log::debug!("drag begin ignored: previous drag still owns the transition");
            return;
        }
        let state = sheet.session.borrow().state();
        if state != SessionState::Presented {
            log::debug!("drag begin ignored while {state:?}");
            return;
        }
        let Some(host) = sheet.host() else {
            log::debug!("drag begin ignored: sheet is not attached to a host");
            return;
        };

        let extent = sheet.content_extent();
        let (speed, curve) = {
            let config = sheet.config.borrow();
            (config.completion_speed, config.completion_curve)
        };
        let controller = InteractiveTransition::new(host.clock(), speed, curve);
        *self.interactive.borrow_mut() = Some(Rc::clone(&controller));
        sheet.delegate.set_interaction_controller(Some(&controller));

        match host.begin_dismissal(DismissOrigin::Drag, None) {
            Ok(()) => {
                sheet.session.borrow_mut().set_content_extent(extent);
                log::debug!("drag dismissal began over {extent}pt");
            }
            Err(err) => {
                log::debug!("drag dismissal refused: {err}");
                self.release_controller(&sheet);
            }
        }
    }

    pub fn on_drag_changed(&self, sample: DragSample) {
        let Some(controller) = self.interaction_controller() else {
            return;
        };
        let Some(sheet) = self.sheet.upgrade() else {
            return;
        };
        let percent = {
            let mut session = sheet.session.borrow_mut();
            let percent = drag_percent(sample.translation_y, session.content_extent().unwrap_or(0.0));
            session.drag_to(percent);
            percent
        };
        controller.update(percent);
    }

    /// Finishes the dismissal past the distance or speed threshold, cancels
    /// it otherwise. Subsequent calls without a new drag are no-ops.
    pub fn on_drag_ended(&self, sample: DragSample) {
        if !self.is_driving() {
            return;
        }
        self.on_drag_changed(sample);
        let Some(sheet) = self.sheet.upgrade() else {
            return;
        };
        let Some(controller) = self.release_controller(&sheet) else {
            return;
        };
        let percent = controller.percent_complete();
        if should_commit(percent, sample.velocity_y) {
            log::debug!("drag released at {percent:.3}, {}pt/s: dismissing", sample.velocity_y);
            sheet.session.borrow_mut().commit();
            controller.finish();
        } else {
            log::debug!("drag released at {percent:.3}, {}pt/s: restoring", sample.velocity_y);
            sheet.session.borrow_mut().revert();
            controller.cancel();
        }
    }

    pub fn on_drag_cancelled(&self) {
        let Some(sheet) = self.sheet.upgrade() else {
            return;
        };
        let Some(controller) = self.release_controller(&sheet) else {
            return;
        };
        log::debug!("drag cancelled at {:.3}", controller.percent_complete());
        sheet.session.borrow_mut().revert();
        controller.cancel();
    }

    /// `location` is in host coordinates.
    pub fn on_outside_tap(&self, location: Point) {
        let Some(sheet) = self.sheet.upgrade() else {
            return;
        };
        {
            let session = sheet.session.borrow();
            if !session.can_dismiss_on_outside_tap {
                return;
            }
            if session.state() != SessionState::Presented {
                log::debug!("outside tap ignored while {:?}", session.state());
                return;
            }
        }
        if sheet
            .presented_content_frame()
            .is_some_and(|frame| frame.contains_point(location))
        {
            return;
        }
        let Some(host) = sheet.host() else {
            return;
        };
        if let Err(err) = host.begin_dismissal(DismissOrigin::OutsideTap, None) {
            log::debug!("outside tap dismissal refused: {err}");
        }
    }

    pub(crate) fn handle_drag_event(&self, event: DragEvent) {
        match event {
            DragEvent::Began(update) => {
                self.on_drag_begin();
                self.on_drag_changed(update.into());
            }
            DragEvent::Changed(update) => self.on_drag_changed(update.into()),
            DragEvent::Ended(update) => self.on_drag_ended(update.into()),
            DragEvent::Cancelled => self.on_drag_cancelled(),
        }
    }

    /// Registers a scrollable region of the content. `frame` is in content
    /// view coordinates.
    pub fn add_scroll_region(&self, frame: Rect, content_offset_y: f32) -> ScrollRegionId {
        let id = ScrollRegionId(self.next_region.get());
        self.next_region.set(id.0 + 1);
        self.scroll_regions.borrow_mut().push(ScrollRegion {
            id,
            frame,
            content_offset_y,
        });
        id
    }

    pub fn set_scroll_offset(&self, id: ScrollRegionId, content_offset_y: f32) {
        if let Some(region) = self
            .scroll_regions
            .borrow_mut()
            .iter_mut()
            .find(|region| region.id == id)
        {
            region.content_offset_y = content_offset_y;
        }
    }

    pub fn remove_scroll_region(&self, id: ScrollRegionId) {
        self.scroll_regions.borrow_mut().retain(|region| region.id != id);
        if self.pressed_region.get() == Some(id) {
            self.pressed_region.set(None);
        }
    }

    /// Records which scroll region, if any, a press on the content landed in.
    pub(crate) fn track_press(&self, location_in_content: Point) {
        let region = self
            .scroll_regions
            .borrow()
            .iter()
            .rev()
            .find(|region| region.frame.contains_point(location_in_content))
            .map(|region| region.id);
        self.pressed_region.set(region);
    }

    /// The nested scroll competing for the current press.
    pub(crate) fn competing_gesture(&self) -> Option<OtherGesture> {
        let id = self.pressed_region.get()?;
        self.scroll_regions
            .borrow()
            .iter()
            .find(|region| region.id == id)
            .map(|region| OtherGesture::NestedScroll {
                content_offset: Point::new(0.0, region.content_offset_y),
            })
    }

    pub(crate) fn reset(&self) {
        self.interactive.borrow_mut().take();
        self.pressed_region.set(None);
    }

    fn release_controller(&self, sheet: &SheetInner) -> Option<Rc<InteractiveTransition>> {
        sheet.delegate.set_interaction_controller(None);
        self.interactive.borrow_mut().take()
    }
}

impl GestureDelegate for GestureCoordinator {
    /// Drags must be predominantly vertical.
    fn should_begin(&self, recognizer: &RecognizerInfo) -> bool {
        match recognizer.kind {
            GestureKind::Drag => recognizer.translation.y.abs() > recognizer.translation.x.abs(),
            GestureKind::Tap => true,
        }
    }

    /// A nested scroll resting at or above its top lets the sheet drag too.
    fn should_recognize_simultaneously(
        &self,
        _recognizer: &RecognizerInfo,
        other: &OtherGesture,
    ) -> bool {
        match other {
            OtherGesture::NestedScroll { content_offset } => content_offset.y <= 0.0,
            OtherGesture::Unknown => false,
        }
    }
}
