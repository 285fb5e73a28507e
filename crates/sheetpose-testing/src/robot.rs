//! Robot testing harness for sheets
//!
//! [`SheetTestRule`] owns a [`ModalHost`] with a simulated clock. Pointer
//! interactions are stamped with the simulated time, and frames only run
//! when the test advances time.
//!
//! # Example
//!
//! ```
//! use sheetpose_testing::SheetTestRule;
//! use sheetpose_transition::prelude::*;
//!
//! let mut robot = SheetTestRule::new(390.0, 844.0);
//! let sheet = BottomSheet::new(SheetSurface::new("sheet", 400.0), SheetConfig::default())
//!     .expect("valid config");
//! robot.present_and_settle(&sheet).expect("host is free");
//!
//! robot.drag(195.0, 600.0, 195.0, 850.0, 400);
//! robot.wait_for_idle();
//! assert_eq!(sheet.state(), SessionState::Dismissed);
//! ```

use sheetpose_foundation::PointerEvent;
use sheetpose_transition::{BottomSheet, ModalHost, SheetError};
use sheetpose_ui_graphics::{Point, Rect, Size};

/// One display frame at 60Hz.
pub const FRAME_NANOS: u64 = 16_666_667;

const MAX_IDLE_FRAMES: usize = 10_000;

pub struct SheetTestRule {
    host: ModalHost,
    now_nanos: u64,
    pointer: Option<Point>,
}

impl SheetTestRule {
    /// Create a host filling a `width` x `height` viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            host: ModalHost::new(Rect::from_size(Size::new(width, height))),
            now_nanos: 0,
            pointer: None,
        }
    }

    pub fn host(&self) -> &ModalHost {
        &self.host
    }

    pub fn now_nanos(&self) -> u64 {
        self.now_nanos
    }

    /// Start presenting; the transition runs as time advances.
    pub fn present(&mut self, sheet: &BottomSheet) -> Result<(), SheetError> {
        self.host.present(sheet)
    }

    pub fn present_and_settle(&mut self, sheet: &BottomSheet) -> Result<(), SheetError> {
        self.present(sheet)?;
        self.wait_for_idle();
        Ok(())
    }

    /// Advance simulated time, running every frame that falls in between.
    pub fn advance_time(&mut self, nanos: u64) {
        let target = self.now_nanos + nanos;
        while self.now_nanos < target {
            self.now_nanos = (self.now_nanos + FRAME_NANOS).min(target);
            self.host.drain_frame(self.now_nanos);
        }
    }

    pub fn advance_frame(&mut self) {
        self.advance_time(FRAME_NANOS);
    }

    /// Run frames until no animation is pending.
    ///
    /// # Panics
    ///
    /// Panics if animations are still scheduled after a very long time.
    pub fn wait_for_idle(&mut self) {
        for _ in 0..MAX_IDLE_FRAMES {
            if !self.host.has_pending_frames() {
                return;
            }
            self.advance_frame();
        }
        panic!("host never became idle after {MAX_IDLE_FRAMES} frames");
    }

    pub fn press(&mut self, x: f32, y: f32) {
        let position = Point::new(x, y);
        self.pointer = Some(position);
        self.dispatch(PointerEvent::down(position, self.now_nanos));
    }

    /// Move the pressed pointer without advancing time.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let position = Point::new(x, y);
        if self.pointer.is_some() {
            self.pointer = Some(position);
        }
        self.dispatch(PointerEvent::moved(position, self.now_nanos));
    }

    pub fn release(&mut self) {
        if let Some(position) = self.pointer.take() {
            self.dispatch(PointerEvent::up(position, self.now_nanos));
        }
    }

    /// The system took the pointer away, for example for an incoming call.
    pub fn cancel_pointer(&mut self) {
        if let Some(position) = self.pointer.take() {
            self.dispatch(PointerEvent::cancel(position, self.now_nanos));
        }
    }

    pub fn tap_at(&mut self, x: f32, y: f32) {
        self.press(x, y);
        self.advance_time(50_000_000);
        self.release();
    }

    /// Press, move to the target in frame-sized steps over `duration_millis`,
    /// then release. Animations started by the release are left running.
    pub fn drag(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, duration_millis: u64) {
        self.press(from_x, from_y);
        self.drag_to(to_x, to_y, duration_millis);
        self.release();
    }

    /// Move the pressed pointer to the target over `duration_millis` without
    /// releasing.
    pub fn drag_to(&mut self, to_x: f32, to_y: f32, duration_millis: u64) {
        let Some(from) = self.pointer else {
            log::warn!("drag_to without a pressed pointer");
            return;
        };
        let duration_nanos = duration_millis * 1_000_000;
        let steps = (duration_nanos / FRAME_NANOS).max(1);
        let step_nanos = duration_nanos / steps;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.advance_time(step_nanos);
            self.move_to(from.x + (to_x - from.x) * t, from.y + (to_y - from.y) * t);
        }
    }

    /// Content frame of the presented sheet as drawn, in host coordinates.
    pub fn content_frame(&self) -> Option<Rect> {
        self.host
            .presented_sheet()
            .and_then(|sheet| sheet.content_frame())
    }

    fn dispatch(&self, event: PointerEvent) {
        self.host.dispatch_pointer_event(&event);
    }
}
