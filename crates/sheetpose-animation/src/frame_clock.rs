use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

#[derive(Default)]
struct FrameClockInner {
    callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_id: Cell<FrameCallbackId>,
    last_frame_nanos: Cell<Option<u64>>,
}

/// Single-threaded frame scheduler.
///
/// Callbacks registered with [`FrameClock::with_frame_nanos`] run once, on the
/// next call to [`FrameClock::drain_frame_callbacks`]. Callbacks registered
/// while a drain is in progress wait for the following frame.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<FrameClockInner>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        self.inner
            .callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(Box::new(callback)),
            });
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }

    /// Runs every callback that was pending when the drain started.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.last_frame_nanos.set(Some(frame_time_nanos));
        let mut callbacks = self.inner.callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> =
            Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        log::trace!(
            "frame {frame_time_nanos}ns: {} callback(s)",
            pending.len()
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        !self.inner.callbacks.borrow().is_empty()
    }

    /// Timestamp of the most recent drained frame, if any.
    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.last_frame_nanos.get()
    }
}

fn cancel_frame_callback(inner: &FrameClockInner, id: FrameCallbackId) {
    let mut callbacks = inner.callbacks.borrow_mut();
    if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
        callbacks.remove(index);
    }
}

/// Handle to a pending frame callback. Dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    clock: Weak<FrameClockInner>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn cancel(mut self) {
        self.cancel_in_place();
    }

    fn cancel_in_place(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(clock) = self.clock.upgrade() {
                cancel_frame_callback(&clock, id);
            }
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.cancel_in_place();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_run_once_per_registration() {
        let clock = FrameClock::new();
        let hits = Rc::new(Cell::new(0));
        let registration = {
            let hits = Rc::clone(&hits);
            clock.with_frame_nanos(move |_| hits.set(hits.get() + 1))
        };

        assert!(clock.has_frame_callbacks());
        clock.drain_frame_callbacks(16_000_000);
        clock.drain_frame_callbacks(32_000_000);

        assert_eq!(hits.get(), 1);
        assert_eq!(clock.last_frame_nanos(), Some(32_000_000));
        drop(registration);
    }

    #[test]
    fn dropping_registration_cancels_callback() {
        let clock = FrameClock::new();
        let hits = Rc::new(Cell::new(0));
        {
            let hits = Rc::clone(&hits);
            let registration = clock.with_frame_millis(move |_| hits.set(hits.get() + 1));
            drop(registration);
        }

        assert!(!clock.has_frame_callbacks());
        clock.drain_frame_callbacks(16_000_000);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callbacks_registered_during_drain_wait_for_next_frame() {
        let clock = FrameClock::new();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<FrameCallbackRegistration>>> = Rc::new(RefCell::new(None));

        let first = {
            let clock = clock.clone();
            let frames = Rc::clone(&frames);
            let slot = Rc::clone(&slot);
            clock.clone().with_frame_millis(move |millis| {
                frames.borrow_mut().push(millis);
                let frames = Rc::clone(&frames);
                let next = clock.with_frame_millis(move |millis| frames.borrow_mut().push(millis));
                slot.borrow_mut().replace(next);
            })
        };

        clock.drain_frame_callbacks(16_000_000);
        assert_eq!(frames.borrow().as_slice(), &[16]);
        clock.drain_frame_callbacks(32_000_000);
        assert_eq!(frames.borrow().as_slice(), &[16, 32]);
        drop(first);
    }
}
