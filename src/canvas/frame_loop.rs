//! Self-rescheduling per-frame callback on top of a [`FrameScheduler`].
//!
//! Every `start()` opens a new generation. A callback only runs while its
//! generation is current, so after `stop()` returns nothing from the old
//! generation can fire again, even if the host already queued it or failed
//! to cancel it.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use super::surface::{FrameHandle, FrameScheduler};

struct LoopInner {
    scheduler: Rc<dyn FrameScheduler>,
    generation: Cell<u64>,
    running: Cell<bool>,
    pending: Cell<Option<FrameHandle>>,
}

pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

impl FrameLoop {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                scheduler,
                generation: Cell::new(0),
                running: Cell::new(false),
                pending: Cell::new(None),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Call `on_frame` with the host timestamp once per frame until
    /// [`stop`](Self::stop). Ignored while already running.
    pub fn start(&self, on_frame: Rc<dyn Fn(f64)>) {
        if self.inner.running.get() {
            return;
        }
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        self.inner.running.set(true);
        schedule(&self.inner, generation, on_frame);
    }

    /// Cancel the pending frame and invalidate the current generation.
    /// Safe to call any number of times.
    pub fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        self.inner.generation.set(self.inner.generation.get() + 1);
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(handle);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(inner: &Rc<LoopInner>, generation: u64, on_frame: Rc<dyn Fn(f64)>) {
    let weak: Weak<LoopInner> = Rc::downgrade(inner);
    let handle = inner.scheduler.request_frame(Box::new(move |timestamp| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.generation.get() != generation {
            return;
        }
        inner.pending.set(None);
        on_frame(timestamp);
        // on_frame may have stopped the loop
        if inner.generation.get() == generation {
            schedule(&inner, generation, on_frame);
        }
    }));

    match handle {
        Some(handle) => inner.pending.set(Some(handle)),
        None => {
            crate::console_log!(warn_1, "Frame request rejected, animation loop stopped");
            inner.running.set(false);
            inner.generation.set(generation + 1);
        }
    }
}
