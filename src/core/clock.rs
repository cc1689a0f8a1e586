//! Frame clock: per-display-refresh callbacks with scoped registration
//!
//! The host (eframe's `update`) ticks the clock once per frame. Callbacks
//! are held until their [`FrameSubscription`] is dropped, so an update loop
//! can never outlive the state it captured.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Host monotonic time in seconds
#[cfg(target_arch = "wasm32")]
pub fn host_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now() / 1000.0)
}

/// Host monotonic time in seconds since first call
#[cfg(not(target_arch = "wasm32"))]
pub fn host_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Timing of one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTick {
    /// Frame index since the clock was created
    pub frame: u64,
    /// Host time in seconds
    pub now: f64,
    /// Seconds since the previous tick (0 on the first)
    pub delta: f32,
}

type FrameCallback = Box<dyn FnMut(&FrameTick)>;

#[derive(Default)]
struct ClockInner {
    next_id: u64,
    callbacks: Vec<(u64, FrameCallback)>,
    /// Callbacks detached from `callbacks` for the running tick
    detached: usize,
    /// Ids revoked while their callbacks were detached for a tick
    revoked: Vec<u64>,
    ticking: bool,
    last: Option<FrameTick>,
}

/// Single-threaded frame clock. Cloning yields another handle to the same clock.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` to run on every tick until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription revokes the callback immediately"]
    pub fn register<F>(&self, callback: F) -> FrameSubscription
    where
        F: FnMut(&FrameTick) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.push((id, Box::new(callback)));
        trace!(id, "Frame callback registered");
        FrameSubscription {
            clock: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live registrations, including callbacks detached by a
    /// running tick
    pub fn len(&self) -> usize {
        let inner = self.inner.borrow();
        (inner.callbacks.len() + inner.detached).saturating_sub(inner.revoked.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tick at host time `now` (seconds), deriving frame index and delta.
    pub fn tick_at(&self, now: f64) -> FrameTick {
        let tick = match self.inner.borrow().last {
            Some(prev) => FrameTick {
                frame: prev.frame + 1,
                now,
                delta: (now - prev.now).max(0.0) as f32,
            },
            None => FrameTick { frame: 0, now, delta: 0.0 },
        };
        self.tick(&tick);
        tick
    }

    /// Invoke every live callback once, in registration order.
    ///
    /// Callbacks are detached from the registry while they run, so they may
    /// register or revoke subscriptions (including their own).
    pub fn tick(&self, tick: &FrameTick) {
        let mut running = {
            let mut inner = self.inner.borrow_mut();
            inner.ticking = true;
            inner.last = Some(*tick);
            inner.detached = inner.callbacks.len();
            std::mem::take(&mut inner.callbacks)
        };

        for (id, callback) in running.iter_mut() {
            if self.inner.borrow().revoked.contains(id) {
                continue;
            }
            callback(tick);
        }

        let dropped = {
            let mut inner = self.inner.borrow_mut();
            running.append(&mut inner.callbacks);
            let revoked = std::mem::take(&mut inner.revoked);
            let dropped = if revoked.is_empty() {
                Vec::new()
            } else {
                let (keep, dropped): (Vec<_>, Vec<_>) =
                    running.into_iter().partition(|(id, _)| !revoked.contains(id));
                running = keep;
                dropped
            };
            inner.callbacks = running;
            inner.detached = 0;
            inner.ticking = false;
            dropped
        };
        // Captured state is released outside the borrow
        drop(dropped);
    }

    fn revoke(inner: &RefCell<ClockInner>, id: u64) {
        let removed = {
            let mut inner = inner.borrow_mut();
            match inner.callbacks.iter().position(|(cid, _)| *cid == id) {
                Some(pos) => Some(inner.callbacks.remove(pos)),
                None => {
                    if inner.ticking {
                        inner.revoked.push(id);
                    }
                    None
                }
            }
        };
        trace!(id, "Frame callback revoked");
        drop(removed);
    }
}

/// Scoped frame-callback registration. Revokes on drop.
#[derive(Debug)]
pub struct FrameSubscription {
    clock: Weak<RefCell<ClockInner>>,
    id: u64,
}

impl FrameSubscription {
    /// Release the registration now
    pub fn revoke(self) {
        drop(self);
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.clock.upgrade() {
            FrameClock::revoke(&inner, self.id);
        }
    }
}
