//! Headless platform: manually stepped clock and scripted orientation
//!
//! Used by tests and the native demo. Handles are cheap clones sharing one
//! inner state, so a test can keep a handle after giving one to a model.

use std::cell::RefCell;
use std::rc::Rc;

use super::{FrameClock, Orientation, OrientationHandler, OrientationSource, TickHandler};
use crate::error::{Error, Result};

#[derive(Default)]
struct ClockInner {
    handler: Option<TickHandler>,
    /// Bumped on every start/stop so a tick in flight can tell it was cancelled
    generation: u64,
    installs: u32,
    ticks: u64,
    last_timestamp: f64,
    unavailable: bool,
}

/// A frame clock stepped explicitly by its owner
#[derive(Clone, Default)]
pub struct HeadlessClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl HeadlessClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose `start` always fails, for hosts with no refresh ticker
    pub fn unavailable() -> Self {
        let clock = Self::default();
        clock.inner.borrow_mut().unavailable = true;
        clock
    }

    /// Whether a handler is currently installed
    pub fn armed(&self) -> bool {
        self.inner.borrow().handler.is_some()
    }

    /// Number of successful `start` calls so far
    pub fn installs(&self) -> u32 {
        self.inner.borrow().installs
    }

    /// Number of ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.inner.borrow().ticks
    }

    /// Deliver one tick at `timestamp` seconds. Returns whether a handler ran.
    ///
    /// The handler may start or stop this clock; that takes effect after the
    /// tick returns.
    pub fn fire(&self, timestamp: f64) -> bool {
        let (mut handler, generation) = {
            let mut inner = self.inner.borrow_mut();
            inner.last_timestamp = timestamp;
            match inner.handler.take() {
                Some(h) => (h, inner.generation),
                None => return false,
            }
        };

        handler(timestamp);

        let mut inner = self.inner.borrow_mut();
        inner.ticks += 1;
        if inner.generation == generation {
            inner.handler = Some(handler);
        }
        true
    }

    /// Deliver `frames` ticks spaced at `hz`, continuing from the last timestamp
    pub fn run_frames(&self, frames: u32, hz: f64) -> u32 {
        let step = 1.0 / hz;
        let mut delivered = 0;
        for _ in 0..frames {
            let next = self.inner.borrow().last_timestamp + step;
            if self.fire(next) {
                delivered += 1;
            }
        }
        delivered
    }
}

impl FrameClock for HeadlessClock {
    fn start(&mut self, handler: TickHandler) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(Error::ClockUnavailable("headless clock disabled".into()));
        }
        inner.generation += 1;
        inner.handler = Some(handler);
        inner.installs += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.generation += 1;
        inner.handler = None;
    }
}

/// An orientation source fed by hand
#[derive(Clone, Default)]
pub struct ScriptedOrientation {
    handlers: Rc<RefCell<Vec<OrientationHandler>>>,
}

impl ScriptedOrientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one sample to every subscriber
    pub fn push(&self, sample: Orientation) {
        let mut handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        for handler in handlers.iter_mut() {
            handler(sample);
        }
        // Keep any subscriptions made while delivering
        let mut current = self.handlers.borrow_mut();
        handlers.append(&mut current);
        *current = handlers;
    }

    /// Deliver each sample in order
    pub fn play(&self, samples: &[Orientation]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    pub fn subscribers(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl OrientationSource for ScriptedOrientation {
    fn subscribe(&mut self, handler: OrientationHandler) -> Result<()> {
        self.handlers.borrow_mut().push(handler);
        Ok(())
    }

    fn stop(&mut self) {
        self.handlers.borrow_mut().clear();
    }
}
