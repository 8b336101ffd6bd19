//! Frame driver
//!
//! Binds a tick handler to a [`FrameClock`] and turns raw frame timestamps
//! into clamped simulation steps.
//!
//! State machine:
//! - `Stopped → Running` on `start`
//! - `Running → Running` on `start` (old ticker cancelled first)
//! - `Running | Stopped → Stopped` on `stop`

use crate::consts::MAX_FRAME_DT;
use crate::error::Result;
use crate::platform::{FrameClock, TickHandler};

/// Converts monotonically non-decreasing timestamps (seconds) into steps
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step since the previous timestamp, clamped to `[0, MAX_FRAME_DT]`
    ///
    /// The first timestamp only primes the timer and yields zero.
    pub fn delta(&mut self, timestamp: f64) -> f32 {
        let last = self.last.replace(timestamp).unwrap_or(timestamp);
        ((timestamp - last) as f32).clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Stopped,
    Running,
}

/// Owns the frame clock for one curve model
pub struct FrameDriver {
    clock: Box<dyn FrameClock>,
    phase: DriverPhase,
}

impl FrameDriver {
    pub fn new(clock: Box<dyn FrameClock>) -> Self {
        Self {
            clock,
            phase: DriverPhase::Stopped,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == DriverPhase::Running
    }

    /// Arm the clock with `handler`, replacing any ticker already armed
    ///
    /// On failure the driver is left stopped.
    pub fn start(&mut self, handler: TickHandler) -> Result<()> {
        if self.is_running() {
            log::debug!("Frame driver re-armed");
            self.clock.stop();
            self.phase = DriverPhase::Stopped;
        }

        if let Err(e) = self.clock.start(handler) {
            log::warn!("Frame driver failed to start: {}", e);
            return Err(e);
        }

        self.phase = DriverPhase::Running;
        log::debug!("Frame driver running");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("Frame driver stopped");
        }
        self.clock.stop();
        self.phase = DriverPhase::Stopped;
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.clock.stop();
    }
}
