//! Platform abstraction layer
//!
//! Capabilities the curve engine consumes from its host:
//! - Frame clock (display refresh on web, fixed-rate stepping headless)
//! - Orientation source (device tilt on web, scripted samples headless)
//!
//! Both are single-threaded: handlers run on the context that draws.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessClock, ScriptedOrientation};
#[cfg(target_arch = "wasm32")]
pub use web::{AnimationFrameClock, DeviceOrientationSource};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Called once per frame with a timestamp in seconds
pub type TickHandler = Box<dyn FnMut(f64)>;

/// Something that fires a handler about once per display refresh
pub trait FrameClock {
    /// Install `handler`, replacing any handler already installed
    fn start(&mut self, handler: TickHandler) -> Result<()>;

    /// Cancel the installed handler. Idempotent.
    fn stop(&mut self);
}

/// Device attitude in radians, each typically within [-π, π]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation about the device x axis
    pub pitch: f32,
    /// Rotation about the device y axis
    pub roll: f32,
    /// Rotation about the device z axis
    pub yaw: f32,
}

impl Orientation {
    pub fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { pitch, roll, yaw }
    }
}

pub type OrientationHandler = Box<dyn FnMut(Orientation)>;

/// Something that publishes orientation samples at its own cadence
pub trait OrientationSource {
    fn subscribe(&mut self, handler: OrientationHandler) -> Result<()>;

    /// Stop delivering samples. Idempotent.
    fn stop(&mut self);
}
