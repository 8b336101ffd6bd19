//! Crate error type
//!
//! The simulation itself never fails; only acquiring a display clock and
//! loading settings can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host offers no display-refresh ticker
    #[error("frame clock unavailable: {0}")]
    ClockUnavailable(String),

    /// The host offers no device orientation events
    #[error("orientation source unavailable: {0}")]
    OrientationUnavailable(String),

    /// The drawing surface could not be acquired
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
