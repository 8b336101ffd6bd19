//! Curve Tilt - a cubic Bézier that settles toward device tilt
//!
//! Core modules:
//! - `curve`: Bézier evaluator, spring integrator, frame driver and curve model
//! - `platform`: Frame clock and orientation source capabilities (browser/headless)
//! - `input`: Orientation and drag mapping onto spring targets
//! - `render`: Per-frame render list built from a curve snapshot
//! - `settings`: Data-driven tuning
//!
//! Coordinates are logical pixels with the origin at the top-left corner and
//! `y` growing downward.

pub mod curve;
pub mod error;
pub mod input;
pub mod platform;
pub mod render;
pub mod settings;

pub use curve::{CurveModel, CurveSnapshot, Subscription};
pub use error::{Error, Result};
pub use settings::Settings;

/// Engine configuration constants
pub mod consts {
    /// Default spring constant
    pub const DEFAULT_K: f32 = 0.12;
    /// Default velocity damping
    pub const DEFAULT_DAMPING: f32 = 0.14;

    /// Position integration scale (60 · 0.016). Keeps the spring's feel
    /// comparable across refresh rates; changing it retunes every preset.
    pub const POSITION_SCALE: f32 = 60.0 * 0.016;

    /// Largest step the frame driver will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Endpoint layout, as fractions of the drawing size
    pub const START_X: f32 = 0.1;
    pub const END_X: f32 = 0.9;
    pub const ENDPOINT_Y: f32 = 0.5;

    /// Initial interior control points, as fractions of the drawing size
    pub const INITIAL_P1: (f32, f32) = (0.3, 0.25);
    pub const INITIAL_P2: (f32, f32) = (0.7, 0.75);

    /// Tilt → target offset factor (fraction of the size per radian)
    pub const TILT_SENSITIVITY: f32 = 0.45;
    /// Target anchors relative to the drawing center
    pub const TARGET1_ANCHOR: f32 = 0.6;
    pub const TARGET2_ANCHOR: f32 = 1.4;
    /// Drag gesture → target scale
    pub const DRAG_SCALE: f32 = 0.6;

    /// Renderer defaults
    pub const CURVE_SEGMENTS: usize = 100;
    pub const TANGENT_SEGMENTS: usize = 10;
    pub const TANGENT_LENGTH: f32 = 30.0;
    pub const MARKER_RADIUS: f32 = 6.0;
}
