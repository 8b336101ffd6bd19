//! Curve animation engine
//!
//! Leaves first:
//! - `bezier`: pure cubic evaluation
//! - `spring`: per-point damped spring step
//! - `state`: layout rule and the mutable simulation state
//! - `driver`: frame clock binding and dt clamping
//! - `model`: composition and frame-ready observers

pub mod bezier;
pub mod driver;
pub mod model;
pub mod spring;
pub mod state;

pub use bezier::{CubicBezier, bernstein, normalize};
pub use driver::{DriverPhase, FrameDriver, FrameTimer};
pub use model::{CurveModel, Subscription};
pub use spring::{PhysicsConfig, SpringState, advance};
pub use state::{CurveSnapshot, CurveState, Size, Targets};
