//! Curve state and layout
//!
//! Everything the frame driver mutates lives in [`CurveState`]. Observers
//! only ever see a [`CurveSnapshot`] copied out at the end of a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bezier::CubicBezier;
use super::spring::{PhysicsConfig, SpringState};
use crate::consts::*;

/// Logical size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Point at fractional coordinates `(fx, fy)` of this size
    #[inline]
    pub fn at(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.width * fx, self.height * fy)
    }
}

/// Rest positions the two springs pull toward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Targets {
    pub target1: Vec2,
    pub target2: Vec2,
}

/// Mutable simulation state for one curve
#[derive(Debug, Clone, Default)]
pub struct CurveState {
    /// Start endpoint (owned by the layout rule)
    pub p0: Vec2,
    /// End endpoint (owned by the layout rule)
    pub p3: Vec2,
    /// Dynamic control point P1
    pub spring1: SpringState,
    /// Dynamic control point P2
    pub spring2: SpringState,
    pub targets: Targets,
    pub physics: PhysicsConfig,
    pub size: Size,
    /// Set once the first positive size has been laid out
    laid_out: bool,
}

impl CurveState {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            physics,
            ..Default::default()
        }
    }

    /// Store a new size and run the layout rule
    ///
    /// Endpoints always follow the size. The interior points and targets are
    /// seeded on the first layout only, and only while both interior points
    /// still sit at the origin.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        if !size.is_positive() {
            return;
        }

        self.p0 = size.at(START_X, ENDPOINT_Y);
        self.p3 = size.at(END_X, ENDPOINT_Y);

        if !self.laid_out && self.spring1.pos == Vec2::ZERO && self.spring2.pos == Vec2::ZERO {
            self.spring1.pos = size.at(INITIAL_P1.0, INITIAL_P1.1);
            self.spring2.pos = size.at(INITIAL_P2.0, INITIAL_P2.1);
            self.targets = Targets {
                target1: self.spring1.pos,
                target2: self.spring2.pos,
            };
            log::info!(
                "Initial layout {}x{}: P1={}, P2={}",
                size.width,
                size.height,
                self.spring1.pos,
                self.spring2.pos
            );
        }

        self.laid_out = true;
    }

    /// Whether a positive size has ever been laid out
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Advance both springs by `dt`; P1 first, then P2
    pub fn step(&mut self, dt: f32) {
        let physics = self.physics;
        self.spring1.advance(self.targets.target1, dt, &physics);
        self.spring2.advance(self.targets.target2, dt, &physics);
    }

    pub fn control_points(&self) -> CubicBezier {
        CubicBezier::new(self.p0, self.spring1.pos, self.spring2.pos, self.p3)
    }

    pub fn snapshot(&self) -> CurveSnapshot {
        CurveSnapshot {
            curve: self.control_points(),
            size: self.size,
            laid_out: self.laid_out,
        }
    }
}

/// Immutable copy of the curve taken at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    pub curve: CubicBezier,
    pub size: Size,
    pub laid_out: bool,
}

impl CurveSnapshot {
    /// Polyline `B(i/n)` for `i = 0..=n`; empty before the first layout
    pub fn sample_curve(&self, n: usize) -> Vec<Vec2> {
        if !self.laid_out {
            return Vec::new();
        }
        self.curve.sample(n)
    }

    /// Tangent segments at `i/n`; empty before the first layout
    pub fn sample_tangents(&self, n: usize, length: f32) -> Vec<(Vec2, Vec2)> {
        if !self.laid_out {
            return Vec::new();
        }
        self.curve.sample_tangents(n, length)
    }

    pub fn control_points(&self) -> CubicBezier {
        self.curve
    }
}
