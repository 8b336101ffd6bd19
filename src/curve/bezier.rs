//! Cubic Bézier evaluation
//!
//! A cubic is defined by four control points:
//! - `p0`, `p3`: endpoints the curve passes through
//! - `p1`, `p2`: interior points that shape the curve
//!
//! `t` is not clamped. Values outside [0, 1] extrapolate the polynomial.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The four control points of a cubic Bézier, in order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Point on the curve at parameter `t`
    ///
    /// `B(t) = (1−t)³P0 + 3(1−t)²t·P1 + 3(1−t)t²·P2 + t³·P3`
    #[inline]
    pub fn position(&self, t: f32) -> Vec2 {
        let [w0, w1, w2, w3] = bernstein(t);
        self.p0 * w0 + self.p1 * w1 + self.p2 * w2 + self.p3 * w3
    }

    /// First derivative (tangent direction and speed) at parameter `t`
    ///
    /// `B'(t) = 3(1−t)²(P1−P0) + 6(1−t)t(P2−P1) + 3t²(P3−P2)`
    #[inline]
    pub fn derivative(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Unit tangent at `t`, or zero where the derivative vanishes
    #[inline]
    pub fn unit_tangent(&self, t: f32) -> Vec2 {
        normalize(self.derivative(t))
    }

    /// `n + 1` evenly spaced points `B(i/n)` for `i = 0..=n`
    ///
    /// `n == 0` yields the start point only.
    pub fn sample(&self, n: usize) -> Vec<Vec2> {
        sample_params(n).map(|t| self.position(t)).collect()
    }

    /// `n + 1` tangent segments `(B(t), B(t) + length · unit(B'(t)))`
    pub fn sample_tangents(&self, n: usize, length: f32) -> Vec<(Vec2, Vec2)> {
        sample_params(n)
            .map(|t| {
                let p = self.position(t);
                (p, p + self.unit_tangent(t) * length)
            })
            .collect()
    }

    /// Control points in order `[p0, p1, p2, p3]`
    pub fn points(&self) -> [Vec2; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }
}

/// Cubic Bernstein weights at `t`
#[inline]
pub fn bernstein(t: f32) -> [f32; 4] {
    let u = 1.0 - t;
    [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t]
}

/// Unit vector in the direction of `v`, or zero for the zero vector
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// Parameters `i / n` for `i = 0..=n`; the last value is exactly 1
fn sample_params(n: usize) -> impl Iterator<Item = f32> {
    (0..=n).map(move |i| if n == 0 { 0.0 } else { i as f32 / n as f32 })
}
