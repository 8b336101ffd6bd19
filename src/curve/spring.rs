//! Damped spring integration for the dynamic control points
//!
//! Each interior control point is pulled toward its target by a Hookean
//! spring with linear damping, integrated with semi-implicit Euler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DAMPING, DEFAULT_K, POSITION_SCALE};

/// Spring constants, read fresh on every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Spring constant
    pub k: f32,
    /// Linear velocity damping
    pub damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            damping: DEFAULT_DAMPING,
        }
    }
}

/// Position and velocity of one dynamic control point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpringState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl SpringState {
    /// A point at rest
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }

    /// Advance this point one step toward `target`
    #[inline]
    pub fn advance(&mut self, target: Vec2, dt: f32, physics: &PhysicsConfig) {
        advance(self, target, dt, physics.k, physics.damping);
    }

    /// Kinetic plus spring potential energy relative to `target`
    pub fn energy(&self, target: Vec2, k: f32) -> f32 {
        0.5 * self.vel.length_squared() + 0.5 * k * (self.pos - target).length_squared()
    }
}

/// Advance `state` one step toward `target`
///
/// 1. `a = −k·(pos − target) − damping·vel`
/// 2. `vel += a·dt`
/// 3. `pos += vel·dt·POSITION_SCALE`
///
/// Nothing is clamped. Non-finite inputs propagate.
#[inline]
pub fn advance(state: &mut SpringState, target: Vec2, dt: f32, k: f32, damping: f32) {
    let accel = -k * (state.pos - target) - damping * state.vel;
    state.vel += accel * dt;
    state.pos += state.vel * dt * POSITION_SCALE;
}
