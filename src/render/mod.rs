//! Render list for one frame
//!
//! The engine does not draw. It hands the renderer a [`FrameGeometry`]:
//! the sampled curve, tangent segments and control-point markers.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CURVE_SEGMENTS, MARKER_RADIUS, TANGENT_LENGTH, TANGENT_SEGMENTS};
use crate::curve::CurveSnapshot;

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
pub const CURVE_COLOR: Color = [0.0, 1.0, 0.0, 1.0];
pub const TANGENT_COLOR: Color = [1.0, 1.0, 0.0, 1.0];
pub const ENDPOINT_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
pub const INTERIOR_COLOR: Color = [0.0, 0.0, 1.0, 1.0];

pub const CURVE_WIDTH: f32 = 3.0;
pub const TANGENT_WIDTH: f32 = 2.0;

/// Sampling density and marker size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub curve_segments: usize,
    pub tangent_segments: usize,
    pub tangent_length: f32,
    pub marker_radius: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            curve_segments: CURVE_SEGMENTS,
            tangent_segments: TANGENT_SEGMENTS,
            tangent_length: TANGENT_LENGTH,
            marker_radius: MARKER_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// P0 and P3
    Endpoint,
    /// P1 and P2
    Interior,
}

impl MarkerKind {
    pub fn color(&self) -> Color {
        match self {
            MarkerKind::Endpoint => ENDPOINT_COLOR,
            MarkerKind::Interior => INTERIOR_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: MarkerKind,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameGeometry {
    pub curve: Vec<Vec2>,
    pub tangents: Vec<(Vec2, Vec2)>,
    /// Markers in control-point order P0, P1, P2, P3
    pub markers: Vec<Marker>,
}

impl FrameGeometry {
    /// Build the render list; empty until the curve has been laid out
    pub fn build(snapshot: &CurveSnapshot, settings: &RenderSettings) -> Self {
        if !snapshot.laid_out {
            return Self::default();
        }

        let kinds = [
            MarkerKind::Endpoint,
            MarkerKind::Interior,
            MarkerKind::Interior,
            MarkerKind::Endpoint,
        ];
        let markers = snapshot
            .control_points()
            .points()
            .into_iter()
            .zip(kinds)
            .map(|(pos, kind)| Marker {
                pos,
                radius: settings.marker_radius,
                kind,
            })
            .collect();

        Self {
            curve: snapshot.sample_curve(settings.curve_segments),
            tangents: snapshot.sample_tangents(settings.tangent_segments, settings.tangent_length),
            markers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }
}

/// CSS color string for a [`Color`]
pub fn css_color(c: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(c[0]),
        channel(c[1]),
        channel(c[2]),
        c[3].clamp(0.0, 1.0)
    )
}
