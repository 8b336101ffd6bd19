//! Mapping external input onto spring targets
//!
//! Tilt and drag are the two writers of the targets. Both are
//! last-writer-wins: each sample simply overwrites the previous targets.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DRAG_SCALE, TARGET1_ANCHOR, TARGET2_ANCHOR, TILT_SENSITIVITY};
use crate::curve::{CurveModel, Size};
use crate::error::Result;
use crate::platform::{Orientation, OrientationSource};

/// Maps device tilt to a pair of targets mirrored about the drawing center
///
/// Roll shifts targets horizontally and pitch vertically. Yaw is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltMapping {
    /// Horizontal offset per radian of roll, as a fraction of the width
    pub x_sensitivity: f32,
    /// Vertical offset per radian of pitch, as a fraction of the height
    pub y_sensitivity: f32,
}

impl Default for TiltMapping {
    fn default() -> Self {
        Self {
            x_sensitivity: TILT_SENSITIVITY,
            y_sensitivity: TILT_SENSITIVITY,
        }
    }
}

impl TiltMapping {
    /// Targets for `sample`, or `None` until the surface has a positive size
    pub fn targets(&self, sample: Orientation, size: Size) -> Option<(Vec2, Vec2)> {
        if !size.is_positive() {
            return None;
        }
        let center = size.center();
        let offset = Vec2::new(
            sample.roll * size.width * self.x_sensitivity,
            sample.pitch * size.height * self.y_sensitivity,
        );
        Some((
            center * TARGET1_ANCHOR + offset,
            center * TARGET2_ANCHOR - offset,
        ))
    }

    /// Write the mapped targets into `model`; returns whether anything changed
    pub fn apply(&self, sample: Orientation, model: &mut CurveModel) -> bool {
        match self.targets(sample, model.size()) {
            Some((target1, target2)) => {
                model.set_targets(target1, target2);
                true
            }
            None => false,
        }
    }
}

/// Maps a pointer drag to targets mirrored through the opposite corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragMapping {
    pub scale: f32,
}

impl Default for DragMapping {
    fn default() -> Self {
        Self { scale: DRAG_SCALE }
    }
}

impl DragMapping {
    pub fn targets(&self, location: Vec2, size: Size) -> (Vec2, Vec2) {
        let scaled = location * self.scale;
        (scaled, Vec2::new(size.width, size.height) - scaled)
    }

    pub fn apply(&self, location: Vec2, model: &mut CurveModel) {
        let (target1, target2) = self.targets(location, model.size());
        model.set_targets(target1, target2);
    }
}

/// Feed every sample from `source` into `model` through `mapping`
///
/// Samples arriving after the model is dropped, or while it is busy, are
/// skipped; the next sample replaces them anyway.
pub fn bind_orientation(
    source: &mut dyn OrientationSource,
    model: &Rc<RefCell<CurveModel>>,
    mapping: TiltMapping,
) -> Result<()> {
    let model = Rc::downgrade(model);
    source.subscribe(Box::new(move |sample| {
        let Some(model) = model.upgrade() else {
            return;
        };
        if let Ok(mut model) = model.try_borrow_mut() {
            mapping.apply(sample, &mut model);
        }
    }))
}
