//! Tuning settings
//!
//! Loaded from JSON at startup; missing fields fall back to defaults.
//! Nothing here is ever written back.

use serde::{Deserialize, Serialize};

use crate::curve::PhysicsConfig;
use crate::error::{Error, Result};
use crate::input::{DragMapping, TiltMapping};
use crate::render::RenderSettings;

/// All tunable knobs in one place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsConfig,
    pub tilt: TiltMapping,
    pub drag: DragMapping,
    pub render: RenderSettings,
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject constants the simulation cannot use
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("physics.k", self.physics.k),
            ("physics.damping", self.physics.damping),
            ("tilt.x_sensitivity", self.tilt.x_sensitivity),
            ("tilt.y_sensitivity", self.tilt.y_sensitivity),
            ("drag.scale", self.drag.scale),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{} must be finite", name)));
            }
        }

        let positive = [
            ("render.tangent_length", self.render.tangent_length),
            ("render.marker_radius", self.render.marker_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidSettings(format!("{} must be positive", name)));
            }
        }

        if self.render.curve_segments == 0 || self.render.tangent_segments == 0 {
            return Err(Error::InvalidSettings(
                "segment counts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse settings, falling back to defaults with a warning
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings ({}); using defaults", e);
                Self::default()
            }
        }
    }
}
