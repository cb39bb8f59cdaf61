use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration surface for one trail ribbon. Loadable from JSON preset
/// files as a Bevy asset; missing fields fall back to the defaults below.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Master switch. When false the per-frame update does nothing at all,
    /// freezing the ribbon in place.
    pub enabled: bool,
    /// Texture mode: true ties tiling to travel distance via `motion_delta`,
    /// false ties it to the point index fraction.
    pub scale_texture: bool,
    /// Half-width at the tail (newest point), in world units.
    pub start_width: f32,
    /// Half-width at the head (oldest point), in world units.
    pub end_width: f32,
    /// Easing exponent shaping the taper between the two widths.
    /// Non-negative; 1.0 is a linear taper.
    pub scale_acceleration: f32,
    /// Minimum travel distance before a new point is sampled.
    pub motion_delta: f32,
    /// Maximum age a point may reach before eviction, in seconds.
    pub life_span: f32,
    /// RGBA rendered at the tail (newest point).
    pub start_color: [f32; 4],
    /// RGBA approached at the head (oldest point).
    pub end_color: [f32; 4],
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            scale_texture: true,
            start_width: 0.5,
            end_width: 0.0,
            scale_acceleration: 1.0,
            motion_delta: 0.1,
            life_span: 1.0,
            start_color: [1.0, 1.0, 1.0, 1.0],
            end_color: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

impl TrailSettings {
    /// Reject settings the geometry pipeline cannot run on without producing
    /// NaN or infinite vertices. Callers check this at the boundary (preset
    /// load, live edits) rather than the builder handling bad values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.motion_delta.is_finite() || self.motion_delta < 0.0 {
            return Err(SettingsError::MotionDelta(self.motion_delta));
        }
        if !self.life_span.is_finite() || self.life_span <= 0.0 {
            return Err(SettingsError::LifeSpan(self.life_span));
        }
        if !self.start_width.is_finite()
            || !self.end_width.is_finite()
            || self.start_width < 0.0
            || self.end_width < 0.0
        {
            return Err(SettingsError::Width {
                start: self.start_width,
                end: self.end_width,
            });
        }
        // Negative exponents would evaluate pow(0, negative) at the tail.
        if !self.scale_acceleration.is_finite() || self.scale_acceleration < 0.0 {
            return Err(SettingsError::ScaleAcceleration(self.scale_acceleration));
        }
        Ok(())
    }
}

/// Boundary rejection for malformed trail settings.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SettingsError {
    #[error("motion_delta must be finite and non-negative, got {0}")]
    MotionDelta(f32),
    #[error("life_span must be finite and positive, got {0}")]
    LifeSpan(f32),
    #[error("widths must be finite and non-negative, got start={start} end={end}")]
    Width { start: f32, end: f32 },
    #[error("scale_acceleration must be finite and non-negative, got {0}")]
    ScaleAcceleration(f32),
}
