//! Per-frame globals: resolution, bounce budget, lighting, fog.
//!
//! Settings are plain serde types so hosts can load them from JSON. They are
//! validated once, then shared read-only by every pixel of a frame.

use std::path::Path;

use glint_math::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::Color;

/// Errors that can occur while loading or validating frame settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Output resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("Directional light direction must be a finite non-zero vector")]
    InvalidDirection,

    #[error("Fog density must be finite and non-negative, got {0}")]
    NegativeFogDensity(f32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// What fog does to paths that never hit any geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyFog {
    /// The environment sample is left untouched.
    #[default]
    Clear,
    /// The sky counts as infinitely far away and is fully fogged.
    Opaque,
}

/// Exponential distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
    pub sky: SkyFog,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Color::new(0.7, 0.75, 0.8),
            density: 0.0,
            sky: SkyFog::Clear,
        }
    }
}

impl Fog {
    /// Blend factor toward the fog color at the given distance.
    ///
    /// 0 at distance 0, approaching 1 as distance or density grow.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.density <= 0.0 || distance <= 0.0 {
            return 0.0;
        }
        1.0 - (-self.density * distance).exp()
    }

    /// Blend `color` toward the fog color for a surface `distance` away.
    pub fn apply(&self, color: Color, distance: f32) -> Color {
        color.lerp(self.color, self.factor(distance))
    }
}

/// The single global directional light (the "sun").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    /// Direction the light travels in (unit length after validation)
    pub direction: Vec3,
    /// RGB color, `w` is intensity
    pub color: Vec4,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.3, -1.0, -0.4).normalize(),
            color: Vec4::new(1.0, 0.96, 0.9, 1.0),
        }
    }
}

impl DirectionalLight {
    /// RGB color scaled by intensity.
    #[inline]
    pub fn radiance(&self) -> Vec3 {
        self.color.truncate() * self.color.w
    }
}

/// Everything besides geometry and camera that a frame is traced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Maximum bounces per path; 0 traces nothing
    pub max_bounces: u32,
    /// Stochastic diffuse/specular sampling instead of mirror-only bounces
    pub high_quality: bool,
    /// Monotonic frame time, seeds the per-pixel sampler
    pub time: f32,
    /// Light reaching surfaces that the sun does not
    pub ambient: Color,
    pub fog: Fog,
    pub sun: DirectionalLight,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            max_bounces: 4,
            high_quality: true,
            time: 0.0,
            ambient: Color::splat(0.05),
            fog: Fog::default(),
            sun: DirectionalLight::default(),
        }
    }
}

impl FrameSettings {
    /// Check the settings and normalize the sun direction.
    pub fn validated(mut self) -> SettingsResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::ZeroResolution {
                width: self.width,
                height: self.height,
            });
        }

        let direction = self
            .sun
            .direction
            .try_normalize()
            .ok_or(SettingsError::InvalidDirection)?;
        self.sun.direction = direction;

        if !(self.fog.density >= 0.0 && self.fog.density.is_finite()) {
            return Err(SettingsError::NegativeFogDensity(self.fog.density));
        }

        Ok(self)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: FrameSettings = serde_json::from_str(json)?;
        settings.validated()
    }

    /// Parse and validate settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
