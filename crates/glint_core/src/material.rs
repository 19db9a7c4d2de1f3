//! Surface material parameters shared by spheres and the ground plane.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Perceptual luminance weights for R, G and B.
pub const LUMINANCE_WEIGHTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Relative luminance of a color.
#[inline]
pub fn luminance(color: Color) -> f32 {
    color.dot(LUMINANCE_WEIGHTS)
}

/// A surface material: diffuse albedo, specular reflectance and smoothness.
///
/// Smoothness controls how tightly the specular lobe hugs the mirror
/// direction; 0 is rough, 1 is a near-perfect mirror.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse reflectance
    pub albedo: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Specular concentration in [0, 1]
    pub smoothness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Color::splat(0.5),
            specular: Color::splat(0.04),
            smoothness: 0.5,
        }
    }
}

impl Material {
    /// The matte floor every ground-plane hit reports.
    pub const GROUND: Material = Material {
        albedo: Color::new(0.8, 0.8, 0.8),
        specular: Color::new(0.03, 0.03, 0.03),
        smoothness: 0.2,
    };

    /// Create a new material.
    pub fn new(albedo: Color, specular: Color, smoothness: f32) -> Self {
        Self {
            albedo,
            specular,
            smoothness: smoothness.clamp(0.0, 1.0),
        }
    }

    /// A purely diffuse material.
    pub fn diffuse(albedo: Color) -> Self {
        Self::new(albedo, Color::ZERO, 0.0)
    }

    /// A metal: no diffuse term, tinted specular.
    pub fn metal(specular: Color, smoothness: f32) -> Self {
        Self::new(Color::ZERO, specular, smoothness)
    }

    /// Clamp the albedo so that albedo + specular never exceeds one per channel.
    ///
    /// The albedo never drops below zero, even when the specular alone is
    /// brighter than one.
    pub fn energy_conserving(&self) -> Self {
        let headroom = (Color::ONE - self.specular).max(Color::ZERO);
        Self {
            albedo: self.albedo.min(headroom),
            ..*self
        }
    }

    /// Probabilities of picking the diffuse and specular lobe, in that order.
    ///
    /// Both are proportional to the luminance of the matching reflectance and
    /// sum to one. Returns `None` when the surface reflects nothing.
    pub fn lobe_chances(&self) -> Option<(f32, f32)> {
        let diffuse = luminance(self.albedo).max(0.0);
        let specular = luminance(self.specular).max(0.0);
        let sum = diffuse + specular;
        if sum <= 0.0 || !sum.is_finite() {
            return None;
        }
        Some((diffuse / sum, specular / sum))
    }

    /// Phong lobe exponent for this smoothness: 1000^(smoothness²).
    pub fn phong_alpha(&self) -> f32 {
        1000.0_f32.powf(self.smoothness * self.smoothness)
    }
}
