//! Fixed-layout records handed to the tracer once per frame.
//!
//! Both records are plain `#[repr(C)]` data with no padding, so a host can
//! upload a snapshot's slices to a GPU buffer with `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};
use glint_math::{Vec3, Vec4};

use crate::material::Material;

/// A sphere as the tracer sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SphereRecord {
    pub position: Vec3,
    pub radius: f32,
    pub albedo: Vec3,
    pub specular: Vec3,
    pub smoothness: f32,
}

impl SphereRecord {
    /// Size of one record in bytes.
    pub const STRIDE: usize = std::mem::size_of::<SphereRecord>();

    pub fn new(position: Vec3, radius: f32, material: Material) -> Self {
        Self {
            position,
            radius,
            albedo: material.albedo,
            specular: material.specular,
            smoothness: material.smoothness,
        }
    }

    /// Copy of this sphere's surface parameters.
    #[inline]
    pub fn material(&self) -> Material {
        Material {
            albedo: self.albedo,
            specular: self.specular,
            smoothness: self.smoothness,
        }
    }
}

/// A point light as the tracer sees it.
///
/// `color.w` is the intensity multiplier.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightRecord {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec4,
}

impl PointLightRecord {
    /// Size of one record in bytes.
    pub const STRIDE: usize = std::mem::size_of::<PointLightRecord>();

    pub fn new(position: Vec3, radius: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            radius,
            color: color.extend(intensity),
        }
    }

    /// RGB color scaled by intensity.
    #[inline]
    pub fn radiance(&self) -> Vec3 {
        self.color.truncate() * self.color.w
    }
}
