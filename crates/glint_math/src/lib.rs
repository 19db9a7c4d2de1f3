// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod camera;
mod interval;
mod ray;

pub use camera::{Camera, CameraParams};
pub use interval::Interval;
pub use ray::Ray;

/// Saturate a scalar to [0, 1].
#[inline]
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
