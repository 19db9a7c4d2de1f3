//! Skybox environments sampled when a ray escapes the scene.

use std::f32::consts::PI;
use std::path::Path;

use glint_math::Vec3;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

use crate::material::Color;

/// Errors that can occur while loading an environment map.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to load environment map {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Environment map has no pixels")]
    Empty,

    #[error("Environment map is {width}x{height} but {len} pixels were supplied")]
    SizeMismatch { width: u32, height: u32, len: usize },
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Radiance arriving from infinitely far away along a direction.
pub trait Environment: Send + Sync {
    /// Sample the environment along a unit `direction`.
    fn sample(&self, direction: Vec3) -> Color;
}

impl<F> Environment for F
where
    F: Fn(Vec3) -> Color + Send + Sync,
{
    fn sample(&self, direction: Vec3) -> Color {
        self(direction)
    }
}

/// A constant-color environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformEnvironment(pub Color);

impl Environment for UniformEnvironment {
    fn sample(&self, _direction: Vec3) -> Color {
        self.0
    }
}

/// Vertical white-to-blue sky gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Environment for SkyGradient {
    fn sample(&self, direction: Vec3) -> Color {
        let a = 0.5 * (direction.normalize_or_zero().y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

/// A latitude/longitude (equirectangular) environment image.
///
/// Row 0 is the zenith, the middle row the horizon. Pixels are linear RGB.
#[derive(Debug, Clone)]
pub struct EquirectSkybox {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl EquirectSkybox {
    /// Create a skybox from linear pixels in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> EnvironmentResult<Self> {
        if width == 0 || height == 0 {
            return Err(EnvironmentError::Empty);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(EnvironmentError::SizeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert a decoded image. HDR images are taken as linear, everything
    /// else is treated as sRGB.
    pub fn from_image(image: &DynamicImage) -> EnvironmentResult<Self> {
        let pixels = match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => image
                .to_rgb32f()
                .pixels()
                .map(|p| Color::new(p[0], p[1], p[2]))
                .collect(),
            _ => image
                .to_rgb8()
                .pixels()
                .map(|p| {
                    Color::new(
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                    )
                })
                .collect(),
        };
        let (width, height) = image.dimensions();
        Self::from_pixels(width, height, pixels)
    }

    /// Load an environment map from disk.
    pub fn open(path: impl AsRef<Path>) -> EnvironmentResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| EnvironmentError::Load {
            path: path.display().to_string(),
            source,
        })?;
        let skybox = Self::from_image(&image)?;

        log::debug!(
            "Loaded environment map: {} ({}x{})",
            path.display(),
            skybox.width,
            skybox.height
        );

        Ok(skybox)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map a unit direction to (u, v) in [0, 1]².
    fn direction_to_uv(direction: Vec3) -> (f32, f32) {
        let u = 0.5 + direction.x.atan2(-direction.z) / (2.0 * PI);
        let v = direction.y.clamp(-1.0, 1.0).acos() / PI;
        (u, v)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Bilinear sample, wrapping horizontally and clamping vertically.
    fn sample_uv(&self, u: f32, v: f32) -> Color {
        let x = u.rem_euclid(1.0) * self.width as f32 - 0.5;
        let y = (v * self.height as f32 - 0.5).clamp(0.0, (self.height - 1) as f32);

        let x_floor = x.floor();
        let fx = x - x_floor;
        let x0 = (x_floor as i64).rem_euclid(self.width as i64) as u32;
        let x1 = (x0 + 1) % self.width;

        let y0 = y.floor() as u32;
        let y1 = (y0 + 1).min(self.height - 1);
        let fy = y - y.floor();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

impl Environment for EquirectSkybox {
    fn sample(&self, direction: Vec3) -> Color {
        let (u, v) = Self::direction_to_uv(direction.normalize_or_zero());
        self.sample_uv(u, v)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_band_skybox() -> EquirectSkybox {
        // Top row red, bottom row blue
        let width = 8;
        let mut pixels = vec![Color::X; width];
        pixels.extend(vec![Color::Z; width]);
        EquirectSkybox::from_pixels(width as u32, 2, pixels).unwrap()
    }

    #[test]
    fn test_uniform_environment() {
        let env = UniformEnvironment(Color::new(0.2, 0.4, 0.6));
        assert_eq!(env.sample(Vec3::Y), Color::new(0.2, 0.4, 0.6));
        assert_eq!(env.sample(Vec3::NEG_X), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_closure_environment() {
        let env = |d: Vec3| d.abs();
        assert_eq!(env.sample(Vec3::NEG_Z), Vec3::Z);
    }

    #[test]
    fn test_sky_gradient() {
        let sky = SkyGradient::default();
        let up = sky.sample(Vec3::Y);
        let down = sky.sample(Vec3::NEG_Y);

        assert!((up - sky.zenith).length() < 1e-6);
        assert!((down - sky.horizon).length() < 1e-6);
    }

    #[test]
    fn test_equirect_poles() {
        let sky = two_band_skybox();
        assert!((sky.sample(Vec3::Y) - Color::X).length() < 1e-5);
        assert!((sky.sample(Vec3::NEG_Y) - Color::Z).length() < 1e-5);
    }

    #[test]
    fn test_equirect_horizon_blends() {
        let sky = two_band_skybox();
        let horizon = sky.sample(Vec3::X);
        assert!((horizon - Color::new(0.5, 0.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_equirect_wraps_horizontally() {
        let sky = two_band_skybox();
        // Straight behind the -Z forward axis sits on the u seam
        let behind = sky.sample(Vec3::new(0.0, 0.5, 1.0));
        assert!(behind.is_finite());
    }

    #[test]
    fn test_direction_to_uv() {
        let (u, v) = EquirectSkybox::direction_to_uv(Vec3::NEG_Z);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);

        let (_, v) = EquirectSkybox::direction_to_uv(Vec3::Y);
        assert!(v.abs() < 1e-6);
    }

    #[test]
    fn test_from_pixels_size_mismatch() {
        assert!(matches!(
            EquirectSkybox::from_pixels(4, 4, vec![Color::ONE; 3]),
            Err(EnvironmentError::SizeMismatch { len: 3, .. })
        ));
        assert!(matches!(
            EquirectSkybox::from_pixels(0, 4, Vec::new()),
            Err(EnvironmentError::Empty)
        ));
    }

    #[test]
    fn test_from_image_linearizes_srgb() {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            2,
            1,
            image::Rgb([255, 128, 0]),
        ));
        let sky = EquirectSkybox::from_image(&image).unwrap();
        let c = sky.get_pixel(0, 0);
        assert!((c.x - 1.0).abs() < 1e-3);
        assert!(c.y > 0.1 && c.y < 0.5);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);
    }
}
