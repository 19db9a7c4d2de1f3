//! Frame dispatch: one camera ray per pixel, traced in parallel tiles.
//!
//! Every pixel is a pure function of (pixel, frame time, frame inputs), so
//! tile size, thread count and scheduling order never change the image.

use std::time::Instant;

use glint_core::Color;
use glint_math::{CameraParams, Ray, UVec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::integrator::trace_path;
use crate::{Frame, Sampler};

/// RGBA output of a frame, alpha fixed at one.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::W; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = ((bucket.y + row as u32) * self.width + bucket.x) as usize;
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(color.truncate()));
        }
        bytes
    }

    /// Convert to an 8-bit image.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y).truncate()))
        })
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let encode = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [encode(color.x), encode(color.y), encode(color.z), 255]
}

/// Build the world-space camera ray through pixel (x, y).
///
/// Row 0 is the top of the image.
pub fn camera_ray(camera: &CameraParams, x: u32, y: u32, width: u32, height: u32) -> Ray {
    let u = (x as f32 + camera.pixel_offset.x) / width as f32;
    let v = (y as f32 + camera.pixel_offset.y) / height as f32;
    let ndc = Vec3::new(u * 2.0 - 1.0, 1.0 - v * 2.0, 0.0);

    let view_point = camera.inverse_projection.project_point3(ndc);
    let direction = camera.camera_to_world.transform_vector3(view_point).normalize();
    Ray::new(camera.position, direction)
}

/// Trace one pixel.
pub fn render_pixel(frame: &Frame, x: u32, y: u32) -> Vec4 {
    let settings = frame.settings;
    let ray = camera_ray(frame.camera, x, y, settings.width, settings.height);
    let mut sampler = Sampler::new(UVec2::new(x, y), settings.time);
    trace_path(ray, frame, &mut sampler).extend(1.0)
}

/// Render a frame in parallel with the default bucket size.
pub fn render_frame(frame: &Frame) -> FrameBuffer {
    render_frame_with_buckets(frame, DEFAULT_BUCKET_SIZE)
}

/// Render a frame in parallel, one rayon task per bucket.
pub fn render_frame_with_buckets(frame: &Frame, bucket_size: u32) -> FrameBuffer {
    let settings = frame.settings;
    let start = Instant::now();
    let buckets = generate_buckets(settings.width, settings.height, bucket_size);

    log::debug!(
        "Frame settings: {} bounces, high quality {}, time {}",
        settings.max_bounces,
        settings.high_quality,
        settings.time
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, frame)))
        .collect();

    let mut image = FrameBuffer::new(settings.width, settings.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!(
        "Rendered {}x{} frame in {} buckets ({:.2?})",
        settings.width,
        settings.height,
        results.len(),
        start.elapsed()
    );

    image
}

/// Render a frame on the calling thread, row by row.
pub fn render_frame_serial(frame: &Frame) -> FrameBuffer {
    let settings = frame.settings;
    let mut image = FrameBuffer::new(settings.width, settings.height);

    for y in 0..settings.height {
        for x in 0..settings.width {
            image.set(x, y, render_pixel(frame, x, y));
        }
    }

    image
}
