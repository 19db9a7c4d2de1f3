//! Glint Tracer - per-pixel stochastic path tracing.
//!
//! Renders a ground plane and a set of spheres lit by a directional sun and
//! point lights, falling back to an environment on misses. Every pixel is
//! traced independently from read-only frame inputs:
//!
//! - [`hit`]: analytic ray/plane and ray/sphere intersection
//! - [`sampler`]: hash-based per-pixel random numbers
//! - [`shading`]: diffuse/specular bounce sampling and shadowed direct light
//! - [`integrator`]: the bounce loop, energy cutoff and fog
//! - [`renderer`]: camera rays, tiled parallel dispatch and frame output

pub mod bucket;
mod frame;
pub mod hit;
pub mod integrator;
pub mod renderer;
pub mod sampler;
pub mod shading;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use frame::Frame;
pub use hit::{trace, Hit};
pub use integrator::{integrate, trace_path, PathSample, ENERGY_THRESHOLD};
pub use renderer::{
    camera_ray, color_to_rgba, render_frame, render_frame_serial, render_frame_with_buckets,
    render_pixel, FrameBuffer,
};
pub use sampler::Sampler;
