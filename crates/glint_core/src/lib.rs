//! Glint Core - frozen per-frame data for the Glint path tracer.
//!
//! This crate provides:
//!
//! - **Materials**: albedo/specular/smoothness surface parameters
//! - **Records**: fixed-layout sphere and point-light records
//! - **Scene bookkeeping**: `SceneBuilder` with stable ids, committed into
//!   immutable `SceneSnapshot`s once per frame
//! - **Frame settings**: resolution, bounces, sun, ambient and fog
//! - **Environments**: skybox sources sampled on ray misses
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{Material, SceneBuilder, Sphere};
//!
//! let mut builder = SceneBuilder::new();
//! builder.add_sphere(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Material::default()))?;
//! let snapshot = builder.commit();
//! ```

pub mod environment;
pub mod material;
pub mod records;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use environment::{
    Environment, EnvironmentError, EnvironmentResult, EquirectSkybox, SkyGradient,
    UniformEnvironment,
};
pub use material::{luminance, Color, Material};
pub use records::{PointLightRecord, SphereRecord};
pub use scene::{
    LightId, PointLight, ScatterParams, SceneBuilder, SceneDescription, SceneError, SceneResult,
    SceneSnapshot, Sphere, SphereId,
};
pub use settings::{DirectionalLight, Fog, FrameSettings, SettingsError, SettingsResult, SkyFog};
