use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glint_core::{
    Color, Environment, EquirectSkybox, FrameSettings, Material, PointLight, ScatterParams,
    SceneDescription, SceneSnapshot, SkyGradient, Sphere,
};
use glint_math::{Camera, Vec3};
use glint_tracer::{render_frame_with_buckets, Frame};
use log::info;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

/// Scattered spheres around a polished centerpiece, lit by two point lights.
fn demo_scene(seed: u64) -> SceneDescription {
    SceneDescription {
        spheres: vec![Sphere::new(
            Vec3::new(0.0, 12.0, 0.0),
            12.0,
            Material::metal(Color::new(0.95, 0.93, 0.88), 0.92),
        )],
        point_lights: vec![
            PointLight::new(Vec3::new(-30.0, 20.0, 30.0), 80.0, Color::new(1.0, 0.8, 0.6), 2.0),
            PointLight::new(Vec3::new(35.0, 15.0, -10.0), 70.0, Color::new(0.5, 0.7, 1.0), 1.5),
        ],
        scatter: Some(ScatterParams::default()),
        seed,
    }
}

fn load_scene(args: &Args) -> Result<Arc<SceneSnapshot>> {
    let description = match &args.scene {
        Some(path) => SceneDescription::from_json_file(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => demo_scene(args.seed),
    };

    let mut builder = description.build().context("Invalid scene description")?;
    info!(
        "Scene: {} spheres, {} point lights",
        builder.sphere_count(),
        builder.light_count()
    );
    Ok(builder.commit())
}

fn load_settings(args: &Args) -> Result<FrameSettings> {
    let settings = match &args.settings {
        Some(path) => FrameSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => FrameSettings::default(),
    };
    args.apply_overrides(settings)
        .validated()
        .context("Invalid frame settings")
}

fn load_environment(args: &Args) -> Result<Box<dyn Environment>> {
    match &args.environment {
        Some(path) => {
            let skybox = EquirectSkybox::open(path)
                .with_context(|| format!("Failed to load environment {}", path.display()))?;
            info!("Environment: {}x{} skybox", skybox.width(), skybox.height());
            Ok(Box::new(skybox))
        }
        None => Ok(Box::new(SkyGradient::default())),
    }
}

fn parse_vec3(values: Option<&[f32]>, fallback: Vec3) -> Result<Vec3> {
    match values {
        None => Ok(fallback),
        Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
        Some(other) => bail!("Expected 3 components, got {}", other.len()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    info!("Starting glint");

    let settings = load_settings(&args)?;
    let scene = load_scene(&args)?;
    let environment = load_environment(&args)?;

    let eye = parse_vec3(args.eye.as_deref(), Vec3::new(0.0, 40.0, 140.0))?;
    let target = parse_vec3(args.target.as_deref(), Vec3::new(0.0, 8.0, 0.0))?;
    let camera = Camera::new(eye, target, settings.aspect())
        .with_fov_degrees(args.fov)
        .params();

    let frame = Frame::new(&scene, &settings, &camera, environment.as_ref());
    let image = render_frame_with_buckets(&frame, args.bucket_size);

    image
        .to_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Saved {}", args.output.display());

    Ok(())
}
