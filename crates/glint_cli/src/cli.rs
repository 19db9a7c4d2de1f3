use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glint_core::FrameSettings;
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shading quality selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    /// Mirror reflections only
    Low,
    /// Importance-sampled diffuse and glossy lobes
    High,
}

#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render one frame of a sphere scene with a stochastic path tracer")]
pub struct Args {
    /// Scene description (JSON). A scattered demo scene is used when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Frame settings (JSON)
    #[arg(short = 'c', long)]
    pub settings: Option<PathBuf>,

    /// Equirectangular environment map (.hdr, .png, .jpg)
    #[arg(short, long)]
    pub environment: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "frame.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum bounces per path
    #[arg(short, long)]
    pub bounces: Option<u32>,

    /// Frame time, seeds the per-pixel sampler
    #[arg(short, long)]
    pub time: Option<f32>,

    #[arg(short, long, value_enum)]
    pub quality: Option<Quality>,

    /// Seed for the scattered demo scene
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Camera position
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub eye: Option<Vec<f32>>,

    /// Point the camera looks at
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub target: Option<Vec<f32>>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    pub fov: f32,

    /// Bucket size in pixels
    #[arg(long, default_value_t = 32)]
    pub bucket_size: u32,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, mut settings: FrameSettings) -> FrameSettings {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(bounces) = self.bounces {
            settings.max_bounces = bounces;
        }
        if let Some(time) = self.time {
            settings.time = time;
        }
        if let Some(quality) = self.quality {
            settings.high_quality = quality == Quality::High;
        }
        settings
    }
}
