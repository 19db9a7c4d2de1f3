//! The per-pixel bounce loop.

use glint_core::{Color, SkyFog};
use glint_math::{Ray, Vec3};

use crate::hit::trace;
use crate::shading::shade;
use crate::{Frame, Sampler};

/// Paths whose summed RGB throughput drops below this stop bouncing.
pub const ENERGY_THRESHOLD: f32 = 0.001;

/// Result of integrating one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Fogged radiance reaching the camera
    pub color: Color,
    /// Bounces actually traced
    pub bounces: u32,
    /// Last surface point the path hit, if any
    pub last_hit: Option<Vec3>,
}

/// Follow `ray` through the scene for at most `max_bounces` bounces.
///
/// Each bounce adds the ray's current throughput times the shaded light to
/// the result. The loop stops early once the throughput is spent. Fog is
/// applied at the end using the distance from the ray origin to the last
/// surface hit.
pub fn integrate(mut ray: Ray, frame: &Frame, sampler: &mut Sampler) -> PathSample {
    let eye = ray.origin;
    let mut color = Color::ZERO;
    let mut bounces = 0;
    let mut last_hit = None;

    for _ in 0..frame.settings.max_bounces {
        let hit = trace(&ray, frame.scene);
        if let Some(hit) = &hit {
            last_hit = Some(hit.position);
        }

        let throughput = ray.energy;
        color += throughput * shade(&mut ray, hit.as_ref(), frame, sampler);
        bounces += 1;

        if ray.total_energy() < ENERGY_THRESHOLD {
            break;
        }
    }

    let fog = &frame.settings.fog;
    let color = match (last_hit, fog.sky) {
        (Some(position), _) => fog.apply(color, (position - eye).length()),
        (None, SkyFog::Clear) => color,
        (None, SkyFog::Opaque) => fog.apply(color, f32::INFINITY),
    };

    PathSample {
        color,
        bounces,
        last_hit,
    }
}

/// Radiance seen along a camera ray.
pub fn trace_path(ray: Ray, frame: &Frame, sampler: &mut Sampler) -> Color {
    integrate(ray, frame, sampler).color
}
