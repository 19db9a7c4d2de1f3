//! Surface response: bounce sampling and direct lighting.
//!
//! Each hit picks one of two lobes at random, diffuse or specular, in
//! proportion to the luminance of the matching reflectance, and bends the ray
//! accordingly. Direct light from the sun and point lights is evaluated
//! separately with shadow rays.

use std::f32::consts::TAU;

use glint_core::{Color, Material, PointLightRecord, SceneSnapshot};
use glint_math::{reflect, saturate, Interval, Mat3, Ray, Vec3};

use crate::hit::{trace, Hit};
use crate::{Frame, Sampler};

/// Offset along the normal applied to rays leaving a surface.
pub const SURFACE_BIAS: f32 = 0.001;

/// Phong exponent of the diffuse lobe (cosine-weighted sampling).
const DIFFUSE_ALPHA: f32 = 1.0;

/// Shade one path vertex.
///
/// On a hit, returns the direct light reflected toward the ray and moves the
/// ray onto the next bounce (origin, direction and throughput). On a miss,
/// returns the environment sample and zeroes the ray's throughput.
pub fn shade(ray: &mut Ray, hit: Option<&Hit>, frame: &Frame, sampler: &mut Sampler) -> Color {
    let Some(hit) = hit else {
        let sky = frame.environment.sample(ray.direction);
        ray.terminate();
        return sky;
    };

    let material = if frame.settings.high_quality {
        hit.material.energy_conserving()
    } else {
        hit.material
    };

    let reflected = reflect(ray.direction, hit.normal);
    ray.origin = hit.position + hit.normal * SURFACE_BIAS;

    if frame.settings.high_quality {
        scatter(ray, hit.normal, reflected, &material, sampler);
    } else {
        ray.direction = reflected;
        ray.energy *= material.specular;
    }

    let mut light = sun_light(hit, material.albedo, frame);
    for point in frame.scene.point_lights() {
        light += point_light(hit, material.albedo, point, frame.scene);
    }
    light
}

/// Pick a lobe and sample the next direction from it.
fn scatter(
    ray: &mut Ray,
    normal: Vec3,
    reflected: Vec3,
    material: &Material,
    sampler: &mut Sampler,
) {
    let Some((diffuse_chance, specular_chance)) = material.lobe_chances() else {
        // Nothing is reflected
        ray.direction = reflected;
        ray.terminate();
        return;
    };

    if sampler.next_f32() < diffuse_chance {
        ray.direction = sample_hemisphere(normal, DIFFUSE_ALPHA, sampler);
        let cos_theta = saturate(normal.dot(ray.direction));
        ray.energy *= material.albedo * (2.0 * cos_theta / diffuse_chance);
    } else {
        let alpha = material.phong_alpha();
        ray.direction = sample_hemisphere(reflected, alpha, sampler);
        let normalization = (alpha + 2.0) / (alpha + 1.0);
        let lobe = saturate(normal.dot(ray.direction) * normalization);
        ray.energy *= material.specular * (lobe / specular_chance);
    }
}

/// Sample a direction around `axis` with density proportional to cos^alpha.
pub fn sample_hemisphere(axis: Vec3, alpha: f32, sampler: &mut Sampler) -> Vec3 {
    let cos_theta = sampler.next_f32().powf(1.0 / (alpha + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = TAU * sampler.next_f32();
    let local = Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta);
    tangent_space(axis) * local
}

/// Orthonormal basis whose z axis is `normal`.
fn tangent_space(normal: Vec3) -> Mat3 {
    let helper = if normal.x.abs() > 0.99 { Vec3::Z } else { Vec3::X };
    let tangent = normal.cross(helper).normalize();
    let binormal = normal.cross(tangent).normalize();
    Mat3::from_cols(tangent, binormal, normal)
}

/// True if anything lies along the shadow ray within `max_distance`.
fn occluded(origin: Vec3, direction: Vec3, max_distance: f32, scene: &SceneSnapshot) -> bool {
    let shadow_ray = Ray::new(origin, direction);
    trace(&shadow_ray, scene).is_some_and(|blocker| blocker.distance <= max_distance)
}

/// Light from the directional sun, falling back to ambient in shadow.
pub fn sun_light(hit: &Hit, albedo: Color, frame: &Frame) -> Color {
    let settings = frame.settings;
    let ambient = settings.ambient;
    let to_sun = -settings.sun.direction;

    let n_dot_l = hit.normal.dot(to_sun);
    if n_dot_l <= 0.0 {
        return ambient;
    }

    let origin = hit.position + hit.normal * SURFACE_BIAS;
    if occluded(origin, to_sun, f32::INFINITY, frame.scene) {
        return ambient;
    }

    let direct = albedo * settings.sun.radiance() * saturate(n_dot_l);
    direct.lerp(ambient, 1.0 - n_dot_l)
}

/// Light from one point light with quadratic falloff to zero at its radius.
pub fn point_light(
    hit: &Hit,
    albedo: Color,
    light: &PointLightRecord,
    scene: &SceneSnapshot,
) -> Color {
    let offset = light.position - hit.position;
    let distance = offset.length();
    if !Interval::up_to(light.radius).surrounds(distance) {
        return Color::ZERO;
    }

    let to_light = offset / distance;
    let n_dot_l = saturate(hit.normal.dot(to_light));
    if n_dot_l <= 0.0 {
        return Color::ZERO;
    }

    let origin = hit.position + hit.normal * SURFACE_BIAS;
    if occluded(origin, to_light, (light.position - origin).length(), scene) {
        return Color::ZERO;
    }

    let falloff = (light.radius - distance) / light.radius;
    albedo * light.radiance() * (falloff * falloff) * n_dot_l
}
