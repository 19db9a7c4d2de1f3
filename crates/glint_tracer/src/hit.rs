//! Ray/scene intersection for the ground plane and spheres.

use glint_core::{Material, SceneSnapshot, SphereRecord};
use glint_math::{Interval, Ray, Vec3};

/// The closest surface a ray reaches.
///
/// Holds a value copy of the surface material, never a reference to the
/// primitive that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub position: Vec3,
    /// Outward-facing unit normal
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub distance: f32,
    pub material: Material,
}

/// Distances a new hit must fall strictly inside to replace `best`.
#[inline]
fn acceptable(best: &Option<Hit>) -> Interval {
    match best {
        Some(hit) => Interval::up_to(hit.distance),
        None => Interval::POSITIVE,
    }
}

/// Test the y = 0 ground plane, replacing `best` if it is hit first.
pub fn intersect_ground(ray: &Ray, best: &mut Option<Hit>) {
    if ray.origin.y <= 0.0 {
        return;
    }

    let t = -ray.origin.y / ray.direction.y;
    if !acceptable(best).surrounds(t) {
        return;
    }

    *best = Some(Hit {
        position: ray.at(t),
        normal: Vec3::Y,
        distance: t,
        material: Material::GROUND,
    });
}

/// Test one sphere, replacing `best` if it is hit first.
///
/// The nearer root wins when it is positive; otherwise the farther one is
/// tried, so a ray starting inside the sphere hits its far wall.
pub fn intersect_sphere(ray: &Ray, sphere: &SphereRecord, best: &mut Option<Hit>) {
    let oc = sphere.position - ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return;
    }

    let sqrtd = discriminant.sqrt();
    let ray_t = acceptable(best);

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return;
        }
    }

    let position = ray.at(root);
    *best = Some(Hit {
        position,
        normal: (position - sphere.position).normalize(),
        distance: root,
        material: sphere.material(),
    });
}

/// Find the closest hit along `ray` in the whole scene.
pub fn trace(ray: &Ray, scene: &SceneSnapshot) -> Option<Hit> {
    let mut best = None;
    intersect_ground(ray, &mut best);
    for sphere in scene.spheres() {
        intersect_sphere(ray, sphere, &mut best);
    }
    best
}
