//! Scene bookkeeping and the frozen per-frame snapshot.
//!
//! A [`SceneBuilder`] is owned by the host. Objects are added, removed and
//! edited on it between frames; [`SceneBuilder::commit`] then produces an
//! immutable [`SceneSnapshot`] that every pixel worker of the next frame reads.
//! The tracer never sees a half-edited scene.

use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use glint_math::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::{Color, Material};
use crate::records::{PointLightRecord, SphereRecord};

/// Errors raised while editing or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Sphere radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("Point light radius must be finite and positive, got {0}")]
    InvalidLightRadius(f32),

    #[error("Non-finite value in {0}")]
    NonFiniteValue(&'static str),

    #[error("Sphere {0} must lie in [0, 1] per channel, got {1}")]
    InvalidReflectance(&'static str, Vec3),

    #[error("No sphere with id {0}")]
    UnknownSphere(SphereId),

    #[error("No point light with id {0}")]
    UnknownLight(LightId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Stable handle to a sphere in a [`SceneBuilder`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SphereId(u32);

/// Stable handle to a point light in a [`SceneBuilder`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(u32);

impl fmt::Display for SphereId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sphere#{}", self.0)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light#{}", self.0)
    }
}

/// A sphere in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    fn validate(&self) -> SceneResult<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(SceneError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(SceneError::NonFiniteValue("sphere center"));
        }
        if !(self.material.albedo.is_finite()
            && self.material.specular.is_finite()
            && self.material.smoothness.is_finite())
        {
            return Err(SceneError::NonFiniteValue("sphere material"));
        }
        let unit = |c: Color| c.cmpge(Color::ZERO).all() && c.cmple(Color::ONE).all();
        if !unit(self.material.albedo) {
            return Err(SceneError::InvalidReflectance("albedo", self.material.albedo));
        }
        if !unit(self.material.specular) {
            return Err(SceneError::InvalidReflectance("specular", self.material.specular));
        }
        Ok(())
    }

    fn to_record(self) -> SphereRecord {
        let material = Material {
            smoothness: self.material.smoothness.clamp(0.0, 1.0),
            ..self.material
        };
        SphereRecord::new(self.center, self.radius, material)
    }
}

/// A point light with a finite range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    /// Distance at which the light's contribution reaches zero
    pub radius: f32,
    pub color: Color,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, radius: f32, color: Color, intensity: f32) -> Self {
        Self {
            position,
            radius,
            color,
            intensity,
        }
    }

    fn validate(&self) -> SceneResult<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(SceneError::InvalidLightRadius(self.radius));
        }
        if !(self.position.is_finite() && self.color.is_finite() && self.intensity.is_finite()) {
            return Err(SceneError::NonFiniteValue("point light"));
        }
        Ok(())
    }

    fn to_record(self) -> PointLightRecord {
        PointLightRecord::new(self.position, self.radius, self.color, self.intensity)
    }
}

/// The read-only geometry and lights of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    spheres: Vec<SphereRecord>,
    point_lights: Vec<PointLightRecord>,
}

impl SceneSnapshot {
    /// Build a snapshot straight from records.
    ///
    /// Records are trusted as-is; hosts that need validation go through
    /// [`SceneBuilder`].
    pub fn from_records(spheres: Vec<SphereRecord>, point_lights: Vec<PointLightRecord>) -> Self {
        Self {
            spheres,
            point_lights,
        }
    }

    /// A scene holding only the ground plane.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn spheres(&self) -> &[SphereRecord] {
        &self.spheres
    }

    pub fn point_lights(&self) -> &[PointLightRecord] {
        &self.point_lights
    }
}

/// Parameters for [`SceneBuilder::scatter_spheres`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    /// Candidate placements to try
    pub attempts: u32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Spheres are placed inside a disc of this radius around the origin
    pub placement_radius: f32,
    /// Probability that a sphere is metallic
    pub metal_chance: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            attempts: 100,
            radius_min: 3.0,
            radius_max: 8.0,
            placement_radius: 100.0,
            metal_chance: 0.5,
        }
    }
}

/// Caller-owned scene bookkeeping with stable ids and dirty tracking.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    spheres: BTreeMap<SphereId, Sphere>,
    lights: BTreeMap<LightId, PointLight>,
    next_sphere: u32,
    next_light: u32,
    dirty: bool,
    committed: Option<Arc<SceneSnapshot>>,
}

impl SceneBuilder {
    /// Create an empty scene builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere and return its id.
    pub fn add_sphere(&mut self, sphere: Sphere) -> SceneResult<SphereId> {
        sphere.validate()?;
        let id = SphereId(self.next_sphere);
        self.next_sphere += 1;
        self.spheres.insert(id, sphere);
        self.dirty = true;
        Ok(id)
    }

    /// Remove a sphere, returning it.
    pub fn remove_sphere(&mut self, id: SphereId) -> SceneResult<Sphere> {
        let sphere = self
            .spheres
            .remove(&id)
            .ok_or(SceneError::UnknownSphere(id))?;
        self.dirty = true;
        Ok(sphere)
    }

    /// Edit a sphere in place. The edit is rejected (and the sphere left
    /// unchanged) if it produces an invalid sphere.
    pub fn update_sphere(
        &mut self,
        id: SphereId,
        edit: impl FnOnce(&mut Sphere),
    ) -> SceneResult<()> {
        let slot = self
            .spheres
            .get_mut(&id)
            .ok_or(SceneError::UnknownSphere(id))?;
        let mut edited = *slot;
        edit(&mut edited);
        edited.validate()?;
        *slot = edited;
        self.dirty = true;
        Ok(())
    }

    pub fn sphere(&self, id: SphereId) -> Option<&Sphere> {
        self.spheres.get(&id)
    }

    /// Add a point light and return its id.
    pub fn add_point_light(&mut self, light: PointLight) -> SceneResult<LightId> {
        light.validate()?;
        let id = LightId(self.next_light);
        self.next_light += 1;
        self.lights.insert(id, light);
        self.dirty = true;
        Ok(id)
    }

    /// Remove a point light, returning it.
    pub fn remove_point_light(&mut self, id: LightId) -> SceneResult<PointLight> {
        let light = self
            .lights
            .remove(&id)
            .ok_or(SceneError::UnknownLight(id))?;
        self.dirty = true;
        Ok(light)
    }

    /// Edit a point light in place, with the same rules as [`Self::update_sphere`].
    pub fn update_point_light(
        &mut self,
        id: LightId,
        edit: impl FnOnce(&mut PointLight),
    ) -> SceneResult<()> {
        let slot = self
            .lights
            .get_mut(&id)
            .ok_or(SceneError::UnknownLight(id))?;
        let mut edited = *slot;
        edit(&mut edited);
        edited.validate()?;
        *slot = edited;
        self.dirty = true;
        Ok(())
    }

    pub fn point_light(&self, id: LightId) -> Option<&PointLight> {
        self.lights.get(&id)
    }

    /// Force the next commit to rebuild the snapshot.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True if the scene changed since the last commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.committed.is_none()
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Freeze the current scene for the next frame.
    ///
    /// Returns the previous snapshot unchanged when nothing was edited.
    pub fn commit(&mut self) -> Arc<SceneSnapshot> {
        if let (false, Some(snapshot)) = (self.dirty, &self.committed) {
            log::trace!("Scene unchanged, reusing snapshot");
            return Arc::clone(snapshot);
        }

        let snapshot = Arc::new(SceneSnapshot {
            spheres: self.spheres.values().map(|s| s.to_record()).collect(),
            point_lights: self.lights.values().map(|l| l.to_record()).collect(),
        });

        log::debug!(
            "Committed scene snapshot: {} spheres, {} point lights",
            snapshot.spheres.len(),
            snapshot.point_lights.len()
        );

        self.committed = Some(Arc::clone(&snapshot));
        self.dirty = false;
        snapshot
    }

    /// Scatter non-overlapping spheres resting on the ground plane.
    ///
    /// Each attempt picks a random position in the placement disc and drops it
    /// if it would overlap a sphere already in the scene. Returns the ids of
    /// the spheres that were placed.
    pub fn scatter_spheres<R: Rng + ?Sized>(
        &mut self,
        params: &ScatterParams,
        rng: &mut R,
    ) -> SceneResult<Vec<SphereId>> {
        let mut placed = Vec::new();

        for _ in 0..params.attempts {
            let radius = if params.radius_max > params.radius_min {
                rng.gen_range(params.radius_min..=params.radius_max)
            } else {
                params.radius_min
            };

            let angle = rng.gen::<f32>() * TAU;
            let distance = rng.gen::<f32>().sqrt() * params.placement_radius;
            let center = Vec3::new(angle.cos() * distance, radius, angle.sin() * distance);

            let overlaps = self
                .spheres
                .values()
                .any(|other| (other.center - center).length() < other.radius + radius);
            if overlaps {
                continue;
            }

            let color = Color::new(rng.gen(), rng.gen(), rng.gen());
            let smoothness = rng.gen::<f32>();
            let material = if rng.gen::<f32>() < params.metal_chance {
                Material::metal(color, smoothness)
            } else {
                Material::new(color, Color::splat(0.04), smoothness)
            };

            placed.push(self.add_sphere(Sphere::new(center, radius, material))?);
        }

        log::debug!(
            "Scattered {} of {} sphere candidates",
            placed.len(),
            params.attempts
        );

        Ok(placed)
    }
}

/// A serializable scene: spheres, point lights and optional scattering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub spheres: Vec<Sphere>,
    pub point_lights: Vec<PointLight>,
    /// Random spheres added after the explicit ones
    pub scatter: Option<ScatterParams>,
    /// Seed for `scatter`
    pub seed: u64,
}

impl SceneDescription {
    /// Parse a scene description from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a scene description from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Populate a builder from this description, validating every object.
    pub fn build(&self) -> SceneResult<SceneBuilder> {
        let mut builder = SceneBuilder::new();
        for sphere in &self.spheres {
            builder.add_sphere(*sphere)?;
        }
        for light in &self.point_lights {
            builder.add_point_light(*light)?;
        }
        if let Some(params) = &self.scatter {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
            builder.scatter_spheres(params, &mut rng)?;
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere(x: f32) -> Sphere {
        Sphere::new(Vec3::new(x, 1.0, 0.0), 1.0, Material::default())
    }

    fn test_light() -> PointLight {
        PointLight::new(Vec3::new(0.0, 5.0, 0.0), 10.0, Color::ONE, 1.0)
    }

    #[test]
    fn test_add_and_commit() {
        let mut builder = SceneBuilder::new();
        builder.add_sphere(unit_sphere(0.0)).unwrap();
        builder.add_sphere(unit_sphere(3.0)).unwrap();
        builder.add_point_light(test_light()).unwrap();

        let snapshot = builder.commit();
        assert_eq!(snapshot.spheres().len(), 2);
        assert_eq!(snapshot.point_lights().len(), 1);
        assert_eq!(snapshot.spheres()[1].position, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_ids_are_stable_and_not_reused() {
        let mut builder = SceneBuilder::new();
        let a = builder.add_sphere(unit_sphere(0.0)).unwrap();
        let b = builder.add_sphere(unit_sphere(3.0)).unwrap();

        builder.remove_sphere(a).unwrap();
        let c = builder.add_sphere(unit_sphere(6.0)).unwrap();

        assert_ne!(a, c);
        assert_eq!(builder.sphere(b).unwrap().center.x, 3.0);
        assert!(builder.sphere(a).is_none());

        // Snapshot order follows id order
        let snapshot = builder.commit();
        assert_eq!(snapshot.spheres()[0].position.x, 3.0);
        assert_eq!(snapshot.spheres()[1].position.x, 6.0);
    }

    #[test]
    fn test_commit_reuses_clean_snapshot() {
        let mut builder = SceneBuilder::new();
        builder.add_sphere(unit_sphere(0.0)).unwrap();

        let first = builder.commit();
        assert!(!builder.is_dirty());
        let second = builder.commit();
        assert!(Arc::ptr_eq(&first, &second));

        builder.mark_dirty();
        assert!(builder.is_dirty());
        let third = builder.commit();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut builder = SceneBuilder::new();
        let id = builder.add_sphere(unit_sphere(0.0)).unwrap();
        let before = builder.commit();

        builder
            .update_sphere(id, |s| s.center = Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert!(builder.is_dirty());

        let after = builder.commit();
        assert_eq!(before.spheres()[0].position.y, 1.0);
        assert_eq!(after.spheres()[0].position.y, 2.0);
    }

    #[test]
    fn test_invalid_update_rejected() {
        let mut builder = SceneBuilder::new();
        let id = builder.add_sphere(unit_sphere(0.0)).unwrap();
        builder.commit();

        let result = builder.update_sphere(id, |s| s.radius = 0.0);
        assert!(matches!(result, Err(SceneError::InvalidRadius(_))));
        assert_eq!(builder.sphere(id).unwrap().radius, 1.0);
        assert!(!builder.is_dirty());
    }

    #[test]
    fn test_invalid_spheres_rejected() {
        let mut builder = SceneBuilder::new();
        assert!(matches!(
            builder.add_sphere(Sphere::new(Vec3::ZERO, -1.0, Material::default())),
            Err(SceneError::InvalidRadius(_))
        ));
        assert!(matches!(
            builder.add_sphere(Sphere::new(Vec3::splat(f32::NAN), 1.0, Material::default())),
            Err(SceneError::NonFiniteValue(_))
        ));
        assert_eq!(builder.sphere_count(), 0);
    }

    #[test]
    fn test_out_of_range_reflectance_rejected() {
        let mut builder = SceneBuilder::new();
        let bright = Material::new(Color::splat(0.5), Color::new(1.5, 0.2, 0.2), 0.5);
        assert!(matches!(
            builder.add_sphere(Sphere::new(Vec3::Y, 1.0, bright)),
            Err(SceneError::InvalidReflectance("specular", _))
        ));

        let negative = Material::diffuse(Color::new(0.5, -0.1, 0.5));
        assert!(matches!(
            builder.add_sphere(Sphere::new(Vec3::Y, 1.0, negative)),
            Err(SceneError::InvalidReflectance("albedo", _))
        ));

        // Both ends of the unit range are fine
        let id = builder
            .add_sphere(Sphere::new(Vec3::Y, 1.0, Material::metal(Color::ONE, 1.0)))
            .unwrap();
        assert!(matches!(
            builder.update_sphere(id, |s| s.material.albedo = Color::splat(2.0)),
            Err(SceneError::InvalidReflectance("albedo", _))
        ));
        assert_eq!(builder.sphere_count(), 1);
    }

    #[test]
    fn test_unknown_ids() {
        let mut builder = SceneBuilder::new();
        let id = builder.add_point_light(test_light()).unwrap();
        builder.remove_point_light(id).unwrap();

        assert!(matches!(
            builder.remove_point_light(id),
            Err(SceneError::UnknownLight(_))
        ));
        assert!(matches!(
            builder.update_point_light(id, |l| l.intensity = 2.0),
            Err(SceneError::UnknownLight(_))
        ));
        assert_eq!(builder.light_count(), 0);
    }

    #[test]
    fn test_invalid_light_rejected() {
        let mut builder = SceneBuilder::new();
        let light = PointLight::new(Vec3::ZERO, 0.0, Color::ONE, 1.0);
        assert!(matches!(
            builder.add_point_light(light),
            Err(SceneError::InvalidLightRadius(_))
        ));
    }

    #[test]
    fn test_smoothness_clamped_in_record() {
        let mut builder = SceneBuilder::new();
        let mut sphere = unit_sphere(0.0);
        sphere.material.smoothness = 4.0;
        builder.add_sphere(sphere).unwrap();
        assert_eq!(builder.commit().spheres()[0].smoothness, 1.0);
    }

    #[test]
    fn test_scatter_spheres_no_overlap() {
        let mut builder = SceneBuilder::new();
        let mut rng = StdRng::seed_from_u64(3);
        let placed = builder
            .scatter_spheres(&ScatterParams::default(), &mut rng)
            .unwrap();

        assert!(!placed.is_empty());
        assert_eq!(placed.len(), builder.sphere_count());

        let spheres: Vec<_> = placed.iter().map(|id| *builder.sphere(*id).unwrap()).collect();
        for (i, a) in spheres.iter().enumerate() {
            // Resting on the ground
            assert!((a.center.y - a.radius).abs() < 1e-5);
            for b in &spheres[i + 1..] {
                assert!((a.center - b.center).length() >= a.radius + b.radius - 1e-4);
            }
        }
    }

    #[test]
    fn test_description_from_json() {
        let json = r#"{
            "spheres": [
                { "center": [0.0, 1.0, 0.0], "radius": 1.0,
                  "material": {
                      "albedo": [0.8, 0.1, 0.1],
                      "specular": [0.04, 0.04, 0.04],
                      "smoothness": 0.3
                  } }
            ],
            "point_lights": [
                { "position": [2.0, 3.0, 0.0], "radius": 8.0,
                  "color": [1.0, 0.9, 0.8], "intensity": 2.0 }
            ]
        }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let mut builder = description.build().unwrap();
        let snapshot = builder.commit();

        assert_eq!(snapshot.spheres().len(), 1);
        assert_eq!(snapshot.spheres()[0].albedo, Vec3::new(0.8, 0.1, 0.1));
        assert_eq!(snapshot.point_lights()[0].color.w, 2.0);
    }

    #[test]
    fn test_description_scatter_is_seeded() {
        let description = SceneDescription {
            scatter: Some(ScatterParams {
                attempts: 20,
                ..Default::default()
            }),
            seed: 99,
            ..Default::default()
        };
        let a = description.build().unwrap().commit();
        let b = description.build().unwrap().commit();
        assert_eq!(*a, *b);
    }
}
