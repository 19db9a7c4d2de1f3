use crate::Vec3;

/// A ray in 3D space carrying light energy.
///
/// `energy` is the multiplicative throughput of the path this ray belongs to.
/// It starts at one for camera rays and is attenuated at every bounce; a ray
/// whose energy is zero contributes nothing further.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub energy: Vec3,
}

impl Ray {
    /// Create a new ray with full throughput.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            energy: Vec3::ONE,
        }
    }

    /// Create a ray with an explicit throughput.
    pub fn with_energy(origin: Vec3, direction: Vec3, energy: Vec3) -> Self {
        Self {
            origin,
            direction,
            energy,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Sum of the RGB throughput channels.
    #[inline]
    pub fn total_energy(&self) -> f32 {
        self.energy.x + self.energy.y + self.energy.z
    }

    /// Zero the throughput, ending the path.
    #[inline]
    pub fn terminate(&mut self) {
        self.energy = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.energy, Vec3::ONE);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_total_energy() {
        let ray = Ray::with_energy(Vec3::ZERO, Vec3::Z, Vec3::new(0.5, 0.25, 0.125));
        assert_eq!(ray.total_energy(), 0.875);
    }

    #[test]
    fn test_terminate() {
        let mut ray = Ray::new(Vec3::ZERO, Vec3::Y);
        ray.terminate();

        assert_eq!(ray.energy, Vec3::ZERO);
        assert_eq!(ray.total_energy(), 0.0);
        // Geometry is untouched
        assert_eq!(ray.direction, Vec3::Y);
    }
}
