/// An interval of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The open interval (0, max). Hit distances must lie strictly inside it.
    pub fn up_to(max: f32) -> Self {
        Self::new(0.0, max)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Every positive distance.
    pub const POSITIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(0.0, 10.0);
        assert_eq!(interval.min, 0.0);
        assert_eq!(interval.max, 10.0);
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        // Inside
        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));

        // Outside
        assert!(!interval.surrounds(-0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_up_to() {
        let interval = Interval::up_to(3.0);
        assert_eq!(interval, Interval::new(0.0, 3.0));
        assert!(!interval.surrounds(3.0));
    }

    #[test]
    fn test_positive() {
        assert!(Interval::POSITIVE.surrounds(1e-6));
        assert!(Interval::POSITIVE.surrounds(1e30));
        assert!(!Interval::POSITIVE.surrounds(0.0));
        assert!(!Interval::POSITIVE.surrounds(f32::INFINITY));
        assert!(!Interval::POSITIVE.surrounds(f32::NAN));
    }
}
