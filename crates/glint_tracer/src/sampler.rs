//! Per-pixel pseudo-random numbers.
//!
//! A sine hash of the pixel coordinate and a seed. The frame time is hashed
//! once into a per-pixel stream offset in [0, 1); every draw then hashes that
//! offset plus an integer draw index. Successive draws inside a pixel are
//! decorrelated for any frame time, and the whole sequence stays a pure
//! function of (pixel, time).

use glint_math::{UVec2, Vec2};

const HASH_DIRECTION: Vec2 = Vec2::new(12.9898, 78.233);
const HASH_SCALE: f32 = 43758.5453;
const SEED_PHASE: f32 = 0.618_034;
/// Spreads stream offsets so nearby frame times land far apart in the hash.
const STREAM_SPREAD: f32 = 1024.0;

/// Fractional part of a scaled sine of (pixel · direction + seed), in [0, 1).
#[inline]
fn hash(pixel: Vec2, seed: f32) -> f32 {
    let x = (pixel.dot(HASH_DIRECTION) + seed).sin() * HASH_SCALE;
    let value = x - x.floor();
    if value < 1.0 {
        value
    } else {
        0.0
    }
}

/// Deterministic random stream for one pixel of one frame.
#[derive(Debug, Clone)]
pub struct Sampler {
    pixel: Vec2,
    stream: f32,
    draw: u32,
}

impl Sampler {
    /// Seed a stream for `pixel` at frame `time`.
    pub fn new(pixel: UVec2, time: f32) -> Self {
        // Pixel centers keep (0, 0) off the hash's zero
        let pixel = pixel.as_vec2() + Vec2::splat(0.5);
        Self {
            pixel,
            stream: hash(pixel, time * SEED_PHASE) * STREAM_SPREAD,
            draw: 0,
        }
    }

    /// Next value in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        let value = hash(self.pixel, self.stream + self.draw as f32 * SEED_PHASE);
        self.draw = self.draw.wrapping_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(pixel: UVec2, time: f32, n: usize) -> Vec<f32> {
        let mut sampler = Sampler::new(pixel, time);
        (0..n).map(|_| sampler.next_f32()).collect()
    }

    #[test]
    fn test_range() {
        for y in 0..16 {
            for x in 0..16 {
                for v in draws(UVec2::new(x, y), 3.25, 32) {
                    assert!((0.0..1.0).contains(&v), "{} out of range", v);
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(draws(UVec2::new(7, 3), 1.5, 16), draws(UVec2::new(7, 3), 1.5, 16));
    }

    #[test]
    fn test_successive_draws_differ() {
        let values = draws(UVec2::new(5, 9), 0.0, 8);
        for pair in values.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_large_frame_time_still_decorrelates() {
        // At 2^24 a float step of one no longer changes the time itself
        for time in [16_777_216.0_f32, 1.0e9] {
            let mut values = draws(UVec2::new(5, 9), time, 8);
            assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
            values.sort_by(f32::total_cmp);
            values.dedup();
            assert!(values.len() >= 6, "only {} distinct draws at time {}", values.len(), time);
        }
    }

    #[test]
    fn test_origin_pixel_not_degenerate() {
        let values = draws(UVec2::ZERO, 0.0, 8);
        assert!(values.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_pixels_and_frames_decorrelate() {
        let a = draws(UVec2::new(10, 10), 2.0, 4);
        let b = draws(UVec2::new(11, 10), 2.0, 4);
        let c = draws(UVec2::new(10, 10), 2.016, 4);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mean_is_roughly_uniform() {
        let mut sum = 0.0;
        let mut count = 0;
        for y in 0..64 {
            for x in 0..64 {
                for v in draws(UVec2::new(x, y), 0.75, 4) {
                    sum += v as f64;
                    count += 1;
                }
            }
        }
        let mean = sum / count as f64;
        assert!((mean - 0.5).abs() < 0.05, "mean {}", mean);
    }
}
