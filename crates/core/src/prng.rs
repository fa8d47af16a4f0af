//! Deterministic randomness for the particle pipeline.
//!
//! [`Xorshift64`] is a fast, seedable PRNG: same seed always produces the
//! same sequence of values across all platforms (pure integer arithmetic, no
//! floating point in the core algorithm). Every randomized dot parameter is
//! drawn from one instance threaded through the pipeline, so a fixed seed
//! reproduces an entire population.
//!
//! [`pixel_jitter`] is stateless hash noise keyed by a pixel coordinate:
//! repeated samplings of the same image produce identical jitter, which keeps
//! rebuilds at an unchanged canvas size visually stable.

use glam::DVec2;
use std::f64::consts::TAU;

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17) for good statistical
/// properties across the full 64-bit state space. Seed of 0 is automatically
/// replaced with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    ///
    /// If `seed` is 0, uses `0x5EED_DEAD_BEEF_CAFE` as a fallback to avoid
    /// the xorshift all-zeros fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    ///
    /// Implements xorshift64 with shifts (13, 7, 17).
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` divided by 2^53 for
    /// full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed angle in [0, 2π).
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// Returns a uniformly distributed point on a filled disk.
    ///
    /// The radius is drawn as `sqrt(u) * radius` so density is uniform over
    /// area rather than clustered at the center.
    pub fn next_disk(&mut self, center: DVec2, radius: f64) -> DVec2 {
        let theta = self.next_angle();
        let r = self.next_f64().sqrt() * radius;
        center + DVec2::new(theta.cos() * r, theta.sin() * r)
    }
}

/// Deterministic sub-pixel jitter in [-0.5, 0.5]² keyed by a pixel coordinate.
///
/// A 32-bit finalizer hash over the coordinate, evaluated twice with
/// different mixing primes for the two axes. The same (x, y) always maps to
/// the same offset, so repeated image builds do not shimmer.
pub fn pixel_jitter(x: u32, y: u32) -> DVec2 {
    fn hash01(v: u32) -> f64 {
        let mut z = v.wrapping_mul(0x27d4_eb2d);
        z ^= z >> 15;
        z = z.wrapping_mul(0x85eb_ca6b);
        z ^= z >> 13;
        z = z.wrapping_mul(0xc2b2_ae35);
        z ^= z >> 16;
        z as f64 / u32::MAX as f64
    }

    let u = hash01(x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663));
    let v = hash01(x.wrapping_mul(83_492_791) ^ y.wrapping_mul(2_971_215_073));
    DVec2::new(u - 0.5, v - 0.5)
}
