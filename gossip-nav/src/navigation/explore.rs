//! Random exploration legs
//!
//! When a seeker reaches its waypoint without a better lead it picks a
//! uniformly random heading in [-π, π] and an exponentially distributed leg
//! length. Seeded like the simulator noise sources: seed 0 draws from entropy,
//! anything else is reproducible.

use crate::error::{Error, Result};
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Exp, Uniform};
use std::f32::consts::PI;

/// Draws `(heading, distance)` exploration legs
#[derive(Clone)]
pub struct LegSampler {
    rng: SmallRng,
    heading: Uniform<f32>,
    length: Exp<f32>,
}

impl LegSampler {
    /// Create a sampler
    ///
    /// # Arguments
    /// * `seed` - 0 for entropy, otherwise deterministic
    /// * `mean_distance` - Mean leg length, must be positive
    pub fn new(seed: u64, mean_distance: f32) -> Result<Self> {
        if !(mean_distance.is_finite() && mean_distance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "exploration mean distance must be positive, got {}",
                mean_distance
            )));
        }

        let length = Exp::new(1.0 / mean_distance)
            .map_err(|e| Error::InvalidParameter(format!("exploration distribution: {}", e)))?;

        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };

        Ok(Self {
            rng,
            heading: Uniform::new_inclusive(-PI, PI),
            length,
        })
    }

    /// Next `(heading, distance)` leg
    pub fn sample(&mut self) -> (f32, f32) {
        let heading = self.heading.sample(&mut self.rng);
        let distance = self.length.sample(&mut self.rng);
        (heading, distance)
    }
}

impl std::fmt::Debug for LegSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegSampler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_seed() {
        let mut a = LegSampler::new(42, 150.0).unwrap();
        let mut b = LegSampler::new(42, 150.0).unwrap();

        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_leg_ranges_and_mean() {
        let mut sampler = LegSampler::new(7, 150.0).unwrap();
        let trials = 20_000;
        let mut total = 0.0f64;

        for _ in 0..trials {
            let (heading, distance) = sampler.sample();
            assert!((-PI..=PI).contains(&heading));
            assert!(distance >= 0.0);
            total += distance as f64;
        }

        let mean = total / trials as f64;
        assert!((mean - 150.0).abs() < 10.0, "mean={}", mean);
    }

    #[test]
    fn test_rejects_bad_mean() {
        assert!(LegSampler::new(1, 0.0).is_err());
        assert!(LegSampler::new(1, -5.0).is_err());
        assert!(LegSampler::new(1, f32::NAN).is_err());
    }
}
