//! Random number source
//!
//! Spawning draws through [`RandomSource`] so tests can script exact rolls.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws used by the spawner
pub trait RandomSource {
    /// Uniform integer in `min..=max`
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;
    /// Uniform real in `[0, 1)`
    fn uniform_real(&mut self) -> f32;
}

/// Seeded PCG generator, reproducible for a given seed
#[derive(Debug, Clone)]
pub struct PcgRandom {
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn uniform_real(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Plays back queued values, clamped into the requested range
///
/// Once the integer queue is empty every draw returns `min`; once the real
/// queue is empty every draw returns 0.5.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedRandom {
    ints: std::collections::VecDeque<i32>,
    reals: std::collections::VecDeque<f32>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(ints: impl IntoIterator<Item = i32>) -> Self {
        Self {
            ints: ints.into_iter().collect(),
            reals: Default::default(),
        }
    }

    pub fn with_reals(mut self, reals: impl IntoIterator<Item = f32>) -> Self {
        self.reals = reals.into_iter().collect();
        self
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.ints.pop_front().unwrap_or(min).clamp(min, max.max(min))
    }

    fn uniform_real(&mut self) -> f32 {
        self.reals.pop_front().unwrap_or(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcg_is_deterministic() {
        let mut a = PcgRandom::new(42);
        let mut b = PcgRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform_int(1, 10), b.uniform_int(1, 10));
            assert_eq!(a.uniform_real(), b.uniform_real());
        }
    }

    #[test]
    fn test_pcg_range_is_inclusive() {
        let mut rng = PcgRandom::new(7);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.uniform_int(1, 4);
            assert!((1..=4).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(rng.uniform_int(5, 5), 5);
    }

    #[test]
    fn test_pcg_real_unit_interval() {
        let mut rng = PcgRandom::new(3);
        for _ in 0..500 {
            let v = rng.uniform_real();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
