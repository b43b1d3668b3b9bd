//! Latent fundamental value process.

use rand::prelude::*;
use rand_distr::StandardNormal;

/// Random-walk fundamental: `S_{t+1} = S_t + sigma * eps`, `eps ~ N(0,1)`.
///
/// The value is real and unbounded; informed traders observe it directly,
/// and consumers round to integer ticks at the quoting boundary. Seeded
/// for reproducibility.
#[derive(Debug, Clone)]
pub struct FundamentalProcess {
    value: f64,
    sigma: f64,
    tick: u64,
    rng: StdRng,
}

impl FundamentalProcess {
    pub fn new(initial_value: f64, sigma: f64, seed: u64) -> Self {
        Self {
            value: initial_value,
            sigma,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance one tick and return the new value
    pub fn advance(&mut self) -> f64 {
        let eps: f64 = self.rng.sample(StandardNormal);
        self.value += self.sigma * eps;
        self.tick += 1;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_under_seed() {
        let mut a = FundamentalProcess::new(100.0, 0.05, 42);
        let mut b = FundamentalProcess::new(100.0, 0.05, 42);

        for _ in 0..100 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn test_zero_sigma_is_constant() {
        let mut process = FundamentalProcess::new(100.0, 0.0, 7);
        for _ in 0..10 {
            assert_eq!(process.advance(), 100.0);
        }
        assert_eq!(process.ticks_elapsed(), 10);
    }

    #[test]
    fn test_step_scale_tracks_sigma() {
        let mut process = FundamentalProcess::new(0.0, 0.05, 11);
        let mut previous = 0.0;
        let mut sq_sum = 0.0;
        let n = 10_000;
        for _ in 0..n {
            let value = process.advance();
            let step = value - previous;
            sq_sum += step * step;
            previous = value;
        }
        let realized_sigma = (sq_sum / n as f64).sqrt();
        assert!(
            (realized_sigma - 0.05).abs() < 0.005,
            "realized step std {realized_sigma} far from 0.05"
        );
    }
}
