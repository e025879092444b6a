use super::errors::TestBenchError;

use rand::Rng;
use rand_distr::StandardNormal;

const UNIT_NOISE: f64 = 1.0;

/// A stationary reward source with a hidden mean.
#[derive(Clone, Debug)]
pub struct Arm {
    id: usize,
    true_mean: f64,
    pulls: u64,
    noise_std: f64,
}

impl Arm {
    pub fn new<R: Rng + ?Sized>(id: usize, rng: &mut R) -> Self {
        Self {
            id,
            true_mean: rng.sample(StandardNormal),
            pulls: 0,
            noise_std: UNIT_NOISE,
        }
    }

    // noise_std == 0 gives an arm that always pays its mean
    pub fn with_mean(id: usize, true_mean: f64, noise_std: f64) -> Result<Self, TestBenchError> {
        if !true_mean.is_finite() {
            return Err(TestBenchError::InvalidParameter(format!(
                "mean of arm {id} must be finite, got {true_mean}"
            )));
        }
        if !(noise_std.is_finite() && noise_std >= 0.0) {
            return Err(TestBenchError::InvalidParameter(format!(
                "noise of arm {id} must be a non-negative standard deviation, got {noise_std}"
            )));
        }

        Ok(Self {
            id,
            true_mean,
            pulls: 0,
            noise_std,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn true_mean(&self) -> f64 {
        self.true_mean
    }

    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Draws one reward and returns it with the updated pull count.
    pub fn pull<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (f64, u64) {
        let z: f64 = rng.sample(StandardNormal);
        let reward = self.true_mean + self.noise_std * z;
        self.pulls += 1;

        (reward, self.pulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    #[test]
    fn pull_counts() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut arm = Arm::new(3, &mut rng);
        assert_eq!(arm.id(), 3);
        assert_eq!(arm.pulls(), 0);

        for expected in 1..=5 {
            let (_, pulls) = arm.pull(&mut rng);
            assert_eq!(pulls, expected);
        }
        assert_eq!(arm.pulls(), 5);
    }

    #[test]
    fn mean_is_fixed() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut arm = Arm::new(0, &mut rng);
        let mean = arm.true_mean();

        (0..100).for_each(|_| {
            arm.pull(&mut rng);
        });
        assert_eq!(arm.true_mean(), mean);
    }

    #[test]
    fn noiseless_arm() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut arm = Arm::with_mean(0, 10.0, 0.0).unwrap();

        let (reward, pulls) = arm.pull(&mut rng);
        assert_eq!(reward, 10.0);
        assert_eq!(pulls, 1);
    }

    #[test]
    fn rewards_center_on_mean() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut arm = Arm::with_mean(0, 2.0, 1.0).unwrap();

        let n = 20_000;
        let total: f64 = (0..n).map(|_| arm.pull(&mut rng).0).sum();
        assert!((total / n as f64 - 2.0).abs() < 0.05);
    }

    #[test]
    fn invalid_arm() {
        assert!(Arm::with_mean(0, f64::NAN, 1.0).is_err());
        assert!(Arm::with_mean(0, 0.0, -1.0).is_err());
    }
}
