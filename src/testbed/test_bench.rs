use super::arm::Arm;
use super::errors::TestBenchError;

use rand::Rng;

/// Outcome of a single play on a bench.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Play {
    pub reward: f64,
    pub pulls: u64,
    pub optimal: bool,
}

/// One independent n-armed bandit instance.
#[derive(Clone, Debug)]
pub struct TestBench {
    arms: Vec<Arm>,
    optimal_arm: usize,
}

impl TestBench {
    pub fn new<R: Rng + ?Sized>(arms: usize, rng: &mut R) -> Result<Self, TestBenchError> {
        let arms = (0..arms).map(|arm_id| Arm::new(arm_id, rng)).collect();
        Self::from_arms(arms)
    }

    pub fn from_arms(arms: Vec<Arm>) -> Result<Self, TestBenchError> {
        if arms.is_empty() {
            return Err(TestBenchError::InvalidParameter(
                "a bench needs at least one arm".to_string(),
            ));
        }

        // first arm wins on ties
        let mut optimal_arm = 0;
        let mut highest_mean = f64::NEG_INFINITY;
        for (arm_id, arm) in arms.iter().enumerate() {
            if arm.true_mean() > highest_mean {
                optimal_arm = arm_id;
                highest_mean = arm.true_mean();
            }
        }

        Ok(Self { arms, optimal_arm })
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    pub fn arm(&self, arm_id: usize) -> Option<&Arm> {
        self.arms.get(arm_id)
    }

    pub fn play<R: Rng + ?Sized>(&mut self, arm_id: usize, rng: &mut R) -> Result<Play, TestBenchError> {
        let arms = self.arms.len();
        let (reward, pulls) = self
            .arms
            .get_mut(arm_id)
            .ok_or(TestBenchError::IndexOutOfRange { arm_id, arms })?
            .pull(rng);

        Ok(Play {
            reward,
            pulls,
            optimal: arm_id == self.optimal_arm,
        })
    }
}
