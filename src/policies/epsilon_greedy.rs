use super::errors::PolicyError;
use super::policy::{Policy, PolicyType};

use rand::{rngs::SmallRng, Rng};

#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    arms: usize,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, arms: usize) -> Result<Self, PolicyError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(PolicyError::InvalidParameter(format!(
                "epsilon must be in [0, 1], got {epsilon}"
            )));
        }
        if arms == 0 {
            return Err(PolicyError::InvalidParameter(
                "arms must be positive".to_string(),
            ));
        }

        Ok(Self { epsilon, arms })
    }
}

impl Policy for EpsilonGreedy {
    fn policy_type(&self) -> PolicyType {
        PolicyType::EpsilonGreedy {
            epsilon: self.epsilon,
        }
    }

    fn select(
        &mut self,
        _bandit: usize,
        greedy_arm: usize,
        rng: &mut SmallRng,
    ) -> Result<usize, PolicyError> {
        if self.arms < 2 || rng.random::<f64>() >= self.epsilon {
            return Ok(greedy_arm);
        }

        // uniform over the arms other than the greedy one
        let arm_id = rng.random_range(0..self.arms - 1);
        Ok(if arm_id >= greedy_arm {
            arm_id + 1
        } else {
            arm_id
        })
    }
}
