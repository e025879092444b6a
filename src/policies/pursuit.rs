use super::errors::PolicyError;
use super::policy::{Policy, PolicyType};

use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    rngs::SmallRng,
};

// tolerance on the row sum before sampling
const SUM_TOLERANCE: f64 = 1e-6;

/// Pursuit method: per-bench action preferences chase the greedy arm.
///
/// `beta` has to stay small, otherwise the preferences lock onto whatever arm
/// looks best after the first few plays.
#[derive(Clone, Debug)]
pub struct Pursuit {
    beta: f64,
    arms: usize,
    preferences: Vec<f64>,
}

impl Pursuit {
    pub fn new(beta: f64, arms: usize, bandits: usize) -> Result<Self, PolicyError> {
        if !(beta > 0.0 && beta <= 1.0) {
            return Err(PolicyError::InvalidParameter(format!(
                "beta must be in (0, 1], got {beta}"
            )));
        }
        if arms == 0 || bandits == 0 {
            return Err(PolicyError::InvalidParameter(format!(
                "arms and bandits must be positive, got {arms} arms and {bandits} bandits"
            )));
        }

        Ok(Self {
            beta,
            arms,
            preferences: vec![1.0 / arms as f64; arms * bandits],
        })
    }

    fn unknown(&self, bandit: usize) -> PolicyError {
        PolicyError::UnknownBandit {
            bandit,
            bandits: self.preferences.len() / self.arms,
        }
    }

    pub fn preferences(&self, bandit: usize) -> Result<&[f64], PolicyError> {
        let start = bandit * self.arms;
        self.preferences
            .get(start..start + self.arms)
            .ok_or_else(|| self.unknown(bandit))
    }

    fn row_mut(&mut self, bandit: usize) -> Result<&mut [f64], PolicyError> {
        let start = bandit * self.arms;
        let error = self.unknown(bandit);
        self.preferences
            .get_mut(start..start + self.arms)
            .ok_or(error)
    }

    fn validate(&self, bandit: usize) -> Result<&[f64], PolicyError> {
        let row = self.preferences(bandit)?;
        if let Some(p) = row.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(PolicyError::InvalidDistribution {
                bandit,
                reason: format!("invalid probability {p}"),
            });
        }

        let total: f64 = row.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(PolicyError::InvalidDistribution {
                bandit,
                reason: format!("probabilities sum to {total}"),
            });
        }

        Ok(row)
    }
}

impl Policy for Pursuit {
    fn policy_type(&self) -> PolicyType {
        PolicyType::Pursuit { beta: self.beta }
    }

    fn select(
        &mut self,
        bandit: usize,
        _greedy_arm: usize,
        rng: &mut SmallRng,
    ) -> Result<usize, PolicyError> {
        let row = self.validate(bandit)?;

        let distribution = WeightedIndex::new(row).map_err(|e| {
            PolicyError::InvalidDistribution {
                bandit,
                reason: e.to_string(),
            }
        })?;

        Ok(distribution.sample(rng))
    }

    fn learn(&mut self, bandit: usize, greedy_arm: usize) -> Result<(), PolicyError> {
        let beta = self.beta;
        let row = self.row_mut(bandit)?;

        // every arm moves: the greedy one toward 1, the others toward 0
        for (arm_id, p) in row.iter_mut().enumerate() {
            let target = if arm_id == greedy_arm { 1.0 } else { 0.0 };
            *p += beta * (target - *p);
        }

        let total: f64 = row.iter().sum();
        row.iter_mut().for_each(|p| *p /= total);

        Ok(())
    }
}
