use super::errors::PolicyError;

use crate::testbed::{Play, TestBench};

use rand::Rng;
use std::cmp::Ordering;

/// Bandit population with its running value estimates.
///
/// Estimates are stored row-major, one row of `arms` values per bench.
#[derive(Clone, Debug)]
pub struct Population {
    benches: Vec<TestBench>,
    arms: usize,
    estimates: Vec<f64>,
    greedy_arms: Vec<usize>,
}

impl Population {
    pub fn new<R: Rng + ?Sized>(
        bandits: usize,
        arms: usize,
        rng: &mut R,
    ) -> Result<Self, PolicyError> {
        let benches = (0..bandits)
            .map(|_| TestBench::new(arms, rng))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_benches(benches)
    }

    pub fn from_benches(benches: Vec<TestBench>) -> Result<Self, PolicyError> {
        let arms = benches
            .first()
            .map(TestBench::len)
            .ok_or_else(|| PolicyError::InvalidParameter("population is empty".to_string()))?;

        if let Some(bench) = benches.iter().find(|bench| bench.len() != arms) {
            return Err(PolicyError::InvalidParameter(format!(
                "all benches must have {arms} arms, found one with {}",
                bench.len()
            )));
        }

        Ok(Self {
            arms,
            estimates: vec![0.0; benches.len() * arms],
            greedy_arms: vec![0; benches.len()],
            benches,
        })
    }

    pub fn len(&self) -> usize {
        self.benches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benches.is_empty()
    }

    pub fn arms(&self) -> usize {
        self.arms
    }

    fn unknown(&self, bandit: usize) -> PolicyError {
        PolicyError::UnknownBandit {
            bandit,
            bandits: self.benches.len(),
        }
    }

    pub fn bench(&self, bandit: usize) -> Result<&TestBench, PolicyError> {
        self.benches.get(bandit).ok_or_else(|| self.unknown(bandit))
    }

    pub fn greedy_arm(&self, bandit: usize) -> Result<usize, PolicyError> {
        self.greedy_arms
            .get(bandit)
            .copied()
            .ok_or_else(|| self.unknown(bandit))
    }

    pub fn estimates(&self, bandit: usize) -> Result<&[f64], PolicyError> {
        let start = bandit * self.arms;
        self.estimates
            .get(start..start + self.arms)
            .ok_or_else(|| self.unknown(bandit))
    }

    /// Plays `arm_id` on one bench, folds the reward into the sample mean of
    /// that arm and refreshes the greedy arm of the bench.
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        bandit: usize,
        arm_id: usize,
        rng: &mut R,
    ) -> Result<Play, PolicyError> {
        let bandits = self.benches.len();
        let play = self
            .benches
            .get_mut(bandit)
            .ok_or(PolicyError::UnknownBandit { bandit, bandits })?
            .play(arm_id, rng)?;

        let start = bandit * self.arms;
        let row = &mut self.estimates[start..start + self.arms];
        row[arm_id] += (play.reward - row[arm_id]) / play.pulls as f64;

        self.greedy_arms[bandit] = argmax(row);

        Ok(play)
    }
}

// lowest index wins on ties
pub(super) fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_value), (i, &value)| {
            match value.partial_cmp(&best_value) {
                Some(Ordering::Greater) => (i, value),
                _ => (best, best_value),
            }
        })
        .0
}
