use super::epsilon_greedy::EpsilonGreedy;
use super::errors::PolicyError;
use super::estimates::Population;
use super::pursuit::Pursuit;

use crate::testbed::Play;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum PolicyType {
    EpsilonGreedy { epsilon: f64 },
    Pursuit { beta: f64 },
}

impl PolicyType {
    pub fn into_inner(
        self,
        arms: usize,
        bandits: usize,
    ) -> Result<Box<dyn Policy + Send>, PolicyError> {
        match self {
            PolicyType::EpsilonGreedy { epsilon } => {
                Ok(Box::new(EpsilonGreedy::new(epsilon, arms)?))
            }
            PolicyType::Pursuit { beta } => Ok(Box::new(Pursuit::new(beta, arms, bandits)?)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PolicyType::EpsilonGreedy { epsilon } => format!("e-greedy({epsilon})"),
            PolicyType::Pursuit { beta } => format!("pursuit({beta})"),
        }
    }
}

/// Action selection over a population of benches.
///
/// `greedy_arm` is always the argmax of the current estimates of `bandit`.
pub trait Policy: Send {
    fn policy_type(&self) -> PolicyType;
    fn select(
        &mut self,
        bandit: usize,
        greedy_arm: usize,
        rng: &mut SmallRng,
    ) -> Result<usize, PolicyError>;
    fn learn(&mut self, _bandit: usize, _greedy_arm: usize) -> Result<(), PolicyError> {
        Ok(())
    }
}

/// Plays one bench of the population once under `policy`.
pub fn step(
    policy: &mut dyn Policy,
    population: &mut Population,
    bandit: usize,
    rng: &mut SmallRng,
) -> Result<Play, PolicyError> {
    let arm_id = policy.select(bandit, population.greedy_arm(bandit)?, rng)?;
    let play = population.play(bandit, arm_id, rng)?;
    policy.learn(bandit, population.greedy_arm(bandit)?)?;

    Ok(play)
}
