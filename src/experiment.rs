use crate::errors::ExperimentError;
use crate::policies::estimates::Population;
use crate::policies::{step, MaybeSeededRng, Policy, PolicyType};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ExperimentConfig {
    pub arms: usize,
    pub plays: usize,
    pub bandits: usize,
}

impl ExperimentConfig {
    fn validate(&self) -> Result<(), ExperimentError> {
        for (name, value) in [
            ("arms", self.arms),
            ("plays", self.plays),
            ("bandits", self.bandits),
        ] {
            if value == 0 {
                return Err(ExperimentError::InvalidParameter(format!(
                    "{name} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Population averages, one sample per play.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LearningCurves {
    pub average_reward: Vec<f64>,
    pub optimal_action: Vec<f64>,
}

impl LearningCurves {
    fn with_capacity(plays: usize) -> Self {
        Self {
            average_reward: Vec::with_capacity(plays),
            optimal_action: Vec::with_capacity(plays),
        }
    }

    pub fn len(&self) -> usize {
        self.average_reward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average_reward.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Pending,
    Running,
    Finished,
}

/// One policy driven over its own bandit population.
pub struct Experiment {
    id: Uuid,
    policy: Box<dyn Policy + Send>,
    population: Population,
    rng: MaybeSeededRng,
    plays: usize,
    curves: LearningCurves,
    status: Status,
}

impl Experiment {
    pub fn new(
        policy_type: PolicyType,
        config: ExperimentConfig,
        seed: Option<u64>,
    ) -> Result<Self, ExperimentError> {
        config.validate()?;

        let mut rng = MaybeSeededRng::new(seed);
        let population = Population::new(config.bandits, config.arms, rng.get_rng())?;

        Self::build(policy_type, population, config.plays, rng)
    }

    pub fn with_population(
        policy_type: PolicyType,
        population: Population,
        plays: usize,
        seed: Option<u64>,
    ) -> Result<Self, ExperimentError> {
        Self::build(policy_type, population, plays, MaybeSeededRng::new(seed))
    }

    fn build(
        policy_type: PolicyType,
        population: Population,
        plays: usize,
        rng: MaybeSeededRng,
    ) -> Result<Self, ExperimentError> {
        if plays == 0 {
            return Err(ExperimentError::InvalidParameter(
                "plays must be positive".to_string(),
            ));
        }
        let policy = policy_type.into_inner(population.arms(), population.len())?;

        Ok(Self {
            id: Uuid::new_v4(),
            policy,
            population,
            rng,
            plays,
            curves: LearningCurves::with_capacity(plays),
            status: Status::Pending,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn policy_type(&self) -> PolicyType {
        self.policy.policy_type()
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn curves(&self) -> &LearningCurves {
        &self.curves
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Plays every bench once and records the population averages.
    pub fn play_round(&mut self) -> Result<(), ExperimentError> {
        if self.status == Status::Finished {
            return Err(ExperimentError::Finished(self.id));
        }
        self.status = Status::Running;

        let bandits = self.population.len();
        let mut reward_total = 0.0;
        let mut optimal_total = 0usize;
        for bandit in 0..bandits {
            let play = step(
                self.policy.as_mut(),
                &mut self.population,
                bandit,
                self.rng.get_rng(),
            )?;
            reward_total += play.reward;
            optimal_total += play.optimal as usize;
        }

        self.curves
            .optimal_action
            .push(optimal_total as f64 / bandits as f64);
        self.curves
            .average_reward
            .push(reward_total / bandits as f64);

        if self.curves.len() >= self.plays {
            self.status = Status::Finished;
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<&LearningCurves, ExperimentError> {
        if self.status == Status::Finished {
            return Ok(&self.curves);
        }

        info!(
            id = %self.id,
            policy = %self.policy_type().label(),
            bandits = self.population.len(),
            arms = self.population.arms(),
            plays = self.plays,
            "Starting experiment"
        );
        while self.curves.len() < self.plays {
            self.play_round()?;
            if self.curves.len() % 100 == 0 {
                debug!(id = %self.id, play = self.curves.len(), "Completed play");
            }
        }
        info!(id = %self.id, "Finished experiment");

        Ok(&self.curves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testbed::{arm::Arm, TestBench};

    const SEED: Option<u64> = Some(1234);

    fn config() -> ExperimentConfig {
        ExperimentConfig {
            arms: 10,
            plays: 50,
            bandits: 20,
        }
    }

    fn two_armed(means: [f64; 2]) -> Population {
        let arms = vec![
            Arm::with_mean(0, means[0], 0.0).unwrap(),
            Arm::with_mean(1, means[1], 0.0).unwrap(),
        ];
        Population::from_benches(vec![TestBench::from_arms(arms).unwrap()]).unwrap()
    }

    fn tail_mean(values: &[f64], n: usize) -> f64 {
        values[values.len() - n..].iter().sum::<f64>() / n as f64
    }

    #[test]
    fn invalid_config() {
        let policy_type = PolicyType::EpsilonGreedy { epsilon: 0.1 };
        for config in [
            ExperimentConfig { arms: 0, ..config() },
            ExperimentConfig { plays: 0, ..config() },
            ExperimentConfig { bandits: 0, ..config() },
        ] {
            assert!(matches!(
                Experiment::new(policy_type, config, SEED),
                Err(ExperimentError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn invalid_policy() {
        assert!(matches!(
            Experiment::new(PolicyType::Pursuit { beta: 2.0 }, config(), SEED),
            Err(ExperimentError::Policy(_))
        ));
    }

    #[test]
    fn curves_have_one_sample_per_play() {
        for policy_type in [
            PolicyType::EpsilonGreedy { epsilon: 0.1 },
            PolicyType::Pursuit { beta: 0.05 },
        ] {
            let mut experiment = Experiment::new(policy_type, config(), SEED).unwrap();
            assert_eq!(experiment.status(), Status::Pending);

            let curves = experiment.run().unwrap().clone();
            assert_eq!(experiment.status(), Status::Finished);
            assert_eq!(curves.average_reward.len(), 50);
            assert_eq!(curves.optimal_action.len(), 50);
            assert!(curves
                .optimal_action
                .iter()
                .all(|&fraction| (0.0..=1.0).contains(&fraction)));
        }
    }

    #[test]
    fn status_transitions() {
        let mut experiment =
            Experiment::new(PolicyType::EpsilonGreedy { epsilon: 0.1 }, config(), SEED).unwrap();
        experiment.play_round().unwrap();
        assert_eq!(experiment.status(), Status::Running);
        assert_eq!(experiment.curves().len(), 1);

        experiment.run().unwrap();
        assert_eq!(experiment.status(), Status::Finished);
        assert_eq!(experiment.curves().len(), 50);
    }

    #[test]
    fn no_rounds_after_finish() {
        let config = ExperimentConfig { plays: 5, ..config() };
        let mut experiment =
            Experiment::new(PolicyType::EpsilonGreedy { epsilon: 0.1 }, config, SEED).unwrap();
        assert!(experiment.curves().is_empty());
        experiment.run().unwrap();

        assert!(matches!(
            experiment.play_round(),
            Err(ExperimentError::Finished(id)) if id == experiment.id()
        ));
        assert_eq!(experiment.status(), Status::Finished);
        assert_eq!(experiment.curves().len(), 5);
        assert_eq!(experiment.curves().optimal_action.len(), 5);

        let bench = experiment.population().bench(0).unwrap();
        let pulls: u64 = (0..bench.len()).map(|id| bench.arm(id).unwrap().pulls()).sum();
        assert_eq!(pulls, 5);
    }

    #[test]
    fn finished_run_is_not_replayed() {
        let mut experiment =
            Experiment::new(PolicyType::Pursuit { beta: 0.05 }, config(), SEED).unwrap();
        let first = experiment.run().unwrap().clone();
        let second = experiment.run().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn deterministic_with_seed() {
        for policy_type in [
            PolicyType::EpsilonGreedy { epsilon: 0.1 },
            PolicyType::Pursuit { beta: 0.05 },
        ] {
            let mut a = Experiment::new(policy_type, config(), SEED).unwrap();
            let mut b = Experiment::new(policy_type, config(), SEED).unwrap();
            assert_eq!(a.run().unwrap(), b.run().unwrap());
        }
    }

    #[test]
    fn pulls_match_plays() {
        let mut experiment =
            Experiment::new(PolicyType::EpsilonGreedy { epsilon: 0.1 }, config(), SEED).unwrap();
        experiment.run().unwrap();

        let population = experiment.population();
        for bandit in 0..population.len() {
            let bench = population.bench(bandit).unwrap();
            let pulls: u64 = (0..bench.len()).map(|id| bench.arm(id).unwrap().pulls()).sum();
            assert_eq!(pulls, 50);
        }
    }

    #[test]
    fn epsilon_greedy_finds_dominant_arm() {
        for means in [[10.0, -10.0], [-10.0, 10.0]] {
            let mut experiment = Experiment::with_population(
                PolicyType::EpsilonGreedy { epsilon: 0.1 },
                two_armed(means),
                100,
                SEED,
            )
            .unwrap();
            let curves = experiment.run().unwrap();

            // the greedy arm is fixed after the first play, so only exploration misses
            assert!(tail_mean(&curves.optimal_action, 90) > 0.8);
            assert!(tail_mean(&curves.average_reward, 90) > 6.0);
        }
    }

    #[test]
    fn epsilon_greedy_population_approaches_targets() {
        let benches = (0..200)
            .map(|_| {
                let arms = vec![
                    Arm::with_mean(0, -10.0, 0.0).unwrap(),
                    Arm::with_mean(1, 10.0, 0.0).unwrap(),
                ];
                TestBench::from_arms(arms).unwrap()
            })
            .collect();
        let population = Population::from_benches(benches).unwrap();
        let mut experiment = Experiment::with_population(
            PolicyType::EpsilonGreedy { epsilon: 0.1 },
            population,
            100,
            SEED,
        )
        .unwrap();
        let curves = experiment.run().unwrap();

        // 1 - epsilon of the benches play the optimal arm, paying 0.9 * 10 - 0.1 * 10
        let optimal = tail_mean(&curves.optimal_action, 90);
        let reward = tail_mean(&curves.average_reward, 90);
        assert!((optimal - 0.9).abs() < 0.02, "optimal {optimal}");
        assert!((reward - 8.0).abs() < 0.4, "reward {reward}");
    }

    #[test]
    fn pursuit_finds_dominant_arm() {
        let arms = vec![
            Arm::with_mean(0, 0.0, 1.0).unwrap(),
            Arm::with_mean(1, 4.0, 1.0).unwrap(),
            Arm::with_mean(2, -1.0, 1.0).unwrap(),
        ];
        let population =
            Population::from_benches(vec![TestBench::from_arms(arms).unwrap()]).unwrap();
        let mut experiment =
            Experiment::with_population(PolicyType::Pursuit { beta: 0.05 }, population, 200, SEED)
                .unwrap();
        let curves = experiment.run().unwrap();

        assert!(tail_mean(&curves.optimal_action, 50) > 0.7);
    }

    #[test]
    fn learning_improves_reward() {
        let config = ExperimentConfig {
            arms: 10,
            plays: 300,
            bandits: 200,
        };
        let mut experiment =
            Experiment::new(PolicyType::EpsilonGreedy { epsilon: 0.1 }, config, SEED).unwrap();
        let curves = experiment.run().unwrap();

        let head = curves.optimal_action[..20].iter().sum::<f64>() / 20.0;
        assert!(tail_mean(&curves.optimal_action, 50) > head);
        assert!(tail_mean(&curves.average_reward, 50) > 0.5);
    }
}
