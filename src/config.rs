use crate::experiment::ExperimentConfig;
use crate::policies::PolicyType;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Deserializer};

const ENV_PREFIX: &str = "BANDIT";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub arms: usize,
    pub plays: usize,
    pub bandits: usize,
    pub seed: Option<u64>,
    #[serde(deserialize_with = "float_list")]
    pub epsilons: Vec<f64>,
    #[serde(deserialize_with = "float_list")]
    pub betas: Vec<f64>,
}

// environment values arrive as a single number or a comma separated string
#[derive(Deserialize)]
#[serde(untagged)]
enum FloatList {
    Many(Vec<f64>),
    One(f64),
    Text(String),
}

fn float_list<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match FloatList::deserialize(deserializer)? {
        FloatList::Many(values) => Ok(values),
        FloatList::One(value) => Ok(vec![value]),
        FloatList::Text(text) => text
            .split(',')
            .map(|item| item.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(serde::de::Error::custom),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(environment: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("arms", 10)?
            .set_default("plays", 1000)?
            .set_default("bandits", 1000)?
            .set_default("epsilons", vec![0.1])?
            .set_default("betas", vec![0.01])?
            .add_source(environment.try_parsing(true))
            .build()?;

        builder.try_deserialize()
    }

    pub fn experiment(&self) -> ExperimentConfig {
        ExperimentConfig {
            arms: self.arms,
            plays: self.plays,
            bandits: self.bandits,
        }
    }

    pub fn policies(&self) -> Vec<PolicyType> {
        self.epsilons
            .iter()
            .map(|&epsilon| PolicyType::EpsilonGreedy { epsilon })
            .chain(self.betas.iter().map(|&beta| PolicyType::Pursuit { beta }))
            .collect()
    }

    // each experiment gets its own stream
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index as u64))
    }
}
