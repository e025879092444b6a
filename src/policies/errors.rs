use crate::testbed::errors::TestBenchError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Bandit {bandit} out of range for a population of {bandits}")]
    UnknownBandit { bandit: usize, bandits: usize },
    #[error("Preferences of bandit {bandit} are not a distribution: {reason}")]
    InvalidDistribution { bandit: usize, reason: String },
    #[error(transparent)]
    TestBench(#[from] TestBenchError),
}
