use crate::policies::errors::PolicyError;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Experiment {0} already played all its rounds")]
    Finished(Uuid),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read config: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Experiment(#[from] ExperimentError),
    #[error("Experiment task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Failed to serialize results to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
