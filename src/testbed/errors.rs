use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestBenchError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Arm {arm_id} out of range for a bench of {arms} arms")]
    IndexOutOfRange { arm_id: usize, arms: usize },
}
