use crate::errors::{AppError, ExperimentError};
use crate::experiment::{Experiment, LearningCurves};
use crate::policies::PolicyType;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ExperimentReport {
    pub id: Uuid,
    pub label: String,
    pub policy_type: PolicyType,
    pub seed: Option<u64>,
    pub curves: LearningCurves,
}

/// Runs every experiment on its own blocking task and collects the reports in
/// input order.
pub async fn run_experiments(
    experiments: Vec<Experiment>,
) -> Result<Vec<ExperimentReport>, AppError> {
    info!(num_experiments = experiments.len(), "Running experiments");

    let handles: Vec<ReportHandle> = experiments
        .into_iter()
        .map(|mut experiment| {
            tokio::task::spawn_blocking(move || -> Result<ExperimentReport, ExperimentError> {
                let curves = experiment.run()?.clone();
                let policy_type = experiment.policy_type();

                Ok(ExperimentReport {
                    id: experiment.id(),
                    label: policy_type.label(),
                    policy_type,
                    seed: experiment.seed(),
                    curves,
                })
            })
        })
        .collect();

    collect_reports(handles).await
}

type ReportHandle = JoinHandle<Result<ExperimentReport, ExperimentError>>;

// waits for every task before reporting the first failure
async fn collect_reports(handles: Vec<ReportHandle>) -> Result<Vec<ExperimentReport>, AppError> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await);
    }

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut first_error: Option<AppError> = None;
    for outcome in outcomes {
        match outcome.map_err(AppError::from).and_then(|r| r.map_err(AppError::from)) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(error = %err, "Experiment failed");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}
