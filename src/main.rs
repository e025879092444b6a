use bandit_testbed::config::AppConfig;
use bandit_testbed::errors::AppError;
use bandit_testbed::experiment::Experiment;
use bandit_testbed::runner::run_experiments;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let experiment_config = config.experiment();
    let experiments = config
        .policies()
        .into_iter()
        .enumerate()
        .map(|(i, policy_type)| Experiment::new(policy_type, experiment_config, config.seed_for(i)))
        .collect::<Result<Vec<_>, _>>()?;

    let reports = run_experiments(experiments).await?;
    info!(num_reports = reports.len(), "Experiments finished");

    println!("{}", serde_json::to_string(&reports)?);
    Ok(())
}
