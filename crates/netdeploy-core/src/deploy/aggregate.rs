//! Concurrent fan-out over the selected networks.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::executor::{DeployRequest, Deployer, DeploymentOutcome};
use super::report::DeploymentReport;
use crate::cancel::Cancellation;
use crate::config::schema::DEFAULT_CONCURRENCY;
use crate::error::TaskError;
use crate::network::TargetSet;

/// Runs one deployment per target with bounded concurrency and collects the
/// outcomes into a single report.
#[derive(Clone)]
pub struct Aggregator {
    deployer: Arc<dyn Deployer>,
    concurrency: usize,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    pub fn new(deployer: Arc<dyn Deployer>) -> Self {
        Self {
            deployer,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Maximum number of networks deployed at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Deploy to every target and wait for all of them.
    ///
    /// The report holds exactly one outcome per target. A target failing
    /// never stops the others. Cancellation aborts in-flight work and yields
    /// [`TaskError::Cancelled`] instead of a partial report.
    pub async fn run(
        &self,
        targets: &TargetSet,
        request: Arc<DeployRequest>,
        cancel: &Cancellation,
    ) -> Result<DeploymentReport, TaskError> {
        if let Some(name) = targets.first_duplicate() {
            return Err(TaskError::MalformedTargetSet(format!(
                "network '{}' appears more than once",
                name
            )));
        }
        if targets.is_empty() {
            return Ok(DeploymentReport::empty());
        }

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();

        for target in targets {
            let target = target.clone();
            let deployer = Arc::clone(&self.deployer);
            let request = Arc::clone(&request);
            let permits = Arc::clone(&permits);

            workers.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .context("deployment semaphore closed")?;
                tracing::debug!(network = target.name(), "deploying");
                let outcome = deployer.deploy(&target, &request).await.with_context(|| {
                    format!("deployer fault on network '{}'", target.name())
                })?;
                anyhow::Ok((target.name().to_string(), outcome))
            });
        }

        let collected = cancel.run(collect(&mut workers)).await;
        let outcomes = match collected {
            Some(result) => result?,
            None => {
                tracing::warn!("deployment cancelled; aborting in-flight networks");
                workers.abort_all();
                // Wait for aborted workers so no deployment outlives the call
                while workers.join_next().await.is_some() {}
                return Err(TaskError::Cancelled);
            }
        };

        let expected: Vec<&str> = {
            let mut names = targets.names();
            names.sort_unstable();
            names
        };
        let actual: Vec<&str> = outcomes.keys().map(String::as_str).collect();
        if expected != actual {
            return Err(anyhow::anyhow!(
                "report covers [{}] but targets were [{}]",
                actual.join(", "),
                expected.join(", ")
            )
            .into());
        }

        Ok(DeploymentReport::completed(outcomes))
    }
}

async fn collect(
    workers: &mut JoinSet<anyhow::Result<(String, DeploymentOutcome)>>,
) -> Result<BTreeMap<String, DeploymentOutcome>, TaskError> {
    let mut outcomes = BTreeMap::new();

    while let Some(joined) = workers.join_next().await {
        let (network, outcome) = match joined {
            Ok(result) => result?,
            Err(e) => {
                workers.abort_all();
                return Err(anyhow::anyhow!("deployment worker failed: {}", e).into());
            }
        };

        match &outcome {
            DeploymentOutcome::Deployed { artifacts } => {
                tracing::info!(network = %network, artifacts = artifacts.len(), "deployed");
            }
            DeploymentOutcome::Skipped { reason } => {
                tracing::info!(network = %network, reason = %reason, "skipped");
            }
            DeploymentOutcome::Failed { reason } => {
                tracing::warn!(network = %network, reason = %reason, "deployment failed");
            }
        }

        if outcomes.insert(network.clone(), outcome).is_some() {
            workers.abort_all();
            return Err(anyhow::anyhow!("network '{}' reported twice", network).into());
        }
    }

    Ok(outcomes)
}
