//! Everything a deploy invocation needs from its environment.

use std::sync::Arc;

use crate::artifact::ArtifactSource;
use crate::config::schema::DEFAULT_CONCURRENCY;
use crate::config::{ConfigStore, NetdeployConfig};
use crate::deploy::{Deployer, HttpDeployer};
use crate::network::NetworkTarget;
use crate::prompt::Prompter;

/// Shared collaborators of the deploy task.
#[derive(Clone)]
pub struct DeployContext {
    networks: Arc<Vec<NetworkTarget>>,
    artifacts: ArtifactSource,
    deployer: Arc<dyn Deployer>,
    prompter: Arc<dyn Prompter>,
    concurrency: usize,
}

impl std::fmt::Debug for DeployContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployContext")
            .field("networks", &self.networks)
            .field("artifacts", &self.artifacts)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl DeployContext {
    pub fn new(
        networks: Vec<NetworkTarget>,
        artifacts: impl Into<ArtifactSource>,
        deployer: Arc<dyn Deployer>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            networks: Arc::new(networks),
            artifacts: artifacts.into(),
            deployer,
            prompter,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Build a context from a loaded configuration, deploying over HTTP.
    pub fn from_config(
        config: &NetdeployConfig,
        store: &ConfigStore,
        prompter: Arc<dyn Prompter>,
    ) -> anyhow::Result<Self> {
        let networks = config.network_targets()?;
        let deployer = HttpDeployer::new(config.deploy.timeout())?;
        let artifacts = ArtifactSource::Directory(store.artifacts_dir(config));

        tracing::debug!(
            networks = networks.len(),
            concurrency = config.deploy.concurrency,
            "deploy context ready"
        );

        Ok(Self::new(networks, artifacts, Arc::new(deployer), prompter)
            .with_concurrency(config.deploy.concurrency))
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Configured networks, in the order given.
    pub fn networks(&self) -> &[NetworkTarget] {
        &self.networks
    }

    pub fn artifacts(&self) -> &ArtifactSource {
        &self.artifacts
    }

    pub fn deployer(&self) -> Arc<dyn Deployer> {
        Arc::clone(&self.deployer)
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
