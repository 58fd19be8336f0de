//! Configuration schema for netdeploy.toml

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::network::{NetworkTarget, Stage};

/// Default number of networks deployed to concurrently
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default artifacts directory, relative to the config file
pub const DEFAULT_ARTIFACTS_DIR: &str = "deployments/artifacts";

/// Root configuration structure for netdeploy.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetdeployConfig {
    /// Deployment settings
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Network definitions, keyed by network name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// `[deploy]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Maximum number of networks deployed to at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Default per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory holding pre-built artifacts
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl DeploySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACTS_DIR)
}

/// `[networks.<name>]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Deployment endpoint
    pub url: String,

    /// Stage the network belongs to
    #[serde(default)]
    pub stage: Option<Stage>,

    /// Per-request timeout override
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl NetdeployConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.deploy.concurrency == 0 {
            anyhow::bail!("deploy.concurrency must be at least 1");
        }
        if self.deploy.timeout_secs == 0 {
            anyhow::bail!("deploy.timeout_secs must be at least 1");
        }
        for (name, network) in &self.networks {
            if name.trim().is_empty() {
                anyhow::bail!("Network names cannot be empty");
            }
            Url::parse(&network.url)
                .map_err(|e| anyhow::anyhow!("Invalid url for network '{}': {}", name, e))?;
            if network.timeout_secs == Some(0) {
                anyhow::bail!("networks.{}.timeout_secs must be at least 1", name);
            }
        }
        Ok(())
    }

    /// All configured networks as deploy targets, ordered by name.
    pub fn network_targets(&self) -> anyhow::Result<Vec<NetworkTarget>> {
        self.networks
            .iter()
            .map(|(name, network)| {
                let url = Url::parse(&network.url)
                    .map_err(|e| anyhow::anyhow!("Invalid url for network '{}': {}", name, e))?;
                let mut target = NetworkTarget::new(name.clone(), url);
                if let Some(stage) = network.stage {
                    target = target.with_stage(stage);
                }
                if let Some(secs) = network.timeout_secs {
                    target = target.with_timeout(Duration::from_secs(secs));
                }
                Ok(target)
            })
            .collect()
    }
}
