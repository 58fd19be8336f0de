//! Deliver artifacts to a single network.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::artifact::DeploymentArtifact;
use crate::network::NetworkTarget;

/// Path appended to a network URL to reach its deployment endpoint
const DEPLOYMENTS_PATH: &str = "deployments";

/// Longest rejection body kept in a failure reason, in bytes
const MAX_DETAIL_LEN: usize = 512;

/// Result of deploying to one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeploymentOutcome {
    /// Every artifact was accepted.
    Deployed { artifacts: Vec<String> },
    /// Nothing needed delivering.
    Skipped { reason: String },
    /// Connectivity, rejection or timeout.
    Failed { reason: String },
}

impl DeploymentOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// What every network in an invocation receives.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub artifacts: Arc<Vec<DeploymentArtifact>>,
    /// Ask the network to discard previous deployments first
    pub reset: bool,
}

impl DeployRequest {
    pub fn new(artifacts: Vec<DeploymentArtifact>) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            reset: false,
        }
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// Performs the side-effecting delivery to one network.
///
/// Expected failures (connectivity, rejection, timeout) come back as
/// `Ok(DeploymentOutcome::Failed)`. An `Err` is a fault and fails the whole
/// invocation.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(
        &self,
        target: &NetworkTarget,
        request: &DeployRequest,
    ) -> anyhow::Result<DeploymentOutcome>;
}

/// Deployer posting artifacts as JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDeployer {
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct DeploymentBody<'a> {
    artifact: &'a str,
    tags: &'a [String],
    payload: &'a serde_json::Value,
    reset: bool,
}

impl HttpDeployer {
    /// Create a deployer with a default per-request timeout.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("netdeploy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn deliver(
        &self,
        endpoint: &Url,
        timeout: Duration,
        artifact: &DeploymentArtifact,
        reset: bool,
    ) -> Result<(), String> {
        let body = DeploymentBody {
            artifact: &artifact.name,
            tags: &artifact.tags,
            payload: &artifact.payload,
            reset,
        };

        let response = self
            .client
            .post(endpoint.clone())
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| describe_request_error(&e, timeout))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = truncate_detail(body.trim(), MAX_DETAIL_LEN);
        if detail.is_empty() {
            Err(format!("rejected with HTTP {}", status))
        } else {
            Err(format!("rejected with HTTP {}: {}", status, detail))
        }
    }
}

#[async_trait]
impl Deployer for HttpDeployer {
    async fn deploy(
        &self,
        target: &NetworkTarget,
        request: &DeployRequest,
    ) -> anyhow::Result<DeploymentOutcome> {
        if request.artifacts.is_empty() {
            return Ok(DeploymentOutcome::skipped("no artifacts matched"));
        }

        let endpoint = match deployments_endpoint(target.url()) {
            Ok(endpoint) => endpoint,
            Err(e) => return Ok(DeploymentOutcome::failed(e.to_string())),
        };
        let timeout = target.timeout().unwrap_or(self.timeout);

        let mut deployed = Vec::with_capacity(request.artifacts.len());
        for artifact in request.artifacts.iter() {
            tracing::debug!(
                network = target.name(),
                artifact = %artifact.name,
                "delivering artifact"
            );
            if let Err(reason) = self
                .deliver(&endpoint, timeout, artifact, request.reset)
                .await
            {
                return Ok(DeploymentOutcome::failed(format!(
                    "{}: {}",
                    artifact.name, reason
                )));
            }
            deployed.push(artifact.name.clone());
        }

        Ok(DeploymentOutcome::Deployed {
            artifacts: deployed,
        })
    }
}

fn deployments_endpoint(base: &Url) -> anyhow::Result<Url> {
    let mut endpoint = base.clone();
    endpoint
        .path_segments_mut()
        .map_err(|_| anyhow::anyhow!("URL cannot be used as a base: {}", base))?
        .pop_if_empty()
        .push(DEPLOYMENTS_PATH);
    Ok(endpoint)
}

/// Cut `detail` to at most `max` bytes on a char boundary, marking the cut.
fn truncate_detail(detail: &str, max: usize) -> String {
    if detail.len() <= max {
        return detail.to_string();
    }
    let mut end = max;
    while !detail.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &detail[..end])
}

fn describe_request_error(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("timed out after {}s", timeout.as_secs_f64())
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
