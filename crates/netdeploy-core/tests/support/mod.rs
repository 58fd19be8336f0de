//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use netdeploy_core::artifact::DeploymentArtifact;
use netdeploy_core::context::DeployContext;
use netdeploy_core::deploy::{DeployRequest, Deployer, DeploymentOutcome};
use netdeploy_core::network::{NetworkTarget, Stage};
use netdeploy_core::prompt::{PromptError, Prompter};
use serde_json::json;
use url::Url;

pub fn network(name: &str) -> NetworkTarget {
    NetworkTarget::new(
        name,
        Url::parse(&format!("http://{name}.invalid")).expect("valid url"),
    )
}

pub fn staged(name: &str, stage: Stage) -> NetworkTarget {
    network(name).with_stage(stage)
}

pub fn artifacts() -> Vec<DeploymentArtifact> {
    vec![
        DeploymentArtifact::new("Endpoint", json!({"bytecode": "0x01"})).with_tags(["core"]),
        DeploymentArtifact::new("OFT", json!({"bytecode": "0x02"})).with_tags(["token"]),
    ]
}

pub fn context(
    networks: Vec<NetworkTarget>,
    deployer: Arc<RecordingDeployer>,
    prompter: Arc<dyn Prompter>,
) -> DeployContext {
    DeployContext::new(networks, artifacts(), deployer, prompter)
}

/// Prompter answering from a script and recording what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    /// `None` aborts the selection prompt
    selection: Option<Vec<usize>>,
    /// `None` aborts the confirmation prompt
    confirm: Option<bool>,
    pub selections_asked: Mutex<Vec<Vec<String>>>,
    pub confirmations_asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Every prompt is aborted.
    pub fn rejecting() -> Self {
        Self::default()
    }

    pub fn selecting(indices: Vec<usize>) -> Self {
        Self {
            selection: Some(indices),
            ..Self::default()
        }
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm = Some(answer);
        self
    }

    pub fn selection_count(&self) -> usize {
        self.selections_asked.lock().expect("lock").len()
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations_asked.lock().expect("lock").len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt_to_continue(&self, message: &str) -> Result<bool, PromptError> {
        self.confirmations_asked
            .lock()
            .expect("lock")
            .push(message.to_string());
        self.confirm.ok_or(PromptError::Aborted)
    }

    async fn prompt_to_select_multiple(
        &self,
        _message: &str,
        candidates: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        self.selections_asked
            .lock()
            .expect("lock")
            .push(candidates.to_vec());
        self.selection.clone().ok_or(PromptError::Aborted)
    }
}

/// Prompter whose prompts never return.
#[derive(Debug, Default)]
pub struct StalledPrompter;

#[async_trait]
impl Prompter for StalledPrompter {
    async fn prompt_to_continue(&self, _message: &str) -> Result<bool, PromptError> {
        std::future::pending().await
    }

    async fn prompt_to_select_multiple(
        &self,
        _message: &str,
        _candidates: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        std::future::pending().await
    }
}

/// Counts deployments that were torn down before finishing.
struct DropGuard<'a>(&'a AtomicUsize);

impl Drop for DropGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Deployer that records calls and fails the configured networks.
#[derive(Debug, Default)]
pub struct RecordingDeployer {
    failing: HashSet<String>,
    hang: bool,
    calls: Mutex<Vec<(String, Vec<String>, bool)>>,
    dropped: AtomicUsize,
}

impl RecordingDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Never finishes a deployment.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }

    /// Deployments dropped while still hanging.
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }

    /// Networks deployed to, sorted.
    pub fn networks(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .calls
            .lock()
            .expect("lock")
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Artifact names and reset flag of the call for `network`.
    pub fn call_for(&self, network: &str) -> Option<(Vec<String>, bool)> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .find(|(name, _, _)| name == network)
            .map(|(_, artifacts, reset)| (artifacts.clone(), *reset))
    }
}

#[async_trait]
impl Deployer for RecordingDeployer {
    async fn deploy(
        &self,
        target: &NetworkTarget,
        request: &DeployRequest,
    ) -> anyhow::Result<DeploymentOutcome> {
        let artifacts: Vec<String> = request.artifacts.iter().map(|a| a.name.clone()).collect();
        self.calls.lock().expect("lock").push((
            target.name().to_string(),
            artifacts.clone(),
            request.reset,
        ));

        if self.hang {
            let _guard = DropGuard(&self.dropped);
            std::future::pending::<()>().await;
        }

        if self.failing.contains(target.name()) {
            return Ok(DeploymentOutcome::failed("connection refused"));
        }
        Ok(DeploymentOutcome::Deployed { artifacts })
    }
}
