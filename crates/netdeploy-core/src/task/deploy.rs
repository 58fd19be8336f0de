//! The deploy task.
//!
//! One invocation walks a small state machine:
//!
//! ```text
//! Idle -> SelectingTargets -> ConfirmingContinuation -> Deploying -> Reporting -> Done
//!                 |                     |
//!                 +------> Aborted <----+
//! ```
//!
//! An empty selection goes straight from `SelectingTargets` to `Reporting`,
//! and unattended (`ci`) runs go straight to `Deploying`. Both `Done` and
//! `Aborted` are successful outcomes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cancel::Cancellation;
use crate::context::DeployContext;
use crate::deploy::{
    Aggregator, DeployRequest, DeploymentReport, Selection, TargetSelector, confirm_targets,
};
use crate::error::TaskError;
use crate::network::Stage;

use super::{TASK_DEPLOY, Task};

/// Arguments accepted by the deploy task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployArgs {
    /// Networks to deploy to. `None` asks the operator; `Some(vec![])`
    /// deploys nowhere.
    pub networks: Option<Vec<String>>,
    /// Only deploy artifacts carrying one of these tags (empty = all)
    pub tags: Vec<String>,
    /// Restrict candidate networks to one stage
    pub stage: Option<Stage>,
    /// Unattended run: no prompts, omitted networks mean every candidate
    pub ci: bool,
    /// Ask networks to discard previous deployments first
    pub reset: bool,
}

impl DeployArgs {
    /// Decode task arguments. `null` is treated as an empty object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TaskError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| TaskError::InvalidArguments {
            task: TASK_DEPLOY.to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_networks<I, S>(mut self, networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.networks = Some(networks.into_iter().map(Into::into).collect());
        self
    }
}

/// Phase of a deploy invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    Idle,
    SelectingTargets,
    ConfirmingContinuation,
    Deploying,
    Reporting,
    Done,
    Aborted,
}

impl DeployState {
    pub fn can_transition_to(self, next: DeployState) -> bool {
        use DeployState::*;
        matches!(
            (self, next),
            (Idle, SelectingTargets)
                | (SelectingTargets, ConfirmingContinuation)
                | (SelectingTargets, Deploying)
                | (SelectingTargets, Reporting)
                | (SelectingTargets, Aborted)
                | (ConfirmingContinuation, Deploying)
                | (ConfirmingContinuation, Aborted)
                | (Deploying, Reporting)
                | (Reporting, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeployState::Done | DeployState::Aborted)
    }
}

/// Records the states an invocation passes through.
#[derive(Debug)]
struct StateTrace {
    states: Vec<DeployState>,
}

impl StateTrace {
    fn new() -> Self {
        Self {
            states: vec![DeployState::Idle],
        }
    }

    fn current(&self) -> DeployState {
        self.states.last().copied().unwrap_or(DeployState::Idle)
    }

    fn advance(&mut self, next: DeployState) -> Result<(), TaskError> {
        let current = self.current();
        if !current.can_transition_to(next) {
            return Err(anyhow::anyhow!(
                "invalid deploy state transition {:?} -> {:?}",
                current,
                next
            )
            .into());
        }
        tracing::debug!(from = ?current, to = ?next, "deploy state");
        self.states.push(next);
        Ok(())
    }
}

/// Result of a deploy invocation along with the states it went through.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutput {
    pub report: DeploymentReport,
    pub trace: Vec<DeployState>,
}

/// Selects, confirms, deploys and reports.
#[derive(Debug, Clone)]
pub struct DeployTask {
    context: DeployContext,
}

impl DeployTask {
    pub fn new(context: DeployContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &DeployContext {
        &self.context
    }

    /// Run one invocation.
    pub async fn execute(
        &self,
        args: DeployArgs,
        cancel: &Cancellation,
    ) -> Result<DeployOutput, TaskError> {
        let mut trace = StateTrace::new();
        let prompter = self.context.prompter();
        tracing::info!(
            networks = ?args.networks,
            stage = ?args.stage,
            ci = args.ci,
            "starting deploy task"
        );

        trace.advance(DeployState::SelectingTargets)?;
        let selector = TargetSelector::new(self.context.networks()).with_stage(args.stage);
        let selection = cancel
            .run(selector.select(args.networks.as_deref(), prompter, args.ci))
            .await
            .ok_or(TaskError::Cancelled)??;

        let targets = match selection {
            Selection::Targets(targets) => targets,
            Selection::Aborted => {
                tracing::info!("network selection aborted; nothing deployed");
                trace.advance(DeployState::Aborted)?;
                return Ok(finish(DeploymentReport::aborted(), trace));
            }
        };

        if targets.is_empty() {
            tracing::info!("no networks selected; nothing to deploy");
            trace.advance(DeployState::Reporting)?;
            trace.advance(DeployState::Done)?;
            return Ok(finish(DeploymentReport::empty(), trace));
        }

        if !args.ci {
            trace.advance(DeployState::ConfirmingContinuation)?;
            let confirmed = cancel
                .run(confirm_targets(&targets, prompter))
                .await
                .ok_or(TaskError::Cancelled)?;
            if !confirmed {
                tracing::info!("deployment not confirmed; nothing deployed");
                trace.advance(DeployState::Aborted)?;
                return Ok(finish(DeploymentReport::aborted(), trace));
            }
        }

        trace.advance(DeployState::Deploying)?;
        let store = self.context.artifacts().load()?;
        let request = DeployRequest::new(store.select(&args.tags)).with_reset(args.reset);
        tracing::info!(
            networks = %targets.names().join(", "),
            artifacts = request.artifacts.len(),
            "deploying"
        );

        let report = Aggregator::new(self.context.deployer())
            .with_concurrency(self.context.concurrency())
            .run(&targets, Arc::new(request), cancel)
            .await?;

        trace.advance(DeployState::Reporting)?;
        if report.has_failures() {
            tracing::warn!(
                failed = report.failures().len(),
                total = report.len(),
                "deployment finished with failures"
            );
        } else {
            tracing::info!(total = report.len(), "deployment finished");
        }
        trace.advance(DeployState::Done)?;

        Ok(finish(report, trace))
    }
}

fn finish(report: DeploymentReport, trace: StateTrace) -> DeployOutput {
    DeployOutput {
        report,
        trace: trace.states,
    }
}

#[async_trait]
impl Task for DeployTask {
    fn id(&self) -> &'static str {
        TASK_DEPLOY
    }

    fn description(&self) -> &'static str {
        "Deploy artifacts to the selected networks"
    }

    async fn run(
        &self,
        args: serde_json::Value,
        cancel: &Cancellation,
    ) -> Result<serde_json::Value, TaskError> {
        let args = DeployArgs::from_value(args)?;
        let output = self.execute(args, cancel).await?;
        let value = serde_json::to_value(&output.report).map_err(anyhow::Error::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn args_distinguish_missing_from_empty_networks() {
        let omitted = DeployArgs::from_value(json!({})).expect("valid");
        assert_eq!(omitted.networks, None);

        let empty = DeployArgs::from_value(json!({"networks": []})).expect("valid");
        assert_eq!(empty.networks, Some(vec![]));

        let null = DeployArgs::from_value(serde_json::Value::Null).expect("valid");
        assert_eq!(null, DeployArgs::default());
    }

    #[test]
    fn args_reject_unknown_fields() {
        let err = DeployArgs::from_value(json!({"netwrks": ["a"]})).unwrap_err();
        assert!(matches!(err, TaskError::InvalidArguments { .. }));
    }

    #[test]
    fn args_parse_every_field() {
        let args = DeployArgs::from_value(json!({
            "networks": ["sepolia"],
            "tags": ["OFT"],
            "stage": "testnet",
            "ci": true,
            "reset": true
        }))
        .expect("valid");
        assert_eq!(args.stage, Some(Stage::Testnet));
        assert!(args.ci && args.reset);
        assert_eq!(args.tags, vec!["OFT"]);
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        use DeployState::*;
        assert!(Idle.can_transition_to(SelectingTargets));
        assert!(SelectingTargets.can_transition_to(Reporting));
        assert!(ConfirmingContinuation.can_transition_to(Aborted));
        assert!(!Idle.can_transition_to(Deploying));
        assert!(!Deploying.can_transition_to(Aborted));
        assert!(!Done.can_transition_to(Idle));
        assert!(Done.is_terminal() && Aborted.is_terminal());
    }

    #[test]
    fn invalid_transition_is_unexpected() {
        let mut trace = StateTrace::new();
        let err = trace.advance(DeployState::Done).unwrap_err();
        assert!(matches!(err, TaskError::Unexpected(_)));
        assert_eq!(trace.current(), DeployState::Idle);
    }
}
