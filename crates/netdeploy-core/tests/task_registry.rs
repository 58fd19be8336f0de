//! Tests for feature-gated task registration.

mod support;

use std::sync::Arc;

use netdeploy_core::cancel::Cancellation;
use netdeploy_core::deploy::{DeploymentReport, ReportStatus};
use netdeploy_core::error::TaskError;
use netdeploy_core::feature::{ENABLE_DEPLOY_TASK_ENV, FeatureFlags};
use netdeploy_core::task::{TASK_DEPLOY, TaskRegistry};
use serde_json::json;
use support::{RecordingDeployer, ScriptedPrompter, context, network};

fn flags(value: Option<&str>) -> FeatureFlags {
    FeatureFlags::from_lookup(|key| {
        assert_eq!(key, ENABLE_DEPLOY_TASK_ENV);
        value.map(str::to_string)
    })
}

fn registry(flags: FeatureFlags) -> (TaskRegistry, Arc<RecordingDeployer>) {
    let deployer = Arc::new(RecordingDeployer::new());
    let prompter = Arc::new(ScriptedPrompter::rejecting());
    let ctx = context(
        vec![network("ethereum"), network("arbitrum")],
        deployer.clone(),
        prompter,
    );
    (TaskRegistry::with_builtin_tasks(&flags, &ctx), deployer)
}

#[test]
fn deploy_task_absent_when_flag_unset() {
    let (registry, _) = registry(flags(None));
    assert!(registry.get(TASK_DEPLOY).is_none());
    assert!(registry.ids().is_empty());
}

#[test]
fn deploy_task_absent_when_flag_empty() {
    let (registry, _) = registry(flags(Some("")));
    assert!(registry.get(TASK_DEPLOY).is_none());
}

#[test]
fn deploy_task_present_when_flag_set() {
    for value in ["1", "true", "yes", "0"] {
        let (registry, _) = registry(flags(Some(value)));
        let task = registry.get(TASK_DEPLOY).expect("deploy task registered");
        assert_eq!(task.id(), TASK_DEPLOY);
        assert!(!task.description().is_empty());
    }
}

#[tokio::test]
async fn running_disabled_task_is_not_found() {
    let (registry, deployer) = registry(flags(None));
    let err = registry
        .run(TASK_DEPLOY, json!({}), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::TaskNotFound(ref id) if id == TASK_DEPLOY));
    assert_eq!(deployer.call_count(), 0);
}

#[tokio::test]
async fn running_with_default_args_is_a_clean_no_op() {
    let (registry, deployer) = registry(flags(Some("1")));

    let value = registry
        .run(TASK_DEPLOY, json!({}), &Cancellation::new())
        .await
        .expect("task resolves");

    let report: DeploymentReport = serde_json::from_value(value).expect("report json");
    assert!(report.is_empty());
    assert_eq!(report.status(), ReportStatus::Aborted);
    assert_eq!(deployer.call_count(), 0);
}

#[tokio::test]
async fn running_with_empty_network_list_completes() {
    let (registry, deployer) = registry(flags(Some("1")));

    let value = registry
        .run(TASK_DEPLOY, json!({"networks": []}), &Cancellation::new())
        .await
        .expect("task resolves");

    let report: DeploymentReport = serde_json::from_value(value).expect("report json");
    assert!(report.is_empty());
    assert_eq!(report.status(), ReportStatus::Completed);
    assert_eq!(deployer.call_count(), 0);
}

#[tokio::test]
async fn invalid_arguments_are_rejected() {
    let (registry, _) = registry(flags(Some("1")));
    let err = registry
        .run(TASK_DEPLOY, json!({"networks": "ethereum"}), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::InvalidArguments { .. }));
}
