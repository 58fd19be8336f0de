//! Consolidated per-network deployment results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::executor::DeploymentOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Every selected network was attempted.
    Completed,
    /// The operator backed out before anything was deployed.
    Aborted,
}

/// Terminal output of a deploy invocation.
///
/// Keys are exactly the names of the networks that were selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    status: ReportStatus,
    outcomes: BTreeMap<String, DeploymentOutcome>,
}

impl DeploymentReport {
    /// Completed report with no networks.
    pub fn empty() -> Self {
        Self::completed(BTreeMap::new())
    }

    pub fn aborted() -> Self {
        Self {
            status: ReportStatus::Aborted,
            outcomes: BTreeMap::new(),
        }
    }

    pub(crate) fn completed(outcomes: BTreeMap<String, DeploymentOutcome>) -> Self {
        Self {
            status: ReportStatus::Completed,
            outcomes,
        }
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn is_aborted(&self) -> bool {
        self.status == ReportStatus::Aborted
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn get(&self, network: &str) -> Option<&DeploymentOutcome> {
        self.outcomes.get(network)
    }

    /// Outcomes ordered by network name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeploymentOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn networks(&self) -> Vec<&str> {
        self.outcomes.keys().map(String::as_str).collect()
    }

    /// Failed networks with their failure reasons.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| match outcome {
                DeploymentOutcome::Failed { reason } => Some((name.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.values().any(DeploymentOutcome::is_failed)
    }

    pub fn deployed_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, DeploymentOutcome::Deployed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, DeploymentOutcome::Skipped { .. }))
            .count()
    }
}
