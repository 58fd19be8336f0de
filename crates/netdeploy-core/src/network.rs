//! Network targets and the per-invocation target set.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Deployment stage a network belongs to.
///
/// Stage names are case-insensitive wherever they are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Stage {
    Mainnet,
    Testnet,
    Sandbox,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Mainnet, Stage::Testnet, Stage::Sandbox];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Mainnet => "mainnet",
            Stage::Testnet => "testnet",
            Stage::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Stage::Mainnet),
            "testnet" => Ok(Stage::Testnet),
            "sandbox" => Ok(Stage::Sandbox),
            other => anyhow::bail!(
                "Invalid stage '{}': expected one of mainnet, testnet, sandbox",
                other
            ),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One deployable destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    name: String,
    url: Url,
    stage: Option<Stage>,
    timeout: Option<Duration>,
}

impl NetworkTarget {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            stage: None,
            timeout: None,
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Per-network request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn matches_stage(&self, stage: Option<Stage>) -> bool {
        match stage {
            Some(stage) => self.stage == Some(stage),
            None => true,
        }
    }
}

/// Ordered, duplicate-free set of targets for a single invocation.
///
/// Built once by the target selector and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<NetworkTarget>,
}

impl TargetSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set, keeping the first occurrence of every name.
    pub fn from_targets<I>(targets: I) -> Self
    where
        I: IntoIterator<Item = NetworkTarget>,
    {
        let mut seen = HashSet::new();
        let targets = targets
            .into_iter()
            .filter(|t| seen.insert(t.name.clone()))
            .collect();
        Self { targets }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkTarget> {
        self.targets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    /// Name of the first duplicated target, if any.
    pub(crate) fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.targets
            .iter()
            .map(|t| t.name())
            .find(|name| !seen.insert(*name))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(targets: Vec<NetworkTarget>) -> Self {
        Self { targets }
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a NetworkTarget;
    type IntoIter = std::slice::Iter<'a, NetworkTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
