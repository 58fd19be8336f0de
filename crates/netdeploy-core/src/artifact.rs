//! Pre-built deployment artifacts.
//!
//! Artifacts are produced by an external build pipeline and dropped into the
//! artifacts directory as `*.json` files. This module only reads them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A single deployable payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentArtifact {
    /// Artifact name (e.g. the contract name)
    pub name: String,
    /// Tags used to select subsets of artifacts
    #[serde(default)]
    pub tags: Vec<String>,
    /// Opaque payload delivered to the network
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl DeploymentArtifact {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            payload,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the artifact carries at least one of `tags`.
    ///
    /// An empty filter matches every artifact.
    pub fn matches_tags(&self, tags: &[String]) -> bool {
        tags.is_empty() || self.tags.iter().any(|t| tags.contains(t))
    }
}

/// The set of artifacts available to a deployment.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: Vec<DeploymentArtifact>,
}

impl ArtifactStore {
    pub fn new(artifacts: Vec<DeploymentArtifact>) -> Self {
        Self { artifacts }
    }

    /// Load every `*.json` artifact in `dir`, ordered by file name.
    ///
    /// A missing directory yields an empty store.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        if !dir.exists() {
            tracing::debug!(dir = %dir.display(), "artifacts directory not found");
            return Ok(Self::default());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read artifacts directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "json")
            })
            .collect();
        paths.sort();

        let artifacts = paths
            .iter()
            .map(|path| load_artifact(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        tracing::debug!(count = artifacts.len(), "loaded artifacts");
        Ok(Self { artifacts })
    }

    pub fn all(&self) -> &[DeploymentArtifact] {
        &self.artifacts
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Artifacts matching the tag filter, in store order.
    pub fn select(&self, tags: &[String]) -> Vec<DeploymentArtifact> {
        self.artifacts
            .iter()
            .filter(|a| a.matches_tags(tags))
            .cloned()
            .collect()
    }
}

/// Where a deployment reads its artifacts from.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Read `*.json` files when the deployment starts.
    Directory(PathBuf),
    /// Artifacts already in memory.
    Preloaded(Arc<ArtifactStore>),
}

impl ArtifactSource {
    pub fn load(&self) -> anyhow::Result<Arc<ArtifactStore>> {
        match self {
            Self::Directory(dir) => ArtifactStore::load_dir(dir).map(Arc::new),
            Self::Preloaded(store) => Ok(Arc::clone(store)),
        }
    }
}

impl From<ArtifactStore> for ArtifactSource {
    fn from(store: ArtifactStore) -> Self {
        Self::Preloaded(Arc::new(store))
    }
}

impl From<Vec<DeploymentArtifact>> for ArtifactSource {
    fn from(artifacts: Vec<DeploymentArtifact>) -> Self {
        ArtifactStore::new(artifacts).into()
    }
}

fn load_artifact(path: &Path) -> anyhow::Result<DeploymentArtifact> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact: {}", path.display()))?;
    let artifact: DeploymentArtifact = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse artifact: {}", path.display()))?;
    if artifact.name.trim().is_empty() {
        anyhow::bail!("Artifact has an empty name: {}", path.display());
    }
    Ok(artifact)
}
