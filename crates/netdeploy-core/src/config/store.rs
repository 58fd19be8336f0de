//! Config store for loading netdeploy.toml.

use std::path::{Path, PathBuf};

use super::{NetdeployConfig, parser};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "netdeploy.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store for `netdeploy.toml` in the current directory.
    pub fn from_current_dir() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_path(cwd.join(CONFIG_FILE_NAME)))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory relative paths in the config are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load the config, falling back to defaults when the file is missing.
    pub fn load(&self) -> anyhow::Result<NetdeployConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                path = %self.config_path.display(),
                "config file not found, using defaults"
            );
            return Ok(NetdeployConfig::new());
        }
        parser::parse_config(&self.config_path)
    }

    /// Absolute artifacts directory for a loaded config.
    pub fn artifacts_dir(&self, config: &NetdeployConfig) -> PathBuf {
        let dir = &config.deploy.artifacts_dir;
        if dir.is_absolute() {
            dir.clone()
        } else {
            self.base_dir().join(dir)
        }
    }
}
