//! Netdeploy Core Library
//!
//! Provides the deploy task: network selection, operator confirmation,
//! concurrent per-network delivery and a consolidated report, exposed
//! through a feature-gated task registry.

pub mod artifact;
pub mod cancel;
pub mod config;
pub mod context;
pub mod deploy;
pub mod error;
pub mod feature;
pub mod network;
pub mod prompt;
pub mod task;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DeploySettings, NetdeployConfig, NetworkConfig};

    // Networks and artifacts
    pub use crate::artifact::{ArtifactSource, ArtifactStore, DeploymentArtifact};
    pub use crate::network::{NetworkTarget, Stage, TargetSet};

    // Deploy
    pub use crate::deploy::{
        DeployRequest, Deployer, DeploymentOutcome, DeploymentReport, HttpDeployer, ReportStatus,
    };

    // Tasks
    pub use crate::cancel::Cancellation;
    pub use crate::context::DeployContext;
    pub use crate::error::TaskError;
    pub use crate::feature::{ENABLE_DEPLOY_TASK_ENV, FeatureFlags};
    pub use crate::prompt::{NonInteractivePrompter, PromptError, Prompter};
    pub use crate::task::{DeployArgs, DeployTask, TASK_DEPLOY, Task, TaskRegistry};
}
