//! Named tasks invoked by identifier.
//!
//! A task takes JSON arguments and produces a JSON result, so frontends can
//! drive any registered task without knowing its concrete types.

pub mod deploy;
pub mod registry;

use async_trait::async_trait;

use crate::cancel::Cancellation;
use crate::error::TaskError;

pub use deploy::{DeployArgs, DeployOutput, DeployState, DeployTask};
pub use registry::TaskRegistry;

/// Identifier of the deploy task.
pub const TASK_DEPLOY: &str = "deploy";

/// A runnable, registered unit of work.
#[async_trait]
pub trait Task: std::fmt::Debug + Send + Sync {
    /// Unique identifier used for lookup.
    fn id(&self) -> &'static str;

    /// One-line summary shown in task listings.
    fn description(&self) -> &'static str;

    /// Run the task.
    ///
    /// `args` is the task's argument object; `Value::Null` means "all
    /// defaults".
    async fn run(
        &self,
        args: serde_json::Value,
        cancel: &Cancellation,
    ) -> Result<serde_json::Value, TaskError>;
}
