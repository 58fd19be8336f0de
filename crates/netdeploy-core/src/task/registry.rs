//! Task registry.
//!
//! Tasks are registered once at startup. Experimental tasks are only
//! registered when their feature flag is on, so a disabled task is simply
//! absent from lookups.

use crate::cancel::Cancellation;
use crate::context::DeployContext;
use crate::error::TaskError;
use crate::feature::FeatureFlags;

use super::{Task, deploy::DeployTask};

/// Registry of runnable tasks.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Box<dyn Task>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Create a registry with every built-in task the flags allow.
    pub fn with_builtin_tasks(flags: &FeatureFlags, context: &DeployContext) -> Self {
        let mut registry = Self::new();
        if flags.deploy_task_enabled() {
            registry.tasks.push(Box::new(DeployTask::new(context.clone())));
        } else {
            tracing::debug!("deploy task disabled by feature flag");
        }
        registry
    }

    /// Register a task. Identifiers must be unique.
    pub fn register(&mut self, task: Box<dyn Task>) -> Result<(), TaskError> {
        if self.contains(task.id()) {
            return Err(TaskError::DuplicateTask(task.id().to_string()));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Get all registered tasks.
    pub fn all(&self) -> &[Box<dyn Task>] {
        &self.tasks
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&dyn Task> {
        self.tasks.iter().find(|t| t.id() == id).map(|t| t.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// List all task IDs in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.id()).collect()
    }

    /// Look up and run a task.
    pub async fn run(
        &self,
        id: &str,
        args: serde_json::Value,
        cancel: &Cancellation,
    ) -> Result<serde_json::Value, TaskError> {
        let task = self
            .get(id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
        tracing::debug!(task = id, "running task");
        task.run(args, cancel).await
    }
}
