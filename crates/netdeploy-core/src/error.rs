//! Errors surfaced at the task boundary.

use thiserror::Error;

/// Failure of a task invocation.
///
/// Per-target deployment failures never appear here; they are recorded in
/// the [`DeploymentReport`](crate::deploy::DeploymentReport). Operator aborts
/// are not errors either.
#[derive(Debug, Error)]
pub enum TaskError {
    /// An explicitly requested network is not configured.
    #[error("unknown network '{name}' (available: {})", format_available(.available))]
    UnknownTarget {
        name: String,
        available: Vec<String>,
    },

    /// No task is registered under the identifier.
    #[error("task '{0}' is not registered")]
    TaskNotFound(String),

    /// A task with the same identifier was already registered.
    #[error("task '{0}' is already registered")]
    DuplicateTask(String),

    /// Task arguments could not be decoded.
    #[error("invalid arguments for task '{task}': {message}")]
    InvalidArguments { task: String, message: String },

    /// The target set handed to the aggregator broke its invariants.
    #[error("malformed target set: {0}")]
    MalformedTargetSet(String),

    /// The invocation was cancelled before a report was produced.
    #[error("task cancelled")]
    Cancelled,

    /// Programmer or infrastructure fault.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
