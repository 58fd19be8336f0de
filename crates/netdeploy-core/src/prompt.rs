//! Operator prompts.
//!
//! The core never talks to a terminal directly. Frontends provide a
//! [`Prompter`]; the CLI backs it with dialoguer.

use async_trait::async_trait;
use thiserror::Error;

/// A prompt could not produce an answer.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The operator dismissed the prompt (Esc, Ctrl-C, closed stdin).
    #[error("prompt aborted")]
    Aborted,

    /// No operator is attached (e.g. stdin is not a terminal).
    #[error("prompt unavailable: {0}")]
    Unavailable(String),
}

/// Interactive questions asked during a task.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a yes/no continuation question.
    async fn prompt_to_continue(&self, message: &str) -> Result<bool, PromptError>;

    /// Let the operator pick zero or more of `candidates`.
    ///
    /// Returns the indices of the chosen candidates.
    async fn prompt_to_select_multiple(
        &self,
        message: &str,
        candidates: &[String],
    ) -> Result<Vec<usize>, PromptError>;
}

/// Prompter for unattended runs: every prompt is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompter;

#[async_trait]
impl Prompter for NonInteractivePrompter {
    async fn prompt_to_continue(&self, _message: &str) -> Result<bool, PromptError> {
        Err(PromptError::Unavailable("non-interactive session".to_string()))
    }

    async fn prompt_to_select_multiple(
        &self,
        _message: &str,
        _candidates: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        Err(PromptError::Unavailable("non-interactive session".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_interactive_rejects_everything() {
        let prompter = NonInteractivePrompter;
        assert!(prompter.prompt_to_continue("go?").await.is_err());
        assert!(
            prompter
                .prompt_to_select_multiple("pick", &["a".to_string()])
                .await
                .is_err()
        );
    }
}
