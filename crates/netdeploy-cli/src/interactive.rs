//! Terminal prompts for the deploy task.
//!
//! Uses dialoguer for terminal UI prompts. Prompts block on stdin, so each
//! one runs on the blocking pool and the task awaits its answer.

use async_trait::async_trait;
use dialoguer::{Confirm, MultiSelect, theme::ColorfulTheme};

use netdeploy_core::prompt::{PromptError, Prompter};

/// Prompter backed by the controlling terminal.
#[derive(Debug, Clone, Copy)]
pub struct DialoguerPrompter {
    /// Whether an operator is attached to the terminal
    attended: bool,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerPrompter {
    /// Create a prompter for the current terminal.
    pub fn new() -> Self {
        Self {
            attended: console::user_attended_stderr(),
        }
    }

    /// Create a prompter that behaves as if no terminal were attached.
    #[cfg(test)]
    pub fn detached() -> Self {
        Self { attended: false }
    }

    fn ensure_attended(&self) -> Result<(), PromptError> {
        if self.attended {
            Ok(())
        } else {
            Err(PromptError::Unavailable(
                "no terminal attached; pass --networks or --ci".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn prompt_to_continue(&self, message: &str) -> Result<bool, PromptError> {
        self.ensure_attended()?;
        let message = message.to_string();

        run_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .default(false)
                .interact_opt()
        })
        .await
    }

    async fn prompt_to_select_multiple(
        &self,
        message: &str,
        candidates: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        self.ensure_attended()?;
        let message = format!("{} (space to toggle, enter to confirm)", message);
        let candidates = candidates.to_vec();

        run_blocking(move || {
            MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .items(&candidates)
                .interact_opt()
        })
        .await
    }
}

/// Run a dialoguer prompt off the async runtime.
///
/// `Ok(None)` (Esc or `q`) is an abort.
async fn run_blocking<T, F>(prompt: F) -> Result<T, PromptError>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<Option<T>> + Send + 'static,
{
    match tokio::task::spawn_blocking(prompt).await {
        Ok(Ok(Some(answer))) => Ok(answer),
        Ok(Ok(None)) => Err(PromptError::Aborted),
        Ok(Err(e)) => Err(prompt_error(e)),
        Err(e) => Err(PromptError::Unavailable(format!("prompt task failed: {}", e))),
    }
}

fn prompt_error(error: dialoguer::Error) -> PromptError {
    match error {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PromptError::Aborted
        }
        other => PromptError::Unavailable(other.to_string()),
    }
}
