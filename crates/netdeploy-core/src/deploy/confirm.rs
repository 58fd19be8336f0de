//! Confirmation before side effects.

use crate::network::TargetSet;
use crate::prompt::Prompter;

/// Ask the operator to confirm a deployment to `targets`.
///
/// A prompt that cannot be answered counts as a decline.
pub async fn confirm_targets(targets: &TargetSet, prompter: &dyn Prompter) -> bool {
    match prompter
        .prompt_to_continue(&confirmation_message(targets))
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::debug!(error = %e, "confirmation prompt failed");
            false
        }
    }
}

fn confirmation_message(targets: &TargetSet) -> String {
    format!(
        "Deploy to {} network{}: {}. Continue?",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        targets.names().join(", ")
    )
}
