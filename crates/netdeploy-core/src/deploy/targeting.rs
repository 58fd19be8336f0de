//! Network selection for a deploy invocation.

use std::collections::HashSet;

use crate::error::TaskError;
use crate::network::{NetworkTarget, Stage, TargetSet};
use crate::prompt::Prompter;

/// Result of target selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Deploy to these networks (possibly none).
    Targets(TargetSet),
    /// The operator backed out of the prompt.
    Aborted,
}

/// Resolves the networks an invocation deploys to.
#[derive(Debug, Clone)]
pub struct TargetSelector<'a> {
    networks: &'a [NetworkTarget],
    stage: Option<Stage>,
}

impl<'a> TargetSelector<'a> {
    pub fn new(networks: &'a [NetworkTarget]) -> Self {
        Self {
            networks,
            stage: None,
        }
    }

    /// Restrict candidates to a single stage.
    pub fn with_stage(mut self, stage: Option<Stage>) -> Self {
        self.stage = stage;
        self
    }

    /// Networks eligible for selection under the stage filter.
    pub fn candidates(&self) -> Vec<&'a NetworkTarget> {
        self.networks
            .iter()
            .filter(|n| n.matches_stage(self.stage))
            .collect()
    }

    /// Resolve explicitly named networks.
    ///
    /// Order follows `names`; repeated names collapse into their first
    /// occurrence. An unknown name fails the whole selection.
    pub fn resolve_explicit(&self, names: &[String]) -> Result<TargetSet, TaskError> {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(names.len());

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let target = self
                .networks
                .iter()
                .find(|n| n.name() == name)
                .filter(|n| n.matches_stage(self.stage))
                .ok_or_else(|| TaskError::UnknownTarget {
                    name: name.clone(),
                    available: self
                        .candidates()
                        .iter()
                        .map(|n| n.name().to_string())
                        .collect(),
                })?;
            targets.push(target.clone());
        }

        Ok(TargetSet::from_targets(targets))
    }

    /// Resolve the target set for an invocation.
    ///
    /// - `explicit = Some(..)` is used verbatim (possibly empty).
    /// - `explicit = None` with `unattended` selects every candidate.
    /// - `explicit = None` otherwise asks the operator to pick.
    pub async fn select(
        &self,
        explicit: Option<&[String]>,
        prompter: &dyn Prompter,
        unattended: bool,
    ) -> Result<Selection, TaskError> {
        if let Some(names) = explicit {
            return self.resolve_explicit(names).map(Selection::Targets);
        }

        let candidates = self.candidates();
        if unattended {
            tracing::debug!(count = candidates.len(), "selecting all candidate networks");
            return Ok(Selection::Targets(TargetSet::from_targets(
                candidates.into_iter().cloned(),
            )));
        }

        if candidates.is_empty() {
            tracing::debug!("no candidate networks to choose from");
            return Ok(Selection::Targets(TargetSet::empty()));
        }

        let labels: Vec<String> = candidates.iter().map(|n| candidate_label(n)).collect();
        let picked = match prompter
            .prompt_to_select_multiple("Which networks would you like to deploy to?", &labels)
            .await
        {
            Ok(picked) => picked,
            Err(e) => {
                tracing::debug!(error = %e, "network selection aborted");
                return Ok(Selection::Aborted);
            }
        };

        let mut chosen = Vec::with_capacity(picked.len());
        for index in picked {
            let target = candidates.get(index).ok_or_else(|| {
                anyhow::anyhow!(
                    "prompt returned index {} for {} candidates",
                    index,
                    candidates.len()
                )
            })?;
            chosen.push((*target).clone());
        }

        Ok(Selection::Targets(TargetSet::from_targets(chosen)))
    }
}

fn candidate_label(target: &NetworkTarget) -> String {
    match target.stage() {
        Some(stage) => format!("{} ({})", target.name(), stage),
        None => target.name().to_string(),
    }
}
