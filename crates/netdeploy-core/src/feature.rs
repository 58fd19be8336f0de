//! Startup-time feature flags.
//!
//! Flags are read from the environment once, when the frontend builds its
//! [`TaskRegistry`](crate::task::TaskRegistry), and then passed around as
//! plain values. Nothing in the task code reads the environment itself.

/// Enables the experimental `deploy` task.
pub const ENABLE_DEPLOY_TASK_ENV: &str = "NETDEPLOY_ENABLE_EXPERIMENTAL_TASK_DEPLOY";

/// Feature toggles captured at process startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    deploy_task: bool,
}

impl FeatureFlags {
    /// Read all toggles from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read toggles through an arbitrary lookup (for tests and embedding).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            deploy_task: is_truthy(lookup(ENABLE_DEPLOY_TASK_ENV).as_deref()),
        }
    }

    /// Flags with the deploy task switched on or off explicitly.
    pub fn with_deploy_task(mut self, enabled: bool) -> Self {
        self.deploy_task = enabled;
        self
    }

    /// Whether the deploy task should be registered.
    pub fn deploy_task_enabled(&self) -> bool {
        self.deploy_task
    }
}

/// Unset or empty disables a toggle; any other value enables it.
fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags_with(value: Option<&str>) -> FeatureFlags {
        let value = value.map(str::to_string);
        FeatureFlags::from_lookup(|key| {
            assert_eq!(key, ENABLE_DEPLOY_TASK_ENV);
            value.clone()
        })
    }

    #[test]
    fn unset_is_disabled() {
        assert!(!flags_with(None).deploy_task_enabled());
    }

    #[test]
    fn empty_is_disabled() {
        assert!(!flags_with(Some("")).deploy_task_enabled());
    }

    #[test]
    fn any_non_empty_value_enables() {
        assert!(flags_with(Some("1")).deploy_task_enabled());
        assert!(flags_with(Some("true")).deploy_task_enabled());
        assert!(flags_with(Some("yes")).deploy_task_enabled());
    }

    #[test]
    fn default_is_disabled() {
        assert!(!FeatureFlags::default().deploy_task_enabled());
        assert!(
            FeatureFlags::default()
                .with_deploy_task(true)
                .deploy_task_enabled()
        );
    }
}
