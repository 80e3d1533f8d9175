//! Configuration for model building.

/// What `build` does with a state that has no outgoing transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadlockPolicy {
    /// Add a no-action self-loop with probability 1 and log a warning.
    #[default]
    SelfLoop,
    /// Fail with [`ModelError::NoEnabledAction`](crate::ModelError::NoEnabledAction).
    Reject,
}

/// Configuration for [`ModelBuilder::build`](crate::ModelBuilder::build).
///
/// # Example
///
/// ```
/// use mdpcheck_model::{BuildConfig, DeadlockPolicy};
///
/// let config = BuildConfig::new().with_deadlock(DeadlockPolicy::Reject);
/// assert_eq!(config.deadlock(), DeadlockPolicy::Reject);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    deadlock: DeadlockPolicy,
}

impl BuildConfig {
    /// Creates a new configuration with defaults (`deadlock = SelfLoop`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadlock handling policy.
    pub fn with_deadlock(mut self, deadlock: DeadlockPolicy) -> Self {
        self.deadlock = deadlock;
        self
    }

    /// Returns the deadlock handling policy.
    pub fn deadlock(&self) -> DeadlockPolicy {
        self.deadlock
    }
}
