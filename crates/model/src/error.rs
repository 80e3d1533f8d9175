//! Error types for the mdpcheck-model crate.

/// Error type for all fallible operations in the mdpcheck-model crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Returned when a state label is declared twice.
    #[error("state {label:?} is declared twice")]
    DuplicateState {
        /// The repeated label.
        label: String,
    },

    /// Returned when an action label is declared twice.
    #[error("action {label:?} is declared twice")]
    DuplicateAction {
        /// The repeated label.
        label: String,
    },

    /// Returned when a `(source, action, target)` weight is registered twice.
    #[error("transition {from} [{action}] -> {target} is already defined")]
    DuplicateTransition {
        /// Source state label.
        from: String,
        /// Action label (`-` for the no-action sentinel).
        action: String,
        /// Target state label.
        target: String,
    },

    /// Returned when a state label was never declared.
    #[error("state {label:?} is not declared")]
    UnknownState {
        /// The unknown label.
        label: String,
    },

    /// Returned when an action label was never declared.
    #[error("action {label:?} is not declared")]
    UnknownAction {
        /// The unknown label.
        label: String,
    },

    /// Returned when a transition weight is negative or non-finite.
    #[error(
        "invalid weight {weight} for transition {from} -> {target} (must be finite and >= 0)"
    )]
    InvalidWeight {
        /// Source state label.
        from: String,
        /// Target state label.
        target: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Returned when a state reward is non-finite.
    #[error("invalid reward {reward} for state {label:?} (must be finite)")]
    InvalidReward {
        /// State label.
        label: String,
        /// The rejected reward.
        reward: f64,
    },

    /// Returned when a state has transitions both with and without actions.
    #[error("state {state:?} has transitions with and without actions")]
    ActionCoherence {
        /// Offending state label.
        state: String,
    },

    /// Returned when a state has no enabled action and deadlocks are rejected.
    #[error("state {state:?} has no outgoing transition")]
    NoEnabledAction {
        /// Offending state label.
        state: String,
    },

    /// Returned when building a model without any state.
    #[error("model has no states")]
    EmptyModel,

    /// Returned when a state index is out of range.
    #[error("state index {index} out of range (model has {n_states} states)")]
    InvalidState {
        /// The rejected index.
        index: usize,
        /// Number of states in the model.
        n_states: usize,
    },

    /// Returned when a policy picks an action that is not enabled.
    #[error("policy chose action {action} which is not enabled in state {state:?}")]
    InvalidPolicyChoice {
        /// Label of the current state.
        state: String,
        /// The chosen action index.
        action: usize,
    },

    /// Returned when a simulation step is requested with an empty path.
    #[error("cannot step from an empty path")]
    EmptyPath,
}
