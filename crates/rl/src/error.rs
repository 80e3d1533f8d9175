//! Error types for the mdpcheck-rl crate.

/// Error type for all fallible operations in the mdpcheck-rl crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RlError {
    /// Returned when a configuration value is out of range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem.
        reason: String,
    },

    /// Model error.
    #[error(transparent)]
    Model(#[from] mdpcheck_model::ModelError),
}
