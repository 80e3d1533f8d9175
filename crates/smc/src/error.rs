//! Error types for the mdpcheck-smc crate.

/// Error type for all fallible operations in the mdpcheck-smc crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SmcError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_parameter() {
        let e = SmcError::InvalidParameter {
            reason: "delta must be in (0, 1), got 2".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid parameter: delta must be in (0, 1), got 2"
        );
    }

    #[test]
    fn error_model_is_transparent() {
        let e = SmcError::from(mdpcheck_model::ModelError::EmptyPath);
        assert_eq!(e.to_string(), mdpcheck_model::ModelError::EmptyPath.to_string());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<SmcError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SmcError>();
    }
}
