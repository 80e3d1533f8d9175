//! Error types for the mdpcheck-exact crate.

/// Error type for all fallible operations in the mdpcheck-exact crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExactError {
    /// Returned when an algorithm restricted to Markov chains gets an MDP.
    #[error("the model is not a Markov chain")]
    NotAMarkovChain,

    /// Returned when the infinite-horizon discounted system has no unique solution.
    #[error("model diverges: (I - gamma * P) is singular for gamma = {gamma}")]
    DivergedModel {
        /// Discount factor used.
        gamma: f64,
    },

    /// Returned when the reachability system over undecided states is singular.
    #[error("reachability system over {n_unknown} undecided states is singular")]
    SingularSystem {
        /// Size of the system.
        n_unknown: usize,
    },

    /// Returned when the linear program has no feasible point.
    #[error("linear program is infeasible")]
    LpInfeasible,

    /// Returned when the linear program objective is unbounded.
    #[error("linear program is unbounded")]
    LpUnbounded,

    /// Returned when the simplex method exceeds its pivot budget.
    #[error("linear program not solved after {pivots} pivots")]
    LpPivotLimit {
        /// Number of pivots performed.
        pivots: usize,
    },

    /// Returned when a numeric parameter is out of range.
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
    fn error_not_a_markov_chain() {
        assert_eq!(
            ExactError::NotAMarkovChain.to_string(),
            "the model is not a Markov chain"
        );
    }

    #[test]
    fn error_diverged_model() {
        let e = ExactError::DivergedModel { gamma: 1.0 };
        assert_eq!(
            e.to_string(),
            "model diverges: (I - gamma * P) is singular for gamma = 1"
        );
    }

    #[test]
    fn error_lp_infeasible() {
        assert_eq!(
            ExactError::LpInfeasible.to_string(),
            "linear program is infeasible"
        );
    }

    #[test]
    fn error_model_is_transparent() {
        let inner = mdpcheck_model::ModelError::UnknownState {
            label: "T".to_string(),
        };
        let e = ExactError::from(inner);
        assert_eq!(e.to_string(), "state \"T\" is not declared");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<ExactError>();
    }
}
