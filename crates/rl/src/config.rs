//! Configuration for value iteration and Q-learning.

use crate::error::RlError;

/// Configuration for [`value_iteration`](crate::value_iteration).
///
/// # Example
///
/// ```
/// use mdpcheck_rl::ValueIterationConfig;
///
/// let config = ValueIterationConfig::new().with_gamma(0.5).with_epsilon(1e-9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ValueIterationConfig {
    gamma: f64,
    epsilon: f64,
    max_iters: usize,
}

impl ValueIterationConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `gamma = 0.9`, `epsilon = 1e-6`, `max_iters = 1000`.
    pub fn new() -> Self {
        Self {
            gamma: 0.9,
            epsilon: 1e-6,
            max_iters: 1000,
        }
    }

    /// Sets the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the convergence threshold on the Euclidean norm of an update.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Returns the discount factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the convergence threshold.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the iteration cap.
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Validates this configuration.
    ///
    /// `gamma` must be in `[0, 1]` and `epsilon` finite and positive.
    pub fn validate(&self) -> Result<(), RlError> {
        check_gamma(self.gamma)?;
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(RlError::InvalidParameter {
                reason: format!("epsilon must be finite and positive, got {}", self.epsilon),
            });
        }
        Ok(())
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`q_learning`](crate::q_learning).
#[derive(Clone, Debug)]
pub struct QLearningConfig {
    gamma: f64,
    max_iters: usize,
}

impl QLearningConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `gamma = 0.9`, `max_iters = 10_000`.
    pub fn new() -> Self {
        Self {
            gamma: 0.9,
            max_iters: 10_000,
        }
    }

    /// Sets the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the number of updates.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Returns the discount factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the number of updates.
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), RlError> {
        check_gamma(self.gamma)
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_gamma(gamma: f64) -> Result<(), RlError> {
    if (0.0..=1.0).contains(&gamma) {
        Ok(())
    } else {
        Err(RlError::InvalidParameter {
            reason: format!("gamma must be in [0, 1], got {gamma}"),
        })
    }
}
