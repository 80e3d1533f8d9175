//! Configuration for Monte-Carlo estimation and the sequential test.

use crate::error::SmcError;

/// Configuration for [`estimate_reachability`](crate::estimate_reachability).
///
/// # Example
///
/// ```
/// use mdpcheck_smc::EstimateConfig;
///
/// let config = EstimateConfig::new()
///     .with_horizon(20)
///     .with_epsilon(0.05)
///     .with_delta(0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct EstimateConfig {
    horizon: usize,
    epsilon: f64,
    delta: f64,
}

impl EstimateConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `horizon = 10`, `epsilon = 0.01`, `delta = 0.05`.
    pub fn new() -> Self {
        Self {
            horizon: 10,
            epsilon: 0.01,
            delta: 0.05,
        }
    }

    /// Sets the number of steps per simulated path.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the absolute precision of the estimate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the probability that the estimate misses by more than epsilon.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Returns the number of steps per simulated path.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns the precision.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the error rate.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Validates this configuration.
    ///
    /// `epsilon` must be finite and positive, `delta` in the open interval
    /// (0, 1).
    pub fn validate(&self) -> Result<(), SmcError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SmcError::InvalidParameter {
                reason: format!("epsilon must be finite and positive, got {}", self.epsilon),
            });
        }
        open_unit("delta", self.delta)
    }
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`sequential_test`](crate::sequential_test).
///
/// The test separates `P ≤ theta − epsilon` from `P ≥ theta + epsilon`
/// with error rates `alpha` and `beta`.
#[derive(Clone, Debug)]
pub struct SprtConfig {
    horizon: usize,
    alpha: f64,
    beta: f64,
    epsilon: f64,
    theta: f64,
    max_iters: usize,
}

impl SprtConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `horizon = 10`, `alpha = beta = 0.01`, `epsilon = 0.01`,
    /// `theta = 0.5`, `max_iters = 10_000`.
    pub fn new() -> Self {
        Self {
            horizon: 10,
            alpha: 0.01,
            beta: 0.01,
            epsilon: 0.01,
            theta: 0.5,
            max_iters: 10_000,
        }
    }

    /// Sets the number of steps per simulated path.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the type I error bound.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the type II error bound.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the half-width of the indifference region around `theta`.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the probability threshold under test.
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Sets the maximum number of draws before giving up.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    // --- Accessors ---

    /// Returns the number of steps per simulated path.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns alpha.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns beta.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns theta.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Returns the draw budget.
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Validates this configuration.
    ///
    /// `alpha` and `beta` must be in (0, 1) with `alpha + beta < 1`,
    /// `epsilon` positive, and both `theta − epsilon` and `theta + epsilon`
    /// strictly inside (0, 1).
    pub fn validate(&self) -> Result<(), SmcError> {
        open_unit("alpha", self.alpha)?;
        open_unit("beta", self.beta)?;
        if self.alpha + self.beta >= 1.0 {
            return Err(SmcError::InvalidParameter {
                reason: format!(
                    "alpha + beta must be below 1, got {}",
                    self.alpha + self.beta
                ),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SmcError::InvalidParameter {
                reason: format!("epsilon must be finite and positive, got {}", self.epsilon),
            });
        }
        open_unit("theta - epsilon", self.theta - self.epsilon)?;
        open_unit("theta + epsilon", self.theta + self.epsilon)
    }
}

impl Default for SprtConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn open_unit(name: &str, value: f64) -> Result<(), SmcError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SmcError::InvalidParameter {
            reason: format!("{name} must be in (0, 1), got {value}"),
        })
    }
}
