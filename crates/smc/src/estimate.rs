//! Monte-Carlo estimation of bounded reachability.

use mdpcheck_model::{Model, UniformRandom, step};
use rand::Rng;
use tracing::debug;

use crate::config::EstimateConfig;
use crate::error::SmcError;

/// Result of [`estimate_reachability`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Fraction of sampled paths that visited the target.
    pub probability: f64,
    /// Number of paths drawn.
    pub samples: usize,
    /// Number of paths that visited the target.
    pub hits: usize,
}

/// Number of samples for an `epsilon`-precise estimate that holds with
/// probability at least `1 − delta` (Chernoff-Hoeffding):
/// `ceil((ln 2 − ln delta) / (4·epsilon²))`.
///
/// # Errors
///
/// [`SmcError::InvalidParameter`] for a non-positive epsilon or a delta
/// outside (0, 1).
///
/// # Example
///
/// ```
/// use mdpcheck_smc::chernoff_sample_count;
///
/// assert_eq!(chernoff_sample_count(0.1, 0.05).unwrap(), 93);
/// ```
pub fn chernoff_sample_count(epsilon: f64, delta: f64) -> Result<usize, SmcError> {
    EstimateConfig::new()
        .with_epsilon(epsilon)
        .with_delta(delta)
        .validate()?;
    let n = ((2f64.ln() - delta.ln()) / (4.0 * epsilon * epsilon)).ceil();
    Ok(n as usize)
}

/// Estimates the probability that a run from the initial state visits
/// `target` within `config.horizon()` steps.
///
/// Paths are drawn with [`UniformRandom`] choosing among enabled actions, so
/// on an MDP this estimates the probability under the uniform scheduler.
///
/// # Errors
///
/// [`SmcError::InvalidParameter`] from config validation,
/// [`SmcError::Model`] for an unknown target.
pub fn estimate_reachability<R: Rng>(
    model: &Model,
    target: &str,
    config: &EstimateConfig,
    rng: &mut R,
) -> Result<Estimate, SmcError> {
    config.validate()?;
    let target = model.state_index(target)?;
    let samples = chernoff_sample_count(config.epsilon(), config.delta())?;

    let mut hits = 0;
    for _ in 0..samples {
        if path_hits(model, target, config.horizon(), rng)? {
            hits += 1;
        }
    }
    let probability = hits as f64 / samples as f64;
    debug!(
        target = model.state_label(target),
        horizon = config.horizon(),
        samples,
        hits,
        probability,
        "Monte-Carlo estimate"
    );
    Ok(Estimate {
        probability,
        samples,
        hits,
    })
}

/// Simulates up to `horizon` steps from the initial state under the uniform
/// policy and reports whether `target` was visited. Stops at the first
/// visit.
pub(crate) fn path_hits<R: Rng>(
    model: &Model,
    target: usize,
    horizon: usize,
    rng: &mut R,
) -> Result<bool, SmcError> {
    let mut path = Vec::with_capacity(horizon + 1);
    path.push(model.initial_state());
    if path[0] == target {
        return Ok(true);
    }
    for _ in 0..horizon {
        let next = step(model, &path, &mut UniformRandom, rng)?.next;
        if next == target {
            return Ok(true);
        }
        path.push(next);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdpcheck_model::ModelBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn coin() -> Model {
        let mut b = ModelBuilder::new();
        for s in ["flip", "heads", "tails"] {
            b.add_state(s, 0.0).unwrap();
        }
        b.update_weight("flip", "heads", None, 1.0).unwrap();
        b.update_weight("flip", "tails", None, 1.0).unwrap();
        b.update_weight("heads", "heads", None, 1.0).unwrap();
        b.update_weight("tails", "tails", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn sample_count_formula() {
        // (ln 2 + ln 20) / 0.04 = 92.2...
        assert_eq!(chernoff_sample_count(0.1, 0.05).unwrap(), 93);
        assert_eq!(chernoff_sample_count(0.5, 0.5).unwrap(), 2);
        assert!(chernoff_sample_count(0.0, 0.1).is_err());
        assert!(chernoff_sample_count(0.1, 1.0).is_err());
    }

    #[test]
    fn sample_count_grows_with_precision() {
        let coarse = chernoff_sample_count(0.1, 0.01).unwrap();
        let fine = chernoff_sample_count(0.01, 0.01).unwrap();
        assert!(fine > 90 * coarse);
    }

    #[test]
    fn fair_coin_within_epsilon() {
        let mut rng = StdRng::seed_from_u64(42);
        let cfg = EstimateConfig::new()
            .with_horizon(1)
            .with_epsilon(0.02)
            .with_delta(0.01);
        let est = estimate_reachability(&coin(), "heads", &cfg, &mut rng).unwrap();
        assert_eq!(est.samples, chernoff_sample_count(0.02, 0.01).unwrap());
        assert!((est.probability - 0.5).abs() < 0.05, "{est:?}");
        assert_eq!(est.probability, est.hits as f64 / est.samples as f64);
    }

    #[test]
    fn zero_horizon_only_sees_initial_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = EstimateConfig::new().with_horizon(0).with_epsilon(0.2);
        let m = coin();
        assert_eq!(
            estimate_reachability(&m, "heads", &cfg, &mut rng).unwrap().hits,
            0
        );
        assert_eq!(
            estimate_reachability(&m, "flip", &cfg, &mut rng)
                .unwrap()
                .probability,
            1.0
        );
    }

    #[test]
    fn unknown_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = estimate_reachability(&coin(), "edge", &EstimateConfig::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SmcError::Model(_)));
    }
}
