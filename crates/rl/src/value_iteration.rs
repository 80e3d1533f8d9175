//! Value iteration for reward-maximizing policies.

use mdpcheck_model::Model;
use ndarray::Array1;
use tracing::{debug, warn};

use crate::config::ValueIterationConfig;
use crate::error::RlError;
use crate::result::{ValueIterationResult, greedy_action};

/// Runs Bellman sweeps
/// `V[s] ← max_a ( reward[s] + gamma · Σ_t P[s,a,t]·V[t] )` over enabled
/// actions until an update moves `V` by less than `epsilon` (Euclidean norm)
/// or `max_iters` sweeps are done.
///
/// The previous vector starts at +∞ so at least one sweep always runs. The
/// returned policy is greedy with respect to the last computed vector.
///
/// # Errors
///
/// [`RlError::InvalidParameter`] from config validation.
///
/// # Example
///
/// ```
/// use mdpcheck_model::ModelBuilder;
/// use mdpcheck_rl::{ValueIterationConfig, value_iteration};
///
/// let mut b = ModelBuilder::new();
/// b.add_state("home", 5.0)?;
/// b.update_weight("home", "home", None, 1.0)?;
/// let model = b.build(None)?;
///
/// let config = ValueIterationConfig::new().with_gamma(0.5).with_epsilon(1e-10);
/// let result = value_iteration(&model, &config)?;
/// assert!((result.values()[0] - 10.0).abs() < 1e-8);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn value_iteration(
    model: &Model,
    config: &ValueIterationConfig,
) -> Result<ValueIterationResult, RlError> {
    config.validate()?;
    let n = model.n_states();
    let gamma = config.gamma();
    let backup =
        |s: usize, a: usize, v: &Array1<f64>| model.reward(s) + gamma * model.row(s, a).dot(v);

    let mut prev = Array1::from_elem(n, f64::INFINITY);
    let mut next = Array1::<f64>::zeros(n);
    let mut iterations = 0;
    while distance(&next, &prev) >= config.epsilon() && iterations < config.max_iters() {
        prev.assign(&next);
        for s in 0..n {
            next[s] = model
                .enabled_actions(s)
                .iter()
                .map(|&a| backup(s, a, &prev))
                .fold(f64::NEG_INFINITY, f64::max);
        }
        iterations += 1;
    }

    let converged = distance(&next, &prev) < config.epsilon();
    if !converged {
        warn!(
            iterations,
            epsilon = config.epsilon(),
            "value iteration stopped before converging"
        );
    }
    debug!(iterations, converged, gamma, "value iteration finished");

    let policy = (0..n)
        .map(|s| greedy_action(model, s, |a| backup(s, a, &next)))
        .collect();
    Ok(ValueIterationResult::new(
        next.to_vec(),
        policy,
        iterations,
        converged,
    ))
}

fn distance(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let d = a - b;
    d.dot(&d).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mdpcheck_model::{ModelBuilder, NO_ACTION};

    /// `left` keeps a state with reward 5 looping; `right` escapes to an
    /// absorbing zero-reward state.
    fn two_state() -> Model {
        let mut b = ModelBuilder::new();
        b.add_state("rich", 5.0).unwrap();
        b.add_state("poor", 0.0).unwrap();
        b.add_actions(&["stay", "leave"]).unwrap();
        b.update_weight("rich", "rich", Some("stay"), 1.0).unwrap();
        b.update_weight("rich", "poor", Some("leave"), 1.0).unwrap();
        b.update_weight("poor", "poor", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn self_loop_reward_converges_to_geometric_sum() {
        let m = two_state();
        let cfg = ValueIterationConfig::new()
            .with_gamma(0.5)
            .with_epsilon(1e-12)
            .with_max_iters(200);
        let r = value_iteration(&m, &cfg).unwrap();
        assert!(r.converged());
        assert_abs_diff_eq!(r.values()[0], 10.0, epsilon = 1e-10);
        assert_abs_diff_eq!(r.values()[1], 0.0, epsilon = 1e-12);
        let stay = m.action_index("stay").unwrap();
        assert_eq!(r.policy(), &[stay, NO_ACTION]);
    }

    #[test]
    fn all_zero_rewards_still_sweeps_once() {
        let mut b = ModelBuilder::new();
        b.add_state("a", 0.0).unwrap();
        b.update_weight("a", "a", None, 1.0).unwrap();
        let m = b.build(None).unwrap();
        let r = value_iteration(&m, &ValueIterationConfig::new()).unwrap();
        assert_eq!(r.iterations(), 1);
        assert!(r.converged());
        assert_eq!(r.values(), &[0.0]);
    }

    #[test]
    fn iteration_cap_reports_not_converged() {
        let cfg = ValueIterationConfig::new()
            .with_gamma(0.9)
            .with_epsilon(1e-12)
            .with_max_iters(3);
        let r = value_iteration(&two_state(), &cfg).unwrap();
        assert_eq!(r.iterations(), 3);
        assert!(!r.converged());
        // 5 + 4.5 + 4.05
        assert_abs_diff_eq!(r.values()[0], 13.55, epsilon = 1e-12);
    }

    #[test]
    fn zero_iterations_returns_zero_vector() {
        let cfg = ValueIterationConfig::new().with_max_iters(0);
        let r = value_iteration(&two_state(), &cfg).unwrap();
        assert_eq!(r.iterations(), 0);
        assert!(!r.converged());
        assert_eq!(r.values(), &[0.0, 0.0]);
    }

    #[test]
    fn rejects_bad_gamma() {
        let cfg = ValueIterationConfig::new().with_gamma(2.0);
        assert!(matches!(
            value_iteration(&two_state(), &cfg),
            Err(RlError::InvalidParameter { .. })
        ));
    }
}
