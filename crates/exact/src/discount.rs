//! Discounted expected reward for Markov chains.

use mdpcheck_model::Model;
use ndarray::Array1;
use tracing::debug;

use crate::error::ExactError;
use crate::horizon::Horizon;
use crate::linalg;

/// Expected discounted reward accumulated from every state.
///
/// With chain matrix `P` and reward vector `r`, a bounded horizon iterates
/// `y ← gamma·P·y + r` `n` times from zero; an unbounded horizon solves
/// `(I − gamma·P)·y = r`.
///
/// # Errors
///
/// [`ExactError::InvalidParameter`] unless `gamma` is in `[0, 1]`,
/// [`ExactError::NotAMarkovChain`], and [`ExactError::DivergedModel`] when the
/// unbounded system is singular (e.g. `gamma = 1`).
pub fn discounted_value(
    model: &Model,
    horizon: Horizon,
    gamma: f64,
) -> Result<Vec<f64>, ExactError> {
    if !gamma.is_finite() || !(0.0..=1.0).contains(&gamma) {
        return Err(ExactError::InvalidParameter {
            reason: format!("gamma must be in [0, 1], got {gamma}"),
        });
    }
    if !model.is_markov_chain() {
        return Err(ExactError::NotAMarkovChain);
    }

    let p = model.chain_matrix();
    let r = Array1::from(model.rewards().to_vec());

    let y = match horizon {
        Horizon::Steps(steps) => {
            let mut y = Array1::<f64>::zeros(r.len());
            for _ in 0..steps {
                y = p.dot(&y) * gamma + &r;
            }
            y
        }
        Horizon::Unbounded => linalg::solve(linalg::identity_minus(&p, gamma), r)
            .ok_or(ExactError::DivergedModel { gamma })?,
    };
    debug!(%horizon, gamma, n_states = y.len(), "discounted value computed");
    Ok(y.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mdpcheck_model::ModelBuilder;

    /// Two states swapping deterministically; rewards 1 and 0.
    fn swap_chain() -> Model {
        let mut b = ModelBuilder::new();
        b.add_state("on", 1.0).unwrap();
        b.add_state("off", 0.0).unwrap();
        b.update_weight("on", "off", None, 1.0).unwrap();
        b.update_weight("off", "on", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn unbounded_closed_form() {
        // V(on) = 1 / (1 - g^2), V(off) = g / (1 - g^2)
        let v = discounted_value(&swap_chain(), Horizon::Unbounded, 0.5).unwrap();
        assert_abs_diff_eq!(v[0], 4.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v[1], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn bounded_unrolls() {
        let v = discounted_value(&swap_chain(), Horizon::Steps(3), 0.5).unwrap();
        // on: 1 + 0 + 0.25
        assert_abs_diff_eq!(v[0], 1.25, epsilon = 1e-12);
        // off: 0 + 0.5 + 0
        assert_abs_diff_eq!(v[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_steps_is_zero() {
        let v = discounted_value(&swap_chain(), Horizon::Steps(0), 0.9).unwrap();
        assert_eq!(v, vec![0.0, 0.0]);
    }

    #[test]
    fn undiscounted_unbounded_diverges() {
        assert!(matches!(
            discounted_value(&swap_chain(), Horizon::Unbounded, 1.0),
            Err(ExactError::DivergedModel { .. })
        ));
    }

    #[test]
    fn gamma_out_of_range() {
        for g in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                discounted_value(&swap_chain(), Horizon::Unbounded, g),
                Err(ExactError::InvalidParameter { .. })
            ));
        }
    }
}
