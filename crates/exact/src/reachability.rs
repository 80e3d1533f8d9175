//! Exact reachability probabilities for Markov chains.

use mdpcheck_model::Model;
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::ExactError;
use crate::horizon::Horizon;
use crate::linalg;

/// Classification of a state with respect to reaching the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateClass {
    /// Cannot reach the target.
    Zero,
    /// Reaches the target with probability 1.
    One,
    /// Decided by the linear system.
    Unknown,
}

/// Probability that a run from the initial state visits `target` within
/// `horizon`.
///
/// # Errors
///
/// [`ExactError::NotAMarkovChain`] if any state enables a declared action,
/// [`ExactError::Model`] for an unknown target label,
/// [`ExactError::SingularSystem`] if the unbounded system cannot be solved.
///
/// # Example
///
/// ```
/// use mdpcheck_exact::{Horizon, reachability};
/// use mdpcheck_model::ModelBuilder;
///
/// let mut b = ModelBuilder::new();
/// for s in ["A", "B", "C"] {
///     b.add_state(s, 0.0)?;
/// }
/// b.update_weight("A", "B", None, 1.0)?;
/// b.update_weight("B", "C", None, 1.0)?;
/// b.update_weight("C", "C", None, 1.0)?;
/// let model = b.build(None)?;
///
/// assert_eq!(reachability(&model, "C", Horizon::Unbounded)?, 1.0);
/// assert_eq!(reachability(&model, "C", Horizon::Steps(1))?, 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn reachability(model: &Model, target: &str, horizon: Horizon) -> Result<f64, ExactError> {
    let probs = reachability_vector(model, target, horizon)?;
    Ok(probs[model.initial_state()])
}

/// Reachability probability of `target` from every state, in state order.
///
/// States are split into those reaching the target surely (`S1`), those that
/// cannot reach it (`S0`) and the rest. For an unbounded horizon the rest is
/// solved from `y = A·y + b`, where `A` is the transition matrix restricted
/// to undecided states and `b` their one-step mass into `S1`. For a bounded
/// horizon `S1` is just the target, `S0` is empty, and `y ← A·y + b` is
/// unrolled `n` times from zero.
///
/// # Errors
///
/// See [`reachability`].
pub fn reachability_vector(
    model: &Model,
    target: &str,
    horizon: Horizon,
) -> Result<Vec<f64>, ExactError> {
    if !model.is_markov_chain() {
        return Err(ExactError::NotAMarkovChain);
    }
    let target = model.state_index(target)?;
    let p = model.chain_matrix();
    let n = model.n_states();

    let classes = classify(&p, target, horizon);
    let unknown: Vec<usize> = (0..n)
        .filter(|&s| classes[s] == StateClass::Unknown)
        .collect();
    let k = unknown.len();

    let a = Array2::from_shape_fn((k, k), |(i, j)| p[[unknown[i], unknown[j]]]);
    let b = Array1::from_shape_fn(k, |i| {
        (0..n)
            .filter(|&t| classes[t] == StateClass::One)
            .map(|t| p[[unknown[i], t]])
            .sum::<f64>()
    });

    let y = match horizon {
        Horizon::Unbounded => linalg::solve(linalg::identity_minus(&a, 1.0), b)
            .ok_or(ExactError::SingularSystem { n_unknown: k })?,
        Horizon::Steps(steps) => {
            let mut y = Array1::<f64>::zeros(k);
            for _ in 0..steps {
                y = a.dot(&y) + &b;
            }
            y
        }
    };

    debug!(
        target = model.state_label(target),
        %horizon,
        n_one = classes.iter().filter(|c| **c == StateClass::One).count(),
        n_zero = classes.iter().filter(|c| **c == StateClass::Zero).count(),
        n_unknown = k,
        "reachability system solved"
    );

    let mut out = vec![0.0; n];
    let mut next_unknown = 0;
    for (s, class) in classes.iter().enumerate() {
        out[s] = match class {
            StateClass::One => 1.0,
            StateClass::Zero => 0.0,
            StateClass::Unknown => {
                let v = y[next_unknown].clamp(0.0, 1.0);
                next_unknown += 1;
                v
            }
        };
    }
    Ok(out)
}

/// Splits states into `S1`, `S0` and undecided for the chain matrix `p`.
pub(crate) fn classify(p: &Array2<f64>, target: usize, horizon: Horizon) -> Vec<StateClass> {
    let n = p.nrows();
    let mut classes = vec![StateClass::Unknown; n];
    classes[target] = StateClass::One;
    if let Horizon::Steps(_) = horizon {
        return classes;
    }

    // S1: every state whose mass outside S1 is zero, to a fixed point.
    loop {
        let mut changed = false;
        for s in 0..n {
            if classes[s] == StateClass::Unknown
                && (0..n).all(|t| classes[t] == StateClass::One || p[[s, t]] == 0.0)
            {
                classes[s] = StateClass::One;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // S0: no positive-probability path into S1.
    let mut reaches: Vec<bool> = classes.iter().map(|c| *c == StateClass::One).collect();
    loop {
        let mut changed = false;
        for s in 0..n {
            if !reaches[s] && (0..n).any(|t| reaches[t] && p[[s, t]] > 0.0) {
                reaches[s] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    for (class, reached) in classes.iter_mut().zip(reaches) {
        if !reached {
            *class = StateClass::Zero;
        }
    }
    classes
}
