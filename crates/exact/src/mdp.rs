//! Maximal and minimal reachability probabilities for MDPs via linear
//! programming.

use mdpcheck_model::Model;
use tracing::debug;

use crate::error::ExactError;
use crate::simplex::{LinearProgram, Sense};

/// Maximal probability, over all schedulers, of reaching `target` from each
/// state.
///
/// With `x[target] = 1` substituted, the program minimizes `Σ x[s]` subject
/// to `x[s] ≥ Σ_t P[s,a,t]·x[t]` for every state `s ≠ target` and every
/// action `a` enabled in `s`, and `0 ≤ x[s] ≤ 1`. Its optimum is the least
/// fixed point of the Bellman operator, i.e. the maximal reachability
/// probabilities. The target's entry is exactly 1.
///
/// # Errors
///
/// [`ExactError::Model`] for an unknown target, [`ExactError::LpInfeasible`]
/// (or another LP error) when the solver finds no optimum.
pub fn max_reachability(model: &Model, target: &str) -> Result<Vec<f64>, ExactError> {
    let target = model.state_index(target)?;
    let n = model.n_states();

    let vars: Vec<usize> = (0..n).filter(|&s| s != target).collect();
    let col = column_map(n, &vars);

    let mut lp = LinearProgram::minimize(vec![1.0; vars.len()]);
    for (k, &s) in vars.iter().enumerate() {
        for &a in model.enabled_actions(s) {
            // x[s] - Σ_{t≠target} P[s,a,t]·x[t] ≥ P[s,a,target]
            let mut coeffs = vec![0.0; vars.len()];
            coeffs[k] += 1.0;
            for (t, &p) in model.row(s, a).iter().enumerate() {
                if let Some(c) = col[t] {
                    coeffs[c] -= p;
                }
            }
            lp.add(coeffs, Sense::Ge, model.prob(s, a, target));
        }
        lp.add(unit(vars.len(), k), Sense::Le, 1.0);
    }

    debug!(
        target = model.state_label(target),
        n_vars = vars.len(),
        n_constraints = lp.n_constraints(),
        "solving max-reachability program"
    );
    let x = lp.solve()?;
    Ok(assemble(n, target, &col, &x, &[]))
}

/// Minimal probability, over all schedulers, of reaching `target` from each
/// state.
///
/// States from which some scheduler avoids the target forever are found
/// first by graph analysis and fixed to 0. For the remaining states the
/// program maximizes `Σ x[s]` subject to `x[s] ≤ Σ_t P[s,a,t]·x[t]` for every
/// enabled action and `0 ≤ x[s] ≤ 1`.
///
/// # Errors
///
/// As for [`max_reachability`].
pub fn min_reachability(model: &Model, target: &str) -> Result<Vec<f64>, ExactError> {
    let target = model.state_index(target)?;
    let n = model.n_states();

    let forced = forced_positive(model, target);
    let zero: Vec<usize> = (0..n).filter(|&s| !forced[s]).collect();
    let vars: Vec<usize> = (0..n).filter(|&s| s != target && forced[s]).collect();
    let col = column_map(n, &vars);

    let mut lp = LinearProgram::minimize(vec![-1.0; vars.len()]);
    for (k, &s) in vars.iter().enumerate() {
        for &a in model.enabled_actions(s) {
            // x[s] - Σ_{t var} P[s,a,t]·x[t] ≤ P[s,a,target]
            let mut coeffs = vec![0.0; vars.len()];
            coeffs[k] += 1.0;
            for (t, &p) in model.row(s, a).iter().enumerate() {
                if let Some(c) = col[t] {
                    coeffs[c] -= p;
                }
            }
            lp.add(coeffs, Sense::Le, model.prob(s, a, target));
        }
        lp.add(unit(vars.len(), k), Sense::Le, 1.0);
    }

    debug!(
        target = model.state_label(target),
        n_vars = vars.len(),
        n_zero = zero.len(),
        n_constraints = lp.n_constraints(),
        "solving min-reachability program"
    );
    let x = lp.solve()?;
    Ok(assemble(n, target, &col, &x, &zero))
}

/// States that reach `target` with positive probability under every
/// scheduler (least fixed point: all enabled actions lead into the set).
fn forced_positive(model: &Model, target: usize) -> Vec<bool> {
    let n = model.n_states();
    let mut forced = vec![false; n];
    forced[target] = true;
    loop {
        let mut changed = false;
        for s in 0..n {
            if forced[s] {
                continue;
            }
            let all_actions_hit = model.enabled_actions(s).iter().all(|&a| {
                model
                    .row(s, a)
                    .iter()
                    .enumerate()
                    .any(|(t, &p)| p > 0.0 && forced[t])
            });
            if all_actions_hit {
                forced[s] = true;
                changed = true;
            }
        }
        if !changed {
            return forced;
        }
    }
}

fn column_map(n: usize, vars: &[usize]) -> Vec<Option<usize>> {
    let mut col = vec![None; n];
    for (k, &s) in vars.iter().enumerate() {
        col[s] = Some(k);
    }
    col
}

fn unit(len: usize, k: usize) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[k] = 1.0;
    v
}

fn assemble(n: usize, target: usize, col: &[Option<usize>], x: &[f64], zero: &[usize]) -> Vec<f64> {
    let mut out: Vec<f64> = (0..n)
        .map(|s| col[s].map_or(0.0, |c| x[c].clamp(0.0, 1.0)))
        .collect();
    for &s in zero {
        out[s] = 0.0;
    }
    out[target] = 1.0;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mdpcheck_model::ModelBuilder;

    /// `start` chooses between a 50% gamble and a detour that succeeds 90%.
    fn gamble() -> Model {
        let mut b = ModelBuilder::new();
        for s in ["start", "detour", "goal", "sink"] {
            b.add_state(s, 0.0).unwrap();
        }
        b.add_actions(&["risky", "safe"]).unwrap();
        b.update_weight("start", "goal", Some("risky"), 1.0).unwrap();
        b.update_weight("start", "sink", Some("risky"), 1.0).unwrap();
        b.update_weight("start", "detour", Some("safe"), 1.0).unwrap();
        b.update_weight("detour", "goal", None, 9.0).unwrap();
        b.update_weight("detour", "sink", None, 1.0).unwrap();
        b.update_weight("goal", "goal", None, 1.0).unwrap();
        b.update_weight("sink", "sink", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn max_picks_best_action() {
        let v = max_reachability(&gamble(), "goal").unwrap();
        assert_abs_diff_eq!(v[0], 0.9, epsilon = 1e-9);
        assert_abs_diff_eq!(v[1], 0.9, epsilon = 1e-9);
        assert_eq!(v[2], 1.0);
        assert_abs_diff_eq!(v[3], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn min_picks_worst_action() {
        let v = min_reachability(&gamble(), "goal").unwrap();
        assert_abs_diff_eq!(v[0], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(v[1], 0.9, epsilon = 1e-9);
        assert_eq!(v[2], 1.0);
        assert_eq!(v[3], 0.0);
    }

    #[test]
    fn stalling_action_gives_min_zero() {
        let mut b = ModelBuilder::new();
        b.add_state("s", 0.0).unwrap();
        b.add_state("goal", 0.0).unwrap();
        b.add_actions(&["wait", "go"]).unwrap();
        b.update_weight("s", "s", Some("wait"), 1.0).unwrap();
        b.update_weight("s", "goal", Some("go"), 1.0).unwrap();
        b.update_weight("goal", "goal", None, 1.0).unwrap();
        let m = b.build(None).unwrap();

        assert_abs_diff_eq!(max_reachability(&m, "goal").unwrap()[0], 1.0, epsilon = 1e-9);
        assert_eq!(min_reachability(&m, "goal").unwrap()[0], 0.0);
    }

    #[test]
    fn target_is_exactly_one() {
        let m = gamble();
        for label in m.states() {
            let s = m.state_index(label).unwrap();
            assert_eq!(max_reachability(&m, label).unwrap()[s], 1.0);
            assert_eq!(min_reachability(&m, label).unwrap()[s], 1.0);
        }
    }

    #[test]
    fn chain_matches_both_bounds() {
        let mut b = ModelBuilder::new();
        for s in ["a", "b", "c"] {
            b.add_state(s, 0.0).unwrap();
        }
        b.update_weight("a", "b", None, 1.0).unwrap();
        b.update_weight("a", "a", None, 1.0).unwrap();
        b.update_weight("b", "c", None, 1.0).unwrap();
        b.update_weight("b", "a", None, 3.0).unwrap();
        b.update_weight("c", "c", None, 1.0).unwrap();
        let m = b.build(None).unwrap();
        let hi = max_reachability(&m, "c").unwrap();
        let lo = min_reachability(&m, "c").unwrap();
        for s in 0..3 {
            assert_abs_diff_eq!(hi[s], 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(lo[s], 1.0, epsilon = 1e-9);
        }
    }
}
