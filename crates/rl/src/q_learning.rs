//! Tabular Q-learning from simulated single steps.

use mdpcheck_model::{Model, UniformRandom, step};
use ndarray::Array2;
use rand::Rng;
use tracing::debug;

use crate::config::QLearningConfig;
use crate::error::RlError;
use crate::result::{QLearningResult, greedy_action};

/// Learns a Q-table by `max_iters` single-step updates.
///
/// Each update picks a uniformly random state `s`, takes one simulated step
/// under the uniform random policy to get `(a, s')`, and applies
/// `Q[s,a] += (reward[s] + gamma · max_a' Q[s',a'] − Q[s,a]) / k`, where `k`
/// is the number of updates `(s, a)` has received including this one. The
/// maximum ranges over actions enabled in `s'`.
///
/// # Errors
///
/// [`RlError::InvalidParameter`] from config validation.
pub fn q_learning<R: Rng>(
    model: &Model,
    config: &QLearningConfig,
    rng: &mut R,
) -> Result<QLearningResult, RlError> {
    config.validate()?;
    let n = model.n_states();
    let gamma = config.gamma();
    let mut q = Array2::<f64>::zeros((n, model.n_actions()));
    let mut visits = Array2::<usize>::zeros((n, model.n_actions()));

    for _ in 0..config.max_iters() {
        let s = rng.random_range(0..n);
        let taken = step(model, &[s], &mut UniformRandom, rng)?;
        let a = taken.action;
        let best_next = model
            .enabled_actions(taken.next)
            .iter()
            .map(|&b| q[[taken.next, b]])
            .fold(f64::NEG_INFINITY, f64::max);
        visits[[s, a]] += 1;
        let target = model.reward(s) + gamma * best_next;
        q[[s, a]] += (target - q[[s, a]]) / visits[[s, a]] as f64;
    }

    debug!(
        updates = config.max_iters(),
        gamma,
        unvisited = visits.iter().filter(|&&v| v == 0).count(),
        "Q-learning finished"
    );

    let policy = (0..n)
        .map(|s| greedy_action(model, s, |a| q[[s, a]]))
        .collect();
    Ok(QLearningResult::new(q, visits, policy))
}
