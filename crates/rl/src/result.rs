//! Output types for policy synthesis.

use mdpcheck_model::{FixedPolicy, Model, ModelError};
use ndarray::Array2;

/// Result of [`value_iteration`](crate::value_iteration).
#[derive(Debug, Clone)]
pub struct ValueIterationResult {
    values: Vec<f64>,
    policy: Vec<usize>,
    iterations: usize,
    converged: bool,
}

impl ValueIterationResult {
    pub(crate) fn new(
        values: Vec<f64>,
        policy: Vec<usize>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            values,
            policy,
            iterations,
            converged,
        }
    }

    /// Last computed value vector, one entry per state.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Greedy action index per state.
    pub fn policy(&self) -> &[usize] {
        &self.policy
    }

    /// Number of Bellman sweeps performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `true` if the last sweep moved the values by less than epsilon.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// `(state, action)` label pairs; `None` stands for the no-action
    /// sentinel.
    pub fn policy_labels<'m>(&self, model: &'m Model) -> Vec<(&'m str, Option<&'m str>)> {
        label_pairs(model, &self.policy)
    }

    /// The greedy policy as a simulation policy.
    pub fn to_policy(&self, model: &Model) -> Result<FixedPolicy, ModelError> {
        FixedPolicy::new(model, self.policy.clone())
    }
}

/// Result of [`q_learning`](crate::q_learning).
#[derive(Debug, Clone)]
pub struct QLearningResult {
    q: Array2<f64>,
    visits: Array2<usize>,
    policy: Vec<usize>,
}

impl QLearningResult {
    pub(crate) fn new(q: Array2<f64>, visits: Array2<usize>, policy: Vec<usize>) -> Self {
        Self { q, visits, policy }
    }

    /// The `[state][action]` Q-table. Entries of disabled pairs stay 0.
    pub fn q(&self) -> &Array2<f64> {
        &self.q
    }

    /// Number of updates applied to each `[state][action]` pair.
    pub fn visits(&self) -> &Array2<usize> {
        &self.visits
    }

    /// Greedy action index per state.
    pub fn policy(&self) -> &[usize] {
        &self.policy
    }

    /// `(state, action)` label pairs; `None` stands for the no-action
    /// sentinel.
    pub fn policy_labels<'m>(&self, model: &'m Model) -> Vec<(&'m str, Option<&'m str>)> {
        label_pairs(model, &self.policy)
    }

    /// The greedy policy as a simulation policy.
    pub fn to_policy(&self, model: &Model) -> Result<FixedPolicy, ModelError> {
        FixedPolicy::new(model, self.policy.clone())
    }
}

fn label_pairs<'m>(model: &'m Model, policy: &[usize]) -> Vec<(&'m str, Option<&'m str>)> {
    policy
        .iter()
        .enumerate()
        .map(|(s, &a)| (model.state_label(s), model.action_label(a)))
        .collect()
}

/// Enabled action of `state` maximizing `score`; the lowest index wins ties.
pub(crate) fn greedy_action(model: &Model, state: usize, score: impl Fn(usize) -> f64) -> usize {
    let enabled = model.enabled_actions(state);
    let mut best = enabled[0];
    let mut best_score = score(best);
    for &a in &enabled[1..] {
        let s = score(a);
        if s > best_score {
            best = a;
            best_score = s;
        }
    }
    best
}
