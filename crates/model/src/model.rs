//! The built, read-only probabilistic model.

use std::collections::HashMap;
use std::fmt;

use ndarray::{Array2, Array3, ArrayView1, Axis, s};

use crate::builder::NO_ACTION_LABEL;
use crate::error::ModelError;

/// Index of the no-action sentinel used by Markov-chain edges.
pub const NO_ACTION: usize = 0;

/// A validated Markov chain or Markov decision process.
///
/// Produced by [`ModelBuilder::build`](crate::ModelBuilder::build). The
/// probability tensor is indexed `[source][action][target]`; every
/// `(source, action)` row either sums to 1 or is all zero. Each state enables
/// either exactly [`NO_ACTION`] or a nonempty set of declared actions.
#[derive(Debug, Clone)]
pub struct Model {
    states: Vec<String>,
    state_ids: HashMap<String, usize>,
    actions: Vec<Option<String>>,
    action_ids: HashMap<String, usize>,
    rewards: Vec<f64>,
    probabilities: Array3<f64>,
    enabled: Vec<Vec<usize>>,
    initial_state: usize,
}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        states: Vec<String>,
        state_ids: HashMap<String, usize>,
        actions: Vec<Option<String>>,
        action_ids: HashMap<String, usize>,
        rewards: Vec<f64>,
        probabilities: Array3<f64>,
        enabled: Vec<Vec<usize>>,
        initial_state: usize,
    ) -> Self {
        Self {
            states,
            state_ids,
            actions,
            action_ids,
            rewards,
            probabilities,
            enabled,
            initial_state,
        }
    }

    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// Number of actions, including the no-action sentinel.
    pub fn n_actions(&self) -> usize {
        self.actions.len()
    }

    /// State labels in index order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Label of state `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_states()`.
    pub fn state_label(&self, index: usize) -> &str {
        &self.states[index]
    }

    /// Index of the state labelled `label`.
    pub fn state_index(&self, label: &str) -> Result<usize, ModelError> {
        self.state_ids
            .get(label)
            .copied()
            .ok_or_else(|| ModelError::UnknownState {
                label: label.to_string(),
            })
    }

    /// Index of the declared action labelled `label`.
    pub fn action_index(&self, label: &str) -> Result<usize, ModelError> {
        self.action_ids
            .get(label)
            .copied()
            .ok_or_else(|| ModelError::UnknownAction {
                label: label.to_string(),
            })
    }

    /// Label of action `index`, or `None` for [`NO_ACTION`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_actions()`.
    pub fn action_label(&self, index: usize) -> Option<&str> {
        self.actions[index].as_deref()
    }

    /// Per-state rewards in index order.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Reward of state `index`.
    pub fn reward(&self, index: usize) -> f64 {
        self.rewards[index]
    }

    /// The full `[source][action][target]` probability tensor.
    pub fn probabilities(&self) -> &Array3<f64> {
        &self.probabilities
    }

    /// Distribution over targets for `(source, action)`.
    pub fn row(&self, source: usize, action: usize) -> ArrayView1<'_, f64> {
        self.probabilities.slice(s![source, action, ..])
    }

    /// Probability of `source -[action]-> target`.
    pub fn prob(&self, source: usize, action: usize, target: usize) -> f64 {
        self.probabilities[[source, action, target]]
    }

    /// Actions with positive mass from `state`, in increasing index order.
    pub fn enabled_actions(&self, state: usize) -> &[usize] {
        &self.enabled[state]
    }

    /// Index of the initial state.
    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    /// Returns `true` if no action is declared and every state enables only
    /// [`NO_ACTION`].
    pub fn is_markov_chain(&self) -> bool {
        self.actions.len() == 1 && self.enabled.iter().all(|acts| acts == &[NO_ACTION])
    }

    /// The `[source][target]` matrix of the no-action slice.
    ///
    /// Only meaningful for Markov chains; rows of states that use declared
    /// actions are zero.
    pub fn chain_matrix(&self) -> Array2<f64> {
        self.probabilities.index_axis(Axis(1), NO_ACTION).to_owned()
    }

    /// Checks that `index` names a state.
    pub fn check_state(&self, index: usize) -> Result<(), ModelError> {
        if index < self.n_states() {
            Ok(())
        } else {
            Err(ModelError::InvalidState {
                index,
                n_states: self.n_states(),
            })
        }
    }

    fn action_display(&self, index: usize) -> &str {
        self.action_label(index).unwrap_or(NO_ACTION_LABEL)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_rewards = self.rewards.iter().any(|&r| r != 0.0);
        let states: Vec<String> = self
            .states
            .iter()
            .zip(&self.rewards)
            .map(|(label, r)| {
                if with_rewards {
                    format!("{label} ({r})")
                } else {
                    label.clone()
                }
            })
            .collect();
        writeln!(f, "States: {}", states.join(", "))?;

        let declared: Vec<&str> = self.actions.iter().flatten().map(String::as_str).collect();
        writeln!(f, "Actions: {}", declared.join(", "))?;

        for (s, label) in self.states.iter().enumerate() {
            for &a in &self.enabled[s] {
                let branches: Vec<String> = self
                    .row(s, a)
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| **p > 0.0)
                    .map(|(t, p)| format!("{}: {p}", self.states[t]))
                    .collect();
                if a == NO_ACTION {
                    writeln!(f, "{label} -> {}", branches.join(", "))?;
                } else {
                    writeln!(
                        f,
                        "{label} [{}] -> {}",
                        self.action_display(a),
                        branches.join(", ")
                    )?;
                }
            }
        }
        write!(f, "Initial state: {}", self.states[self.initial_state])
    }
}
