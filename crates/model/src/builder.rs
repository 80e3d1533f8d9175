//! Incremental model construction and the build/validation step.

use std::collections::{BTreeMap, HashMap};

use ndarray::{Array3, Axis};
use tracing::{debug, warn};

use crate::config::{BuildConfig, DeadlockPolicy};
use crate::declare::DeclarationSink;
use crate::error::ModelError;
use crate::model::{Model, NO_ACTION};

/// Label shown for the no-action sentinel in messages.
pub(crate) const NO_ACTION_LABEL: &str = "-";

/// Mutable, unvalidated model under construction.
///
/// States and actions are registered once each, then raw transition weights
/// are registered once per `(source, action, target)` triple. [`build`]
/// consumes the builder and returns the read-only [`Model`].
///
/// [`build`]: ModelBuilder::build
///
/// # Example
///
/// ```
/// use mdpcheck_model::ModelBuilder;
///
/// let mut builder = ModelBuilder::new();
/// builder.add_state("A", 0.0)?;
/// builder.add_state("B", 1.0)?;
/// builder.update_weight("A", "B", None, 3.0)?;
/// builder.update_weight("B", "B", None, 1.0)?;
/// let model = builder.build(None)?;
/// assert_eq!(model.prob(0, 0, 1), 1.0);
/// # Ok::<(), mdpcheck_model::ModelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    states: Vec<String>,
    state_ids: HashMap<String, usize>,
    rewards: Vec<f64>,
    actions: Vec<String>,
    action_ids: HashMap<String, usize>,
    // (source, action, target) -> raw weight; action 0 is the no-action sentinel.
    weights: BTreeMap<(usize, usize, usize), f64>,
    config: BuildConfig,
}

impl ModelBuilder {
    /// Creates an empty builder with the default [`BuildConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the build configuration.
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of states declared so far.
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// Number of actions declared so far, excluding the no-action sentinel.
    pub fn n_declared_actions(&self) -> usize {
        self.actions.len()
    }

    /// Declares a state with its reward and returns its index.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateState`] if `label` already exists,
    /// [`ModelError::InvalidReward`] if `reward` is not finite.
    pub fn add_state(&mut self, label: &str, reward: f64) -> Result<usize, ModelError> {
        if self.state_ids.contains_key(label) {
            return Err(ModelError::DuplicateState {
                label: label.to_string(),
            });
        }
        if !reward.is_finite() {
            return Err(ModelError::InvalidReward {
                label: label.to_string(),
                reward,
            });
        }
        let id = self.states.len();
        self.states.push(label.to_string());
        self.state_ids.insert(label.to_string(), id);
        self.rewards.push(reward);
        Ok(id)
    }

    /// Declares a block of actions.
    ///
    /// Action indices start at 1; index 0 is reserved for the no-action
    /// sentinel. The whole block is checked before any label is added.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateAction`] if a label is already declared or
    /// repeated within `labels`.
    pub fn add_actions<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<(), ModelError> {
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let repeated = labels[..i].iter().any(|l| l.as_ref() == label);
            if repeated || self.action_ids.contains_key(label) {
                return Err(ModelError::DuplicateAction {
                    label: label.to_string(),
                });
            }
        }
        for label in labels {
            let label = label.as_ref();
            self.actions.push(label.to_string());
            self.action_ids.insert(label.to_string(), self.actions.len());
        }
        Ok(())
    }

    /// Registers the raw weight of the transition `source -[action]-> target`.
    ///
    /// `action = None` registers a Markov-chain edge. A triple may be set to a
    /// nonzero weight only once.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownState`] / [`ModelError::UnknownAction`] for
    /// undeclared labels, [`ModelError::InvalidWeight`] for negative or
    /// non-finite weights, [`ModelError::DuplicateTransition`] when the triple
    /// already holds a nonzero weight.
    pub fn update_weight(
        &mut self,
        source: &str,
        target: &str,
        action: Option<&str>,
        weight: f64,
    ) -> Result<(), ModelError> {
        let key = self.resolve_weight(source, target, action, weight)?;
        self.weights.insert(key, weight);
        Ok(())
    }

    /// Registers every `(weight, target)` branch out of `source`, or none of
    /// them if any branch is rejected.
    fn update_branches(
        &mut self,
        source: &str,
        action: Option<&str>,
        branches: &[(u64, &str)],
    ) -> Result<(), ModelError> {
        let mut staged: Vec<((usize, usize, usize), f64)> = Vec::with_capacity(branches.len());
        for &(weight, target) in branches {
            let weight = weight as f64;
            let key = self.resolve_weight(source, target, action, weight)?;
            if staged.iter().any(|&(k, w)| k == key && w != 0.0) {
                return Err(duplicate_transition(source, target, action));
            }
            staged.push((key, weight));
        }
        self.weights.extend(staged);
        Ok(())
    }

    /// Checks labels, weight and duplication of one triple without mutating.
    fn resolve_weight(
        &self,
        source: &str,
        target: &str,
        action: Option<&str>,
        weight: f64,
    ) -> Result<(usize, usize, usize), ModelError> {
        let s = self.lookup_state(source)?;
        let t = self.lookup_state(target)?;
        let a = match action {
            None => NO_ACTION,
            Some(label) => *self
                .action_ids
                .get(label)
                .ok_or_else(|| ModelError::UnknownAction {
                    label: label.to_string(),
                })?,
        };
        if !weight.is_finite() || weight < 0.0 {
            return Err(ModelError::InvalidWeight {
                from: source.to_string(),
                target: target.to_string(),
                weight,
            });
        }
        if self.weights.get(&(s, a, t)).is_some_and(|&w| w != 0.0) {
            return Err(duplicate_transition(source, target, action));
        }
        Ok((s, a, t))
    }

    /// Normalizes weights, validates action coherence and resolves the
    /// initial state, producing the read-only [`Model`].
    ///
    /// Every `(state, action)` row with positive mass is divided by its sum;
    /// rows without mass stay zero (action not enabled). A state must enable
    /// either exactly the no-action sentinel or only declared actions. States
    /// with nothing enabled are handled per [`DeadlockPolicy`]. The initial
    /// state is `initial` when given, else index 0.
    ///
    /// # Errors
    ///
    /// [`ModelError::EmptyModel`], [`ModelError::ActionCoherence`],
    /// [`ModelError::NoEnabledAction`] (with [`DeadlockPolicy::Reject`]),
    /// [`ModelError::UnknownState`] for an undeclared initial label.
    pub fn build(self, initial: Option<&str>) -> Result<Model, ModelError> {
        let n_states = self.states.len();
        if n_states == 0 {
            return Err(ModelError::EmptyModel);
        }
        let n_actions = self.actions.len() + 1;

        let mut probabilities = Array3::<f64>::zeros((n_states, n_actions, n_states));
        for (&(s, a, t), &w) in &self.weights {
            probabilities[[s, a, t]] = w;
        }

        // Normalize every (source, action) row that carries mass.
        for mut plane in probabilities.axis_iter_mut(Axis(0)) {
            for mut row in plane.axis_iter_mut(Axis(0)) {
                let total: f64 = row.sum();
                if total > 0.0 {
                    row.mapv_inplace(|w| w / total);
                }
            }
        }

        let mut enabled = Vec::with_capacity(n_states);
        let mut n_patched = 0usize;
        for s in 0..n_states {
            let mut actions: Vec<usize> = (0..n_actions)
                .filter(|&a| probabilities.slice(ndarray::s![s, a, ..]).sum() > 0.0)
                .collect();

            if actions.contains(&NO_ACTION) && actions.len() != 1 {
                return Err(ModelError::ActionCoherence {
                    state: self.states[s].clone(),
                });
            }
            if actions.is_empty() {
                match self.config.deadlock() {
                    DeadlockPolicy::Reject => {
                        return Err(ModelError::NoEnabledAction {
                            state: self.states[s].clone(),
                        });
                    }
                    DeadlockPolicy::SelfLoop => {
                        warn!(
                            state = %self.states[s],
                            "no outgoing transition: adding a self-loop"
                        );
                        probabilities[[s, NO_ACTION, s]] = 1.0;
                        actions.push(NO_ACTION);
                        n_patched += 1;
                    }
                }
            }
            enabled.push(actions);
        }

        let initial_state = match initial {
            None => 0,
            Some(label) => self.lookup_state(label)?,
        };

        debug!(
            n_states,
            n_actions,
            n_transitions = self.weights.len(),
            n_patched,
            "model built"
        );

        let actions = std::iter::once(None)
            .chain(self.actions.into_iter().map(Some))
            .collect();

        Ok(Model::from_parts(
            self.states,
            self.state_ids,
            actions,
            self.action_ids,
            self.rewards,
            probabilities,
            enabled,
            initial_state,
        ))
    }

    fn lookup_state(&self, label: &str) -> Result<usize, ModelError> {
        self.state_ids
            .get(label)
            .copied()
            .ok_or_else(|| ModelError::UnknownState {
                label: label.to_string(),
            })
    }
}

fn duplicate_transition(source: &str, target: &str, action: Option<&str>) -> ModelError {
    ModelError::DuplicateTransition {
        from: source.to_string(),
        action: action.unwrap_or(NO_ACTION_LABEL).to_string(),
        target: target.to_string(),
    }
}

impl DeclarationSink for ModelBuilder {
    type Error = ModelError;

    fn on_state_declared(&mut self, label: &str, reward: Option<i64>) -> Result<(), ModelError> {
        self.add_state(label, reward.unwrap_or(0) as f64).map(|_| ())
    }

    fn on_actions_declared(&mut self, labels: &[&str]) -> Result<(), ModelError> {
        self.add_actions(labels)
    }

    fn on_transition_with_action(
        &mut self,
        source: &str,
        action: &str,
        branches: &[(u64, &str)],
    ) -> Result<(), ModelError> {
        self.update_branches(source, Some(action), branches)
    }

    fn on_transition_no_action(
        &mut self,
        source: &str,
        branches: &[(u64, &str)],
    ) -> Result<(), ModelError> {
        self.update_branches(source, None, branches)
    }
}
