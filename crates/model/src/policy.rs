//! Action-selection policies used during simulation.

use rand::Rng;

use crate::error::ModelError;
use crate::model::Model;

/// Chooses an action for the last state of a path.
///
/// The simulator only consults a policy when the current state enables more
/// than one action, and rejects choices outside
/// [`Model::enabled_actions`]. Any closure
/// `FnMut(&[usize], &Model, &mut R) -> usize` is a policy.
pub trait Policy<R: Rng> {
    /// Returns the action to take from `path.last()`.
    fn choose(&mut self, path: &[usize], model: &Model, rng: &mut R) -> usize;
}

impl<R, F> Policy<R> for F
where
    R: Rng,
    F: FnMut(&[usize], &Model, &mut R) -> usize,
{
    fn choose(&mut self, path: &[usize], model: &Model, rng: &mut R) -> usize {
        self(path, model, rng)
    }
}

/// Picks uniformly among the enabled actions of the current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandom;

impl<R: Rng> Policy<R> for UniformRandom {
    fn choose(&mut self, path: &[usize], model: &Model, rng: &mut R) -> usize {
        let current = path.last().copied().unwrap_or(model.initial_state());
        let enabled = model.enabled_actions(current);
        enabled[rng.random_range(0..enabled.len())]
    }
}

/// Memoryless policy assigning one action to every state.
///
/// Typically the greedy policy returned by an optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPolicy {
    actions: Vec<usize>,
}

impl FixedPolicy {
    /// Creates a policy from one action index per state.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidState`] if `actions` does not cover exactly the
    /// model's states, [`ModelError::InvalidPolicyChoice`] if an action is not
    /// enabled in its state.
    pub fn new(model: &Model, actions: Vec<usize>) -> Result<Self, ModelError> {
        if actions.len() != model.n_states() {
            return Err(ModelError::InvalidState {
                index: actions.len(),
                n_states: model.n_states(),
            });
        }
        for (s, &a) in actions.iter().enumerate() {
            if !model.enabled_actions(s).contains(&a) {
                return Err(ModelError::InvalidPolicyChoice {
                    state: model.state_label(s).to_string(),
                    action: a,
                });
            }
        }
        Ok(Self { actions })
    }

    /// Action assigned to `state`.
    pub fn action(&self, state: usize) -> usize {
        self.actions[state]
    }

    /// All assignments in state order.
    pub fn actions(&self) -> &[usize] {
        &self.actions
    }
}

impl<R: Rng> Policy<R> for FixedPolicy {
    fn choose(&mut self, path: &[usize], model: &Model, _rng: &mut R) -> usize {
        let current = path.last().copied().unwrap_or(model.initial_state());
        self.actions[current]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_action_model() -> Model {
        let mut b = ModelBuilder::new();
        b.add_state("S0", 0.0).unwrap();
        b.add_state("S1", 0.0).unwrap();
        b.add_actions(&["a", "b"]).unwrap();
        b.update_weight("S0", "S1", Some("a"), 1.0).unwrap();
        b.update_weight("S0", "S0", Some("b"), 1.0).unwrap();
        b.update_weight("S1", "S1", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn uniform_random_stays_enabled_and_covers_both() {
        let m = two_action_model();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0usize; 3];
        for _ in 0..200 {
            seen[UniformRandom.choose(&[0], &m, &mut rng)] += 1;
        }
        assert_eq!(seen[0], 0);
        assert!(seen[1] > 50 && seen[2] > 50, "counts: {seen:?}");
    }

    #[test]
    fn closure_is_a_policy() {
        let m = two_action_model();
        let mut rng = StdRng::seed_from_u64(1);
        let mut always_b = |_: &[usize], model: &Model, _: &mut StdRng| {
            model.action_index("b").unwrap()
        };
        assert_eq!(always_b.choose(&[0], &m, &mut rng), 2);
    }

    #[test]
    fn fixed_policy_validates() {
        let m = two_action_model();
        assert!(FixedPolicy::new(&m, vec![1, 0]).is_ok());
        assert!(matches!(
            FixedPolicy::new(&m, vec![0, 0]),
            Err(ModelError::InvalidPolicyChoice { action: 0, .. })
        ));
        assert!(matches!(
            FixedPolicy::new(&m, vec![1]),
            Err(ModelError::InvalidState { .. })
        ));
    }
}
