//! Sample-path simulation.

use rand::Rng;
use tracing::trace;

use crate::error::ModelError;
use crate::model::Model;
use crate::policy::Policy;

/// One simulated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Action taken from the current state.
    pub action: usize,
    /// State reached.
    pub next: usize,
}

/// A simulated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedPath {
    /// Visited states, starting state first; `n_steps + 1` entries.
    pub states: Vec<usize>,
    /// Action of the last step, `None` for a zero-step run.
    pub last_action: Option<usize>,
}

impl SimulatedPath {
    /// Returns `true` if `state` occurs anywhere in the path.
    pub fn visits(&self, state: usize) -> bool {
        self.states.contains(&state)
    }

    /// Final state of the run.
    pub fn last_state(&self) -> usize {
        // A path always holds at least its starting state.
        self.states[self.states.len() - 1]
    }
}

/// Performs one transition from the last state of `path`.
///
/// When the current state enables a single action it is taken without
/// consulting `policy`; otherwise the policy's choice must be enabled. The
/// successor is drawn from the chosen row's categorical distribution.
///
/// # Errors
///
/// [`ModelError::EmptyPath`], [`ModelError::InvalidState`] for an
/// out-of-range current state, [`ModelError::InvalidPolicyChoice`].
pub fn step<R, P>(
    model: &Model,
    path: &[usize],
    policy: &mut P,
    rng: &mut R,
) -> Result<Step, ModelError>
where
    R: Rng,
    P: Policy<R> + ?Sized,
{
    let current = *path.last().ok_or(ModelError::EmptyPath)?;
    model.check_state(current)?;

    let enabled = model.enabled_actions(current);
    let action = if enabled.len() == 1 {
        enabled[0]
    } else {
        let chosen = policy.choose(path, model, rng);
        if !enabled.contains(&chosen) {
            return Err(ModelError::InvalidPolicyChoice {
                state: model.state_label(current).to_string(),
                action: chosen,
            });
        }
        chosen
    };

    let next = sample_target(model, current, action, rng);
    Ok(Step { action, next })
}

/// Simulates `n_steps` transitions starting at `start` (or the model's
/// initial state).
///
/// # Errors
///
/// [`ModelError::InvalidState`] if `start` is out of range, plus any error
/// from [`step`].
pub fn simulate<R, P>(
    model: &Model,
    n_steps: usize,
    policy: &mut P,
    start: Option<usize>,
    rng: &mut R,
) -> Result<SimulatedPath, ModelError>
where
    R: Rng,
    P: Policy<R> + ?Sized,
{
    let start = start.unwrap_or(model.initial_state());
    model.check_state(start)?;

    let mut states = Vec::with_capacity(n_steps + 1);
    states.push(start);
    let mut last_action = None;
    for _ in 0..n_steps {
        let Step { action, next } = step(model, &states, policy, rng)?;
        trace!(
            from = model.state_label(states[states.len() - 1]),
            action,
            to = model.state_label(next),
            "step"
        );
        states.push(next);
        last_action = Some(action);
    }
    Ok(SimulatedPath {
        states,
        last_action,
    })
}

/// Draws a successor from `row(source, action)` by walking the cumulative
/// distribution. Falls back to the last target with positive mass when
/// rounding leaves the draw above the final cumulative value.
fn sample_target<R: Rng>(model: &Model, source: usize, action: usize, rng: &mut R) -> usize {
    let u: f64 = rng.random();
    let row = model.row(source, action);
    let mut cumulative = 0.0;
    let mut last_positive = source;
    for (t, &p) in row.iter().enumerate() {
        if p > 0.0 {
            cumulative += p;
            last_positive = t;
            if cumulative >= u {
                return t;
            }
        }
    }
    last_positive
}
