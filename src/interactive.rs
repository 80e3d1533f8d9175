//! A policy that asks the user which action to take.

use std::io::{BufRead, Write};

use mdpcheck_model::{Model, Policy};
use rand::Rng;
use tracing::warn;

/// Prompts on `output` and reads an action label from `input` whenever the
/// current state enables more than one action.
///
/// If input ends or fails the first enabled action is taken.
pub struct Interactive<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Interactive<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, path: &[usize], model: &Model, enabled: &[usize]) -> Option<usize> {
        let current = *path.last()?;
        let labels: Vec<&str> = enabled
            .iter()
            .map(|&a| model.action_label(a).unwrap_or("-"))
            .collect();
        loop {
            write!(
                self.output,
                "step {} in {}: choose one of [{}]: ",
                path.len() - 1,
                model.state_label(current),
                labels.join(", ")
            )
            .ok()?;
            self.output.flush().ok()?;

            let mut line = String::new();
            if self.input.read_line(&mut line).ok()? == 0 {
                return None;
            }
            let answer = line.trim();
            if let Some(i) = labels.iter().position(|l| *l == answer) {
                return Some(enabled[i]);
            }
            writeln!(self.output, "{answer:?} is not enabled here").ok()?;
        }
    }
}

impl<R: Rng, I: BufRead, O: Write> Policy<R> for Interactive<I, O> {
    fn choose(&mut self, path: &[usize], model: &Model, _rng: &mut R) -> usize {
        let current = path.last().copied().unwrap_or(model.initial_state());
        let enabled = model.enabled_actions(current);
        match self.ask(path, model, enabled) {
            Some(a) => a,
            None => {
                warn!(
                    state = model.state_label(current),
                    "no answer on input, taking the first enabled action"
                );
                enabled[0]
            }
        }
    }
}
