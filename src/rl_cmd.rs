//! Policy synthesis: value iteration and Q-learning.

use std::io::Write;

use anyhow::{Context, Result};
use mdpcheck_rl::{q_learning, value_iteration};
use tracing::{info, info_span, warn};

use crate::cli::{QLearningArgs, ValueIterationArgs};
use crate::common;
use crate::config::MdpcheckConfig;
use crate::convert;

pub fn value_iter(
    args: ValueIterationArgs,
    config: &MdpcheckConfig,
    out: &mut impl Write,
) -> Result<()> {
    let _cmd = info_span!("value-iteration").entered();
    let mut toml = config.value_iteration.clone();
    if let Some(v) = args.gamma {
        toml.gamma = v;
    }
    if let Some(v) = args.epsilon {
        toml.epsilon = v;
    }
    if let Some(v) = args.max_iters {
        toml.max_iters = v;
    }
    let cfg = convert::build_value_iteration_config(&toml)?;
    let model = common::open_model(&args.model, config)?;

    let result = value_iteration(&model, &cfg).context("value iteration failed")?;
    info!(
        iterations = result.iterations(),
        converged = result.converged(),
        "value iteration computed"
    );

    writeln!(
        out,
        "Values after {} iterations{}:",
        result.iterations(),
        if result.converged() { "" } else { " (not converged)" }
    )?;
    common::write_state_values(out, &model, result.values())?;
    writeln!(out, "Policy:")?;
    common::write_policy(out, &result.policy_labels(&model))
}

pub fn q_learn(args: QLearningArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("q-learning").entered();
    let mut toml = config.q_learning.clone();
    if let Some(v) = args.gamma {
        toml.gamma = v;
    }
    if let Some(v) = args.max_iters {
        toml.max_iters = v;
    }
    let cfg = convert::build_q_learning_config(&toml)?;
    let model = common::open_model(&args.model, config)?;
    let mut rng = common::make_rng(args.seed, config);

    let result = q_learning(&model, &cfg, &mut rng).context("Q-learning failed")?;
    let unvisited = (0..model.n_states())
        .flat_map(|s| model.enabled_actions(s).iter().map(move |&a| (s, a)))
        .filter(|&(s, a)| result.visits()[[s, a]] == 0)
        .count();
    if unvisited > 0 {
        warn!(unvisited, "some enabled state-action pairs were never updated");
    }
    info!(updates = cfg.max_iters(), "Q-learning computed");

    writeln!(out, "Q-values:")?;
    for s in 0..model.n_states() {
        let entries: Vec<String> = model
            .enabled_actions(s)
            .iter()
            .map(|&a| {
                format!(
                    "{}={:.6}",
                    model.action_label(a).unwrap_or("-"),
                    result.q()[[s, a]]
                )
            })
            .collect();
        writeln!(out, "{}  {}", model.state_label(s), entries.join(", "))?;
    }
    writeln!(out, "Policy:")?;
    common::write_policy(out, &result.policy_labels(&model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModelArgs;
    use crate::common::write_model;

    const CHOICE: &str = "\
States hub, gold:1, dump;
Actions left, right;
hub [left] -> 1 : gold;
hub [right] -> 1 : dump;
gold -> 1 : hub;
dump -> 1 : hub;
";

    fn model_args(file: &tempfile::NamedTempFile) -> ModelArgs {
        ModelArgs {
            model: file.path().to_path_buf(),
            initial: None,
            reject_deadlocks: false,
        }
    }

    #[test]
    fn value_iteration_prints_policy() {
        let file = write_model(CHOICE);
        let args = ValueIterationArgs {
            model: model_args(&file),
            gamma: Some(0.5),
            epsilon: None,
            max_iters: None,
        };
        let mut out = Vec::new();
        value_iter(args, &MdpcheckConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Values after "));
        assert!(!text.contains("not converged"));
        assert!(text.ends_with("Policy:\nhub   -> left\ngold  -> -\ndump  -> -\n"));
    }

    #[test]
    fn value_iteration_flags_cap() {
        let file = write_model(CHOICE);
        let args = ValueIterationArgs {
            model: model_args(&file),
            gamma: None,
            epsilon: None,
            max_iters: Some(2),
        };
        let mut out = Vec::new();
        value_iter(args, &MdpcheckConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Values after 2 iterations (not converged):\n"));
    }

    #[test]
    fn q_learning_prints_table() {
        let file = write_model(CHOICE);
        let args = QLearningArgs {
            model: model_args(&file),
            gamma: Some(0.5),
            max_iters: Some(5000),
            seed: Some(11),
        };
        let mut out = Vec::new();
        q_learn(args, &MdpcheckConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Q-values:\nhub  left="));
        assert!(text.contains("gold  -="));
        assert!(text.ends_with("hub   -> left\ngold  -> -\ndump  -> -\n"));
    }
}
