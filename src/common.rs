//! Helpers shared by the subcommands.

use std::io::Write;

use anyhow::Result;
use mdpcheck_model::{DeadlockPolicy, Model};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::ModelArgs;
use crate::config::MdpcheckConfig;
use crate::convert;
use crate::reader;

/// Loads the model named on the command line, with CLI flags overriding the
/// `[build]` section.
pub fn open_model(args: &ModelArgs, config: &MdpcheckConfig) -> Result<Model> {
    let mut build = convert::build_build_config(&config.build)?;
    if args.reject_deadlocks {
        build = build.with_deadlock(DeadlockPolicy::Reject);
    }
    let initial = args.initial.as_deref().or(config.build.initial.as_deref());
    info!(path = %args.model.display(), "reading model");
    let model = reader::load_model(&args.model, build, initial)?;
    info!(
        n_states = model.n_states(),
        markov_chain = model.is_markov_chain(),
        initial = model.state_label(model.initial_state()),
        "model built"
    );
    Ok(model)
}

/// Seeded RNG: CLI seed, else config seed, else OS entropy.
pub fn make_rng(cli_seed: Option<u64>, config: &MdpcheckConfig) -> StdRng {
    match cli_seed.or(config.seed) {
        Some(s) => {
            info!(seed = s, "seeded RNG");
            StdRng::seed_from_u64(s)
        }
        None => StdRng::from_os_rng(),
    }
}

/// Writes one `label: value` line per state.
pub fn write_state_values(out: &mut impl Write, model: &Model, values: &[f64]) -> Result<()> {
    let width = model.states().iter().map(String::len).max().unwrap_or(0);
    for (label, v) in model.states().iter().zip(values) {
        writeln!(out, "{label:<width$}  {v:.6}")?;
    }
    Ok(())
}

/// Writes one `state -> action` line per state; `-` marks the no-action
/// sentinel.
pub fn write_policy(out: &mut impl Write, pairs: &[(&str, Option<&str>)]) -> Result<()> {
    let width = pairs.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    for (state, action) in pairs {
        writeln!(out, "{state:<width$}  -> {}", action.unwrap_or("-"))?;
    }
    Ok(())
}

/// Writes `text` to a temporary model file.
#[cfg(test)]
pub fn write_model(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdpcheck_model::ModelBuilder;

    fn two() -> Model {
        let mut b = ModelBuilder::new();
        b.add_state("a", 0.0).unwrap();
        b.add_state("long", 0.0).unwrap();
        b.update_weight("a", "long", None, 1.0).unwrap();
        b.update_weight("long", "a", None, 1.0).unwrap();
        b.build(None).unwrap()
    }

    #[test]
    fn state_values_are_aligned() {
        let mut out = Vec::new();
        write_state_values(&mut out, &two(), &[0.5, 1.0 / 3.0]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a     0.500000\nlong  0.333333\n"
        );
    }

    #[test]
    fn policy_lines() {
        let mut out = Vec::new();
        write_policy(&mut out, &[("s0", Some("go")), ("end", None)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "s0   -> go\nend  -> -\n");
    }

    #[test]
    fn cli_seed_wins() {
        use rand::Rng;
        let config = MdpcheckConfig {
            seed: Some(1),
            ..MdpcheckConfig::default()
        };
        let a: u64 = make_rng(Some(5), &config).random();
        let b: u64 = StdRng::seed_from_u64(5).random();
        assert_eq!(a, b);
        let c: u64 = make_rng(None, &config).random();
        let d: u64 = StdRng::seed_from_u64(1).random();
        assert_eq!(c, d);
    }
}
