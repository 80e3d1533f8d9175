//! Show command: print the normalized model.

use std::io::Write;

use anyhow::Result;
use tracing::info_span;

use crate::cli::ModelArgs;
use crate::common;
use crate::config::MdpcheckConfig;

pub fn run(args: ModelArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("show").entered();
    let model = common::open_model(&args, config)?;
    writeln!(out, "{model}")?;
    let kind = if model.is_markov_chain() {
        "Markov chain"
    } else {
        "Markov decision process"
    };
    writeln!(out, "Kind: {kind}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::write_model;

    fn model_args(file: &tempfile::NamedTempFile) -> ModelArgs {
        ModelArgs {
            model: file.path().to_path_buf(),
            initial: None,
            reject_deadlocks: false,
        }
    }

    #[test]
    fn chain_summary_ends_with_kind_line() {
        let file = write_model("States A, B;\nA -> 1 : B;\nB -> 1 : B;\n");
        let mut out = Vec::new();
        run(model_args(&file), &MdpcheckConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("States: A, B\n"));
        assert!(text.contains("A -> B: 1\nB -> B: 1\n"));
        assert!(text.ends_with("Initial state: A\nKind: Markov chain\n"));
    }

    #[test]
    fn decision_process_kind() {
        let file = write_model("States s, t;\nActions go;\ns [go] -> 1 : t;\nt -> 1 : t;\n");
        let mut out = Vec::new();
        run(model_args(&file), &MdpcheckConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("s [go] -> t: 1\n"));
        assert!(text.ends_with("Initial state: s\nKind: Markov decision process\n"));
    }
}
