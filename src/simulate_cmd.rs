//! Simulate command: one run under the uniform or an interactive policy.

use std::io::{self, Write};

use anyhow::{Context, Result};
use mdpcheck_model::{Model, Policy, SimulatedPath, UniformRandom, simulate};
use rand::rngs::StdRng;
use tracing::{info, info_span};

use crate::cli::SimulateArgs;
use crate::common;
use crate::config::MdpcheckConfig;
use crate::interactive::Interactive;

pub fn run(args: SimulateArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("simulate").entered();
    let model = common::open_model(&args.model, config)?;
    let mut rng = common::make_rng(args.seed, config);

    let path = if args.interactive {
        let stdin = io::stdin();
        let mut policy = Interactive::new(stdin.lock(), io::stderr());
        run_with(&model, args.steps, &mut policy, &mut rng)?
    } else {
        run_with(&model, args.steps, &mut UniformRandom, &mut rng)?
    };
    info!(steps = args.steps, "simulation finished");
    write_path(out, &model, &path)
}

fn run_with<P: Policy<StdRng>>(
    model: &Model,
    steps: usize,
    policy: &mut P,
    rng: &mut StdRng,
) -> Result<SimulatedPath> {
    simulate(model, steps, policy, None, rng).context("simulation failed")
}

fn write_path(out: &mut impl Write, model: &Model, path: &SimulatedPath) -> Result<()> {
    let labels: Vec<&str> = path.states.iter().map(|&s| model.state_label(s)).collect();
    writeln!(out, "{}", labels.join(" -> "))?;
    match path.last_action {
        Some(a) => writeln!(out, "Last action: {}", model.action_label(a).unwrap_or("-"))?,
        None => writeln!(out, "Last action: none")?,
    }
    Ok(())
}
