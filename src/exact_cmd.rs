//! Exact analyses: chain reachability, discounted reward, MDP bounds.

use std::io::Write;

use anyhow::{Context, Result};
use mdpcheck_exact::{
    Horizon, discounted_value, max_reachability, min_reachability, reachability_vector,
};
use tracing::{info, info_span};

use crate::cli::{ReachArgs, RewardArgs, TargetArgs};
use crate::common;
use crate::config::MdpcheckConfig;
use crate::convert;

/// Which scheduler bound `max-reach` / `min-reach` computes.
#[derive(Debug, Clone, Copy)]
pub enum Bound {
    Max,
    Min,
}

pub fn reach(args: ReachArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("reach").entered();
    let model = common::open_model(&args.target.model, config)?;
    let horizon = Horizon::from_steps(args.steps);
    let probs = reachability_vector(&model, &args.target.target, horizon)
        .with_context(|| format!("reachability of {:?} failed", args.target.target))?;
    let init = model.initial_state();
    info!(%horizon, probability = probs[init], "reachability computed");

    writeln!(
        out,
        "P({} reaches {}, {horizon}) = {:.6}",
        model.state_label(init),
        args.target.target,
        probs[init]
    )?;
    if args.all {
        common::write_state_values(out, &model, &probs)?;
    }
    Ok(())
}

pub fn reward(args: RewardArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("reward").entered();
    let model = common::open_model(&args.model, config)?;
    let (mut gamma, mut horizon) = convert::build_discount(&config.discount);
    if let Some(g) = args.gamma {
        gamma = g;
    }
    if let Some(n) = args.steps {
        horizon = Horizon::from_steps(n);
    }
    let values =
        discounted_value(&model, horizon, gamma).context("discounted reward failed")?;
    info!(%horizon, gamma, "discounted reward computed");

    writeln!(out, "Discounted reward (gamma = {gamma}, {horizon}):")?;
    common::write_state_values(out, &model, &values)
}

pub fn bound(
    args: TargetArgs,
    which: Bound,
    config: &MdpcheckConfig,
    out: &mut impl Write,
) -> Result<()> {
    let name = match which {
        Bound::Max => "max-reach",
        Bound::Min => "min-reach",
    };
    let _cmd = info_span!("bound", cmd = name).entered();
    let model = common::open_model(&args.model, config)?;
    let probs = match which {
        Bound::Max => max_reachability(&model, &args.target),
        Bound::Min => min_reachability(&model, &args.target),
    }
    .with_context(|| format!("{name} of {:?} failed", args.target))?;
    info!(
        probability = probs[model.initial_state()],
        "reachability bound computed"
    );

    let word = match which {
        Bound::Max => "Maximal",
        Bound::Min => "Minimal",
    };
    writeln!(out, "{word} probability of reaching {}:", args.target)?;
    common::write_state_values(out, &model, &probs)
}
