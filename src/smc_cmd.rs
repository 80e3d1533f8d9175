//! Statistical analyses: Monte-Carlo estimate and sequential test.

use std::io::Write;

use anyhow::{Context, Result};
use mdpcheck_smc::{Verdict, estimate_reachability, sequential_test};
use tracing::{info, info_span};

use crate::cli::{EstimateArgs, SprtArgs};
use crate::common;
use crate::config::MdpcheckConfig;
use crate::convert;

pub fn estimate(args: EstimateArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("estimate").entered();
    let mut toml = config.estimate.clone();
    if let Some(n) = args.steps {
        toml.horizon = n;
    }
    if let Some(e) = args.epsilon {
        toml.epsilon = e;
    }
    if let Some(d) = args.delta {
        toml.delta = d;
    }
    let cfg = convert::build_estimate_config(&toml)?;
    let model = common::open_model(&args.target.model, config)?;
    let mut rng = common::make_rng(args.seed, config);

    let est = estimate_reachability(&model, &args.target.target, &cfg, &mut rng)
        .context("Monte-Carlo estimation failed")?;
    info!(samples = est.samples, hits = est.hits, "estimate computed");

    writeln!(
        out,
        "P({} reaches {} within {} steps) ~ {:.6} ({} of {} runs; epsilon = {}, delta = {})",
        model.state_label(model.initial_state()),
        args.target.target,
        cfg.horizon(),
        est.probability,
        est.hits,
        est.samples,
        cfg.epsilon(),
        cfg.delta()
    )?;
    Ok(())
}

pub fn sprt(args: SprtArgs, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    let _cmd = info_span!("sprt").entered();
    let mut toml = config.sprt.clone();
    if let Some(n) = args.steps {
        toml.horizon = n;
    }
    if let Some(v) = args.theta {
        toml.theta = v;
    }
    if let Some(v) = args.epsilon {
        toml.epsilon = v;
    }
    if let Some(v) = args.alpha {
        toml.alpha = v;
    }
    if let Some(v) = args.beta {
        toml.beta = v;
    }
    if let Some(v) = args.max_iters {
        toml.max_iters = v;
    }
    let cfg = convert::build_sprt_config(&toml)?;
    let model = common::open_model(&args.target.model, config)?;
    let mut rng = common::make_rng(args.seed, config);

    let outcome = sequential_test(&model, &args.target.target, &cfg, &mut rng)
        .context("sequential test failed")?;
    info!(
        draws = outcome.draws,
        successes = outcome.successes,
        log_ratio = outcome.log_ratio,
        "sequential test computed"
    );

    let within = format!("{} within {} steps", args.target.target, cfg.horizon());
    match outcome.verdict {
        Verdict::Below => writeln!(
            out,
            "P(reach {within}) <= {} (alpha = {})",
            cfg.theta(),
            cfg.alpha()
        )?,
        Verdict::Above => writeln!(
            out,
            "P(reach {within}) >= {} (beta = {})",
            cfg.theta(),
            cfg.beta()
        )?,
        Verdict::Undecided => writeln!(
            out,
            "undecided whether P(reach {within}) >= {} after {} runs",
            cfg.theta(),
            outcome.draws
        )?,
    }
    writeln!(out, "{} of {} runs reached the target", outcome.successes, outcome.draws)?;
    Ok(())
}
