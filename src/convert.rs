//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use mdpcheck_exact::Horizon;
use mdpcheck_model::{BuildConfig, DeadlockPolicy};
use mdpcheck_rl::{QLearningConfig, ValueIterationConfig};
use mdpcheck_smc::{EstimateConfig, SprtConfig};

use crate::config::*;

/// Parses a deadlock policy name.
pub fn parse_deadlock(s: &str) -> Result<DeadlockPolicy> {
    match s.to_lowercase().as_str() {
        "self-loop" | "selfloop" | "self_loop" => Ok(DeadlockPolicy::SelfLoop),
        "reject" => Ok(DeadlockPolicy::Reject),
        other => bail!("unknown deadlock policy: {other:?} (expected \"self-loop\" or \"reject\")"),
    }
}

/// Builds a [`BuildConfig`] from the TOML build section.
pub fn build_build_config(build: &BuildToml) -> Result<BuildConfig> {
    Ok(BuildConfig::new().with_deadlock(parse_deadlock(&build.deadlock)?))
}

/// Builds an [`EstimateConfig`], validated.
pub fn build_estimate_config(est: &EstimateToml) -> Result<EstimateConfig> {
    let cfg = EstimateConfig::new()
        .with_horizon(est.horizon)
        .with_epsilon(est.epsilon)
        .with_delta(est.delta);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`SprtConfig`], validated.
pub fn build_sprt_config(sprt: &SprtToml) -> Result<SprtConfig> {
    let cfg = SprtConfig::new()
        .with_horizon(sprt.horizon)
        .with_alpha(sprt.alpha)
        .with_beta(sprt.beta)
        .with_epsilon(sprt.epsilon)
        .with_theta(sprt.theta)
        .with_max_iters(sprt.max_iters);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`ValueIterationConfig`], validated.
pub fn build_value_iteration_config(vi: &ValueIterationToml) -> Result<ValueIterationConfig> {
    let cfg = ValueIterationConfig::new()
        .with_gamma(vi.gamma)
        .with_epsilon(vi.epsilon)
        .with_max_iters(vi.max_iters);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`QLearningConfig`], validated.
pub fn build_q_learning_config(q: &QLearningToml) -> Result<QLearningConfig> {
    let cfg = QLearningConfig::new()
        .with_gamma(q.gamma)
        .with_max_iters(q.max_iters);
    cfg.validate()?;
    Ok(cfg)
}

/// Discount factor and horizon for the `reward` command.
pub fn build_discount(discount: &DiscountToml) -> (f64, Horizon) {
    (discount.gamma, Horizon::from_steps(discount.horizon))
}
