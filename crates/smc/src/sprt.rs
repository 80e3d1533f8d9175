//! Sequential probability ratio test on bounded reachability.

use mdpcheck_model::Model;
use rand::Rng;
use tracing::debug;

use crate::config::SprtConfig;
use crate::error::SmcError;
use crate::estimate::path_hits;

/// Decision reached by [`sequential_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The reachability probability is at most theta.
    Below,
    /// The reachability probability is at least theta.
    Above,
    /// The draw budget ran out between the two thresholds.
    Undecided,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Below => "below",
            Self::Above => "above",
            Self::Undecided => "undecided",
        })
    }
}

/// Outcome of [`sequential_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprtOutcome {
    /// Decision.
    pub verdict: Verdict,
    /// Paths drawn before stopping.
    pub draws: usize,
    /// Paths among them that visited the target.
    pub successes: usize,
    /// Final log-likelihood ratio.
    pub log_ratio: f64,
}

/// Wald's sequential test of `P ≤ theta − epsilon` against
/// `P ≥ theta + epsilon`, where `P` is the probability that a run visits
/// `target` within `config.horizon()` steps.
///
/// After `m` draws with `d` successes the log-likelihood ratio is
/// `d·ln(γ1/γ0) + (m − d)·ln((1 − γ1)/(1 − γ0))` with `γ1 = theta − epsilon`
/// and `γ0 = theta + epsilon`. The test answers [`Verdict::Below`] once it
/// reaches `ln((1 − beta)/alpha)` and [`Verdict::Above`] once it falls to
/// `ln(beta/(1 − alpha))`.
///
/// # Errors
///
/// [`SmcError::InvalidParameter`] from config validation,
/// [`SmcError::Model`] for an unknown target.
pub fn sequential_test<R: Rng>(
    model: &Model,
    target: &str,
    config: &SprtConfig,
    rng: &mut R,
) -> Result<SprtOutcome, SmcError> {
    config.validate()?;
    let target = model.state_index(target)?;

    let log_a = ((1.0 - config.beta()) / config.alpha()).ln();
    let log_b = (config.beta() / (1.0 - config.alpha())).ln();
    let gamma1 = config.theta() - config.epsilon();
    let gamma0 = config.theta() + config.epsilon();
    let success_term = (gamma1 / gamma0).ln();
    let failure_term = ((1.0 - gamma1) / (1.0 - gamma0)).ln();

    let mut draws = 0;
    let mut successes = 0;
    let mut log_ratio = 0.0;
    let mut verdict = Verdict::Undecided;
    while draws < config.max_iters() {
        if path_hits(model, target, config.horizon(), rng)? {
            successes += 1;
        }
        draws += 1;
        log_ratio =
            successes as f64 * success_term + (draws - successes) as f64 * failure_term;
        if log_ratio >= log_a {
            verdict = Verdict::Below;
            break;
        }
        if log_ratio <= log_b {
            verdict = Verdict::Above;
            break;
        }
    }

    debug!(
        target = model.state_label(target),
        theta = config.theta(),
        %verdict,
        draws,
        successes,
        log_ratio,
        "sequential test finished"
    );
    Ok(SprtOutcome {
        verdict,
        draws,
        successes,
        log_ratio,
    })
}
