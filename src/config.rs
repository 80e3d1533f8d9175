use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "mdpcheck.toml";

/// Top-level run configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MdpcheckConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Model building settings.
    #[serde(default)]
    pub build: BuildToml,

    /// Monte-Carlo estimation settings.
    #[serde(default)]
    pub estimate: EstimateToml,

    /// Sequential test settings.
    #[serde(default)]
    pub sprt: SprtToml,

    /// Value iteration settings.
    #[serde(default)]
    pub value_iteration: ValueIterationToml,

    /// Q-learning settings.
    #[serde(default)]
    pub q_learning: QLearningToml,

    /// Discounted reward settings.
    #[serde(default)]
    pub discount: DiscountToml,
}

impl MdpcheckConfig {
    /// Loads `path` if given (it must exist), else `mdpcheck.toml` when
    /// present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildToml {
    #[serde(default)]
    pub initial: Option<String>,
    #[serde(default = "default_deadlock")]
    pub deadlock: String,
}

impl Default for BuildToml {
    fn default() -> Self {
        Self {
            initial: None,
            deadlock: default_deadlock(),
        }
    }
}

fn default_deadlock() -> String {
    "self-loop".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateToml {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_delta")]
    pub delta: f64,
}

impl Default for EstimateToml {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            epsilon: default_epsilon(),
            delta: default_delta(),
        }
    }
}

fn default_horizon() -> usize {
    10
}
fn default_epsilon() -> f64 {
    0.01
}
fn default_delta() -> f64 {
    0.05
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprtToml {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_error_rate")]
    pub alpha: f64,
    #[serde(default = "default_error_rate")]
    pub beta: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_theta")]
    pub theta: f64,
    #[serde(default = "default_sprt_max_iters")]
    pub max_iters: usize,
}

impl Default for SprtToml {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            alpha: default_error_rate(),
            beta: default_error_rate(),
            epsilon: default_epsilon(),
            theta: default_theta(),
            max_iters: default_sprt_max_iters(),
        }
    }
}

fn default_error_rate() -> f64 {
    0.01
}
fn default_theta() -> f64 {
    0.5
}
fn default_sprt_max_iters() -> usize {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueIterationToml {
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_vi_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_vi_max_iters")]
    pub max_iters: usize,
}

impl Default for ValueIterationToml {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            epsilon: default_vi_epsilon(),
            max_iters: default_vi_max_iters(),
        }
    }
}

fn default_gamma() -> f64 {
    0.9
}
fn default_vi_epsilon() -> f64 {
    1e-6
}
fn default_vi_max_iters() -> usize {
    1000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QLearningToml {
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_q_max_iters")]
    pub max_iters: usize,
}

impl Default for QLearningToml {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            max_iters: default_q_max_iters(),
        }
    }
}

fn default_q_max_iters() -> usize {
    10_000
}

/// `horizon = 0` means unbounded.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountToml {
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub horizon: usize,
}

impl Default for DiscountToml {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            horizon: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg: MdpcheckConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.build.deadlock, "self-loop");
        assert_eq!(cfg.estimate.horizon, 10);
        assert_eq!(cfg.sprt.max_iters, 10_000);
        assert_eq!(cfg.value_iteration.gamma, 0.9);
        assert_eq!(cfg.q_learning.max_iters, 10_000);
        assert_eq!(cfg.discount.horizon, 0);
    }

    #[test]
    fn partial_sections() {
        let cfg: MdpcheckConfig = toml::from_str(
            r#"
seed = 7

[build]
initial = "S1"
deadlock = "reject"

[sprt]
theta = 0.3
"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.build.initial.as_deref(), Some("S1"));
        assert_eq!(cfg.sprt.theta, 0.3);
        assert_eq!(cfg.sprt.alpha, 0.01);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<MdpcheckConfig>("[estimate]\nsamples = 3\n").is_err());
        assert!(toml::from_str::<MdpcheckConfig>("verbose = true\n").is_err());
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[q_learning]\ngamma = 0.5").unwrap();
        let cfg = MdpcheckConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.q_learning.gamma, 0.5);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let err = MdpcheckConfig::load(Some(Path::new("/nonexistent/mdpcheck.toml"))).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config"));
    }
}
