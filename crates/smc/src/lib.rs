//! Statistical model checking by simulation.
//!
//! Both analyses draw sample paths from the initial state with the uniform
//! random policy and count the paths that visit a target state within a
//! step bound.
//!
//! - [`estimate_reachability`]: a Monte-Carlo estimate with a
//!   Chernoff-Hoeffding sample count ([`chernoff_sample_count`]).
//! - [`sequential_test`]: Wald's SPRT deciding whether the probability lies
//!   below or above a threshold, drawing only as many paths as needed.
//!
//! # Quick start
//!
//! ```
//! use mdpcheck_model::ModelBuilder;
//! use mdpcheck_smc::{SprtConfig, Verdict, sequential_test};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut b = ModelBuilder::new();
//! b.add_state("start", 0.0)?;
//! b.add_state("done", 0.0)?;
//! b.update_weight("start", "done", None, 1.0)?;
//! b.update_weight("done", "done", None, 1.0)?;
//! let model = b.build(None)?;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let config = SprtConfig::new().with_theta(0.9).with_epsilon(0.05);
//! let outcome = sequential_test(&model, "done", &config, &mut rng)?;
//! assert_eq!(outcome.verdict, Verdict::Above);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod estimate;
pub mod sprt;

pub use config::{EstimateConfig, SprtConfig};
pub use error::SmcError;
pub use estimate::{Estimate, chernoff_sample_count, estimate_reachability};
pub use sprt::{SprtOutcome, Verdict, sequential_test};
