//! Reward-maximizing policy synthesis.
//!
//! [`value_iteration`] solves the Bellman optimality equation by repeated
//! sweeps over the model; [`q_learning`] learns the same greedy policy from
//! simulated single steps without reading whole transition rows. Both
//! maximize the discounted sum of per-state rewards and only ever choose
//! actions enabled in a state.
//!
//! # Quick start
//!
//! ```
//! use mdpcheck_model::ModelBuilder;
//! use mdpcheck_rl::{QLearningConfig, q_learning};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut b = ModelBuilder::new();
//! b.add_state("a", 1.0)?;
//! b.add_state("b", 0.0)?;
//! b.update_weight("a", "b", None, 1.0)?;
//! b.update_weight("b", "a", None, 1.0)?;
//! let model = b.build(None)?;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let result = q_learning(&model, &QLearningConfig::new().with_max_iters(100), &mut rng)?;
//! assert_eq!(result.q().dim(), (2, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod q_learning;
pub mod result;
pub mod value_iteration;

pub use config::{QLearningConfig, ValueIterationConfig};
pub use error::RlError;
pub use q_learning::q_learning;
pub use result::{QLearningResult, ValueIterationResult};
pub use value_iteration::value_iteration;
