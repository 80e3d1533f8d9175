//! Exact probabilistic analyses over built models.
//!
//! Markov chain queries are answered with dense linear algebra; MDP queries
//! (maximal and minimal reachability over all schedulers) are posed as
//! linear programs and solved with a two-phase simplex.
//!
//! | Query | Model | Method |
//! |-------|-------|--------|
//! | [`reachability`] | chain | `S0`/`S1` split, then `(I − A)·y = b` |
//! | [`discounted_value`] | chain | `(I − γP)·y = r`, or unrolled |
//! | [`max_reachability`] | MDP | LP, `min Σx` over `≥` rows |
//! | [`min_reachability`] | MDP | graph precomputation, then LP `max Σx` |
//!
//! # Quick start
//!
//! ```
//! use mdpcheck_exact::{Horizon, discounted_value};
//! use mdpcheck_model::ModelBuilder;
//!
//! let mut b = ModelBuilder::new();
//! b.add_state("paid", 1.0)?;
//! b.update_weight("paid", "paid", None, 1.0)?;
//! let model = b.build(None)?;
//!
//! let v = discounted_value(&model, Horizon::Unbounded, 0.5)?;
//! assert!((v[0] - 2.0).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod discount;
pub mod error;
pub mod horizon;
pub mod mdp;
pub mod reachability;

pub(crate) mod linalg;
pub(crate) mod simplex;

pub use discount::discounted_value;
pub use error::ExactError;
pub use horizon::Horizon;
pub use mdp::{max_reachability, min_reachability};
pub use reachability::{reachability, reachability_vector};
