//! Markov chain and Markov decision process models.
//!
//! A model is a finite set of labelled states with rewards, an optional set
//! of actions, and weighted transitions. Raw weights are registered on a
//! [`ModelBuilder`]; [`ModelBuilder::build`] normalizes them into
//! probabilities, checks action coherence and returns the read-only
//! [`Model`] every analysis works on.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │ ModelBuilder │────▶│     build      │────▶│  Model (frozen)  │
//!  │ (declare)    │     │ (normalize)    │     │  simulate/step   │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use mdpcheck_model::{ModelBuilder, UniformRandom, simulate};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut builder = ModelBuilder::new();
//! builder.add_state("A", 0.0)?;
//! builder.add_state("B", 0.0)?;
//! builder.update_weight("A", "B", None, 1.0)?;
//! builder.update_weight("B", "A", None, 1.0)?;
//! let model = builder.build(None)?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let path = simulate(&model, 4, &mut UniformRandom, None, &mut rng)?;
//! assert_eq!(path.states, vec![0, 1, 0, 1, 0]);
//! # Ok::<(), mdpcheck_model::ModelError>(())
//! ```

pub mod builder;
pub mod config;
pub mod declare;
pub mod error;
pub mod model;
pub mod policy;
pub mod simulate;

pub use builder::ModelBuilder;
pub use config::{BuildConfig, DeadlockPolicy};
pub use declare::DeclarationSink;
pub use error::ModelError;
pub use model::{Model, NO_ACTION};
pub use policy::{FixedPolicy, Policy, UniformRandom};
pub use simulate::{SimulatedPath, Step, simulate, step};
