//! # sy-select
//!
//! Selection-and-fill engine for strange-hadron candidates.
//!
//! A [`Registry`] holds an ordered list of named configurations, each owning
//! a centrality × pT × mass accumulator. For every reconstructed candidate the
//! [`engine`] evaluates every configuration's fixed-order cut predicate and
//! fills the accumulators of the configurations that accept it.
//!
//! Two topologies are supported:
//! - two-prong V0 decays (K0S, Λ, anti-Λ) via [`V0Config`]
//! - three-prong cascades (Ξ±, Ω±) via [`CascadeConfig`]
//!
//! ## Example
//!
//! ```
//! use sy_select::{engine, presets, V0Registry};
//!
//! let mut registry = V0Registry::new();
//! registry.extend(presets::topological_qa_v0(4)).unwrap();
//! assert_eq!(registry.len(), 3 + 5 * 3 * 4);
//!
//! let stats = engine::fill_candidates(&mut registry, 5.0, &[]);
//! assert_eq!(stats.candidates, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binning;
pub mod candidate;
pub mod cascade;
pub mod cuts;
pub mod engine;
pub mod hypothesis;
pub mod presets;
pub mod registry;
pub mod sweep;
pub mod v0;

pub use binning::ResultBinning;
pub use candidate::{CascadeCandidate, DaughterTrack, NSigma, SkipReason, V0Candidate};
pub use cascade::{CascadeConfig, CascadeCut};
pub use cuts::{ExpCurve, LambdaMassModel, VariableCut};
pub use engine::EngineStats;
pub use hypothesis::{CascadeHypothesis, Species, V0Hypothesis};
pub use registry::{Registry, ResultEntry, Selection};
pub use v0::{V0Config, V0Cut};

/// Registry of two-prong configurations.
pub type V0Registry = Registry<V0Config>;
/// Registry of cascade configurations.
pub type CascadeRegistry = Registry<CascadeConfig>;
