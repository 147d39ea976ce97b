//! # sy-norm
//!
//! Event bookkeeping and dN/dη normalization.
//!
//! A [`RunState`] classifies each event by trigger class and vertex, sums
//! the η × vertex-bin histograms of accepted events and, once the run is
//! over, turns the sums into acceptance-corrected, vertex-efficiency
//! normalized yields with optional rebinned and mirrored variants.
//!
//! ```
//! use sy_norm::{ForwardEvent, NormalizationConfig, RunState, TriggerBits};
//!
//! let mut run = RunState::new(NormalizationConfig::default());
//! let event = ForwardEvent {
//!     triggers: TriggerBits { inel: true, ..Default::default() },
//!     ip_z: Some(0.0),
//!     ..Default::default()
//! };
//! // No forward histogram: skipped and not counted.
//! assert!(!run.process(&event).unwrap());
//! assert!(run.finalize().is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counters;
pub mod projection;
pub mod rebin;
pub mod run;
pub mod symmetrize;
pub mod trigger;

pub use counters::TriggerCounters;
pub use projection::{Projection, ZeroErrorPolicy};
pub use rebin::rebin;
pub use run::{ForwardEvent, NormalizationConfig, NormalizationOutput, RunPhase, RunState, YieldSet};
pub use symmetrize::symmetrize;
pub use trigger::{EventClassifier, TriggerBits, TriggerMask};
