//! # sy-core
//!
//! Core types and traits for StrangeYield.
//!
//! This crate carries the pieces every other crate in the workspace agrees
//! on: the error type, the [`Mergeable`] contract used to reduce per-worker
//! accumulators, and the insertion-ordered [`NamedList`] container that backs
//! the configuration registries and the intermediate/output object lists.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::Mergeable;
pub use types::NamedList;

/// StrangeYield version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
