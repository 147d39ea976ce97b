//! # sy-hist
//!
//! Binned accumulators for StrangeYield.
//!
//! All histograms follow the ROOT cell convention: bin `0` is the underflow,
//! bins `1..=n` are in range and bin `n + 1` is the overflow, on every axis.
//!
//! ## Example
//!
//! ```
//! use sy_hist::{Axis, Histogram3D};
//!
//! let mut h = Histogram3D::new(
//!     "K0Short_Central",
//!     Axis::variable(vec![0.0, 10.0, 50.0, 90.0]).unwrap(),
//!     Axis::variable(vec![0.0, 0.5, 1.0, 2.0, 5.0]).unwrap(),
//!     Axis::uniform(100, 0.422, 0.572).unwrap(),
//! );
//! h.fill(5.0, 1.2, 0.497);
//! assert_eq!(h.entries(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod hist1d;
pub mod hist2d;
pub mod hist3d;

pub use axis::Axis;
pub use hist1d::Histogram1D;
pub use hist2d::Histogram2D;
pub use hist3d::Histogram3D;
