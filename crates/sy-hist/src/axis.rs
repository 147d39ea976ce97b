//! Histogram axis with (possibly variable) bin edges.

use serde::{Deserialize, Serialize};
use sy_core::{Error, Result};

/// One histogram axis.
///
/// Bin indices follow the ROOT convention: `0` is underflow, `1..=n_bins`
/// are in range, `n_bins + 1` is overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// `n` equal-width bins on `[min, max)`.
    pub fn uniform(n: usize, min: f64, max: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::Binning("uniform axis needs at least one bin".into()));
        }
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(Error::Binning(format!("invalid uniform range [{min}, {max})")));
        }
        let width = (max - min) / n as f64;
        let mut edges: Vec<f64> = (0..n).map(|i| min + i as f64 * width).collect();
        edges.push(max);
        Ok(Self { edges })
    }

    /// Axis from explicit edges (strictly increasing, at least two).
    pub fn variable(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Binning(format!(
                "axis needs at least two edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::Binning("axis edges must be finite".into()));
        }
        if edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::Binning("axis edges must be strictly increasing".into()));
        }
        Ok(Self { edges })
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lower edge of the first bin.
    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the last bin.
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// All edges (length `n_bins + 1`).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Cell index of `x`: `0` for underflow (and NaN), `n_bins + 1` for overflow.
    pub fn find_bin(&self, x: f64) -> usize {
        if x.is_nan() || x < self.min() {
            return 0;
        }
        if x >= self.max() {
            return self.n_bins() + 1;
        }
        // First edge strictly greater than x; edges[0] <= x so this is >= 1.
        self.edges.partition_point(|&e| e <= x)
    }

    /// Width of bin `i`. Flow bins borrow the width of their neighbour.
    pub fn bin_width(&self, i: usize) -> f64 {
        let n = self.n_bins();
        let b = i.clamp(1, n);
        self.edges[b] - self.edges[b - 1]
    }

    /// Lower edge of bin `i` (flow bins extrapolate by one neighbour width).
    pub fn bin_low_edge(&self, i: usize) -> f64 {
        let n = self.n_bins();
        match i {
            0 => self.min() - self.bin_width(1),
            i if i > n => self.max(),
            i => self.edges[i - 1],
        }
    }

    /// Centre of bin `i` (flow bins extrapolate by one neighbour width).
    pub fn bin_center(&self, i: usize) -> f64 {
        self.bin_low_edge(i) + 0.5 * self.bin_width(i)
    }

    /// Axis spanning the negated range `[-max, -min]` with mirrored edges.
    pub fn mirrored(&self) -> Self {
        let edges = self.edges.iter().rev().map(|e| -e).collect();
        Self { edges }
    }

    /// Axis with every `factor` adjacent bins merged. `factor` must divide `n_bins`.
    pub fn rebinned(&self, factor: usize) -> Result<Self> {
        let n = self.n_bins();
        if factor == 0 || n % factor != 0 {
            return Err(Error::Binning(format!(
                "rebin factor {factor} does not divide {n} bins"
            )));
        }
        let edges = self.edges.iter().step_by(factor).copied().collect();
        Ok(Self { edges })
    }
}

impl TryFrom<Vec<f64>> for Axis {
    type Error = Error;

    fn try_from(edges: Vec<f64>) -> Result<Self> {
        Axis::variable(edges)
    }
}

impl From<Axis> for Vec<f64> {
    fn from(axis: Axis) -> Self {
        axis.edges
    }
}
