//! One-dimensional histogram with per-bin sum of weights squared.

use serde::{Deserialize, Serialize};
use sy_core::{Error, Mergeable, Result};

use crate::axis::Axis;

/// A 1D histogram including under/overflow cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    axis: Axis,
    /// Cell contents (length = n_bins + 2).
    content: Vec<f64>,
    /// Cell sum of weights squared (length = n_bins + 2).
    sumw2: Vec<f64>,
    /// Total number of fill calls.
    entries: f64,
}

impl Histogram1D {
    /// Empty histogram on `axis`.
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        let n = axis.n_bins() + 2;
        Self {
            name: name.into(),
            title: String::new(),
            axis,
            content: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0.0,
        }
    }

    /// Builder-style title setter.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Histogram axis.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.axis.n_bins()
    }

    /// Number of fill calls.
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Content of cell `i` (0 = underflow, n+1 = overflow). Out of range reads as 0.
    pub fn bin_content(&self, i: usize) -> f64 {
        self.content.get(i).copied().unwrap_or(0.0)
    }

    /// Statistical error of cell `i`.
    pub fn bin_error(&self, i: usize) -> f64 {
        self.sumw2.get(i).map(|w2| w2.sqrt()).unwrap_or(0.0)
    }

    /// Set content of cell `i`. Indices beyond the overflow cell are ignored.
    pub fn set_bin_content(&mut self, i: usize, value: f64) {
        if let Some(c) = self.content.get_mut(i) {
            *c = value;
        }
    }

    /// Set error of cell `i`. Indices beyond the overflow cell are ignored.
    pub fn set_bin_error(&mut self, i: usize, error: f64) {
        if let Some(w2) = self.sumw2.get_mut(i) {
            *w2 = error * error;
        }
    }

    /// In-range contents (bins `1..=n`).
    pub fn contents(&self) -> &[f64] {
        &self.content[1..=self.n_bins()]
    }

    /// In-range errors (bins `1..=n`).
    pub fn errors(&self) -> Vec<f64> {
        self.sumw2[1..=self.n_bins()].iter().map(|w2| w2.sqrt()).collect()
    }

    /// Fill `x` with unit weight.
    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    /// Fill `x` with weight `w`.
    pub fn fill_weighted(&mut self, x: f64, w: f64) {
        let b = self.axis.find_bin(x);
        self.content[b] += w;
        self.sumw2[b] += w * w;
        self.entries += 1.0;
    }

    /// Sum of in-range contents.
    pub fn integral(&self) -> f64 {
        self.contents().iter().sum()
    }

    /// Multiply every cell by `factor` (errors scale linearly).
    pub fn scale(&mut self, factor: f64) {
        let f2 = factor * factor;
        for (c, w2) in self.content.iter_mut().zip(self.sumw2.iter_mut()) {
            *c *= factor;
            *w2 *= f2;
        }
    }

    /// Multiply every in-range bin by `factor / width` (density conversion).
    pub fn scale_by_width(&mut self, factor: f64) {
        for i in 1..=self.n_bins() {
            let f = factor / self.axis.bin_width(i);
            self.content[i] *= f;
            self.sumw2[i] *= f * f;
        }
    }

    /// Bin-by-bin division by `other`, propagating relative errors in
    /// quadrature. Cells where the denominator is zero are set to zero.
    pub fn divide(&mut self, other: &Histogram1D) -> Result<()> {
        self.check_compatible(other)?;
        for i in 0..self.content.len() {
            let c1 = self.content[i];
            let c2 = other.content[i];
            if c2 == 0.0 {
                self.content[i] = 0.0;
                self.sumw2[i] = 0.0;
                continue;
            }
            let e1sq = self.sumw2[i];
            let e2sq = other.sumw2[i];
            let c2sq = c2 * c2;
            self.content[i] = c1 / c2;
            self.sumw2[i] = (e1sq * c2sq + e2sq * c1 * c1) / (c2sq * c2sq);
        }
        Ok(())
    }

    /// Zero all cells and the entry count.
    pub fn reset(&mut self) {
        self.content.iter_mut().for_each(|c| *c = 0.0);
        self.sumw2.iter_mut().for_each(|w| *w = 0.0);
        self.entries = 0.0;
    }

    /// Copy under a new name.
    pub fn clone_named(&self, name: impl Into<String>) -> Self {
        let mut h = self.clone();
        h.name = name.into();
        h
    }

    fn check_compatible(&self, other: &Histogram1D) -> Result<()> {
        if self.axis != other.axis {
            return Err(Error::Binning(format!(
                "histograms '{}' and '{}' have different binning",
                self.name, other.name
            )));
        }
        Ok(())
    }
}

impl Mergeable for Histogram1D {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;
        for (a, b) in self.content.iter_mut().zip(&other.content) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.entries += other.entries;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hist(contents: &[f64], width: f64) -> Histogram1D {
        let n = contents.len();
        let mut h = Histogram1D::new("h", Axis::uniform(n, 0.0, n as f64 * width).unwrap());
        for (i, &c) in contents.iter().enumerate() {
            h.set_bin_content(i + 1, c);
            h.set_bin_error(i + 1, c.sqrt());
        }
        h
    }

    #[test]
    fn fill_simple() {
        let mut h = Histogram1D::new("h", Axis::variable(vec![0.0, 1.0, 2.0, 3.0]).unwrap());
        for x in [0.5, 1.5, 2.5, 0.5, -1.0, 3.5] {
            h.fill(x);
        }
        assert_eq!(h.contents(), &[2.0, 1.0, 1.0]);
        assert_eq!(h.bin_content(0), 1.0);
        assert_eq!(h.bin_content(4), 1.0);
        assert_eq!(h.entries(), 6.0);
    }

    #[test]
    fn fill_with_weight() {
        let mut h = Histogram1D::new("h", Axis::variable(vec![0.0, 1.0, 2.0]).unwrap());
        h.fill_weighted(0.5, 2.0);
        h.fill_weighted(1.5, 3.0);
        h.fill_weighted(0.5, 1.0);
        assert_eq!(h.contents(), &[3.0, 3.0]);
        assert_relative_eq!(h.bin_error(1), 5.0_f64.sqrt());
        assert_relative_eq!(h.bin_error(2), 3.0);
    }

    #[test]
    fn scale_by_width_density() {
        let mut h = hist(&[4.0, 8.0], 0.5);
        h.scale_by_width(2.0);
        assert_relative_eq!(h.bin_content(1), 16.0);
        assert_relative_eq!(h.bin_content(2), 32.0);
        assert_relative_eq!(h.bin_error(1), 2.0 * 4.0);
    }

    #[test]
    fn divide_propagates_errors() {
        let mut a = hist(&[4.0, 9.0, 1.0], 1.0);
        let mut b = hist(&[2.0, 3.0, 0.0], 1.0);
        b.set_bin_error(1, 1.0);
        a.divide(&b).unwrap();
        assert_relative_eq!(a.bin_content(1), 2.0);
        // (e1^2 c2^2 + e2^2 c1^2) / c2^4 = (4*4 + 1*16) / 16
        assert_relative_eq!(a.bin_error(1), (32.0_f64 / 16.0).sqrt());
        assert_relative_eq!(a.bin_content(2), 3.0);
        assert_eq!(a.bin_content(3), 0.0);
        assert_eq!(a.bin_error(3), 0.0);
    }

    #[test]
    fn divide_rejects_mismatched_binning() {
        let mut a = hist(&[1.0, 1.0], 1.0);
        let b = hist(&[1.0, 1.0, 1.0], 1.0);
        assert!(a.divide(&b).is_err());
    }

    #[test]
    fn merge_adds_cells() {
        let mut a = hist(&[1.0, 2.0], 1.0);
        let b = hist(&[3.0, 4.0], 1.0);
        a.merge(&b).unwrap();
        assert_eq!(a.contents(), &[4.0, 6.0]);
        assert_relative_eq!(a.bin_error(1), 2.0);
    }

    #[test]
    fn set_out_of_range_is_ignored() {
        let mut h = hist(&[1.0], 1.0);
        h.set_bin_content(7, 5.0);
        h.set_bin_error(7, 5.0);
        assert_eq!(h.bin_content(7), 0.0);
        assert_eq!(h.integral(), 1.0);
    }
}
