//! Two-dimensional histogram with per-cell sum of weights squared.

use serde::{Deserialize, Serialize};
use sy_core::{Error, Mergeable, Result};

use crate::axis::Axis;

/// A 2D histogram including under/overflow cells on both axes.
///
/// Cells are stored row-major in `y`: `index = iy * (nx + 2) + ix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2D {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    #[serde(default)]
    pub title: String,
    x_axis: Axis,
    y_axis: Axis,
    content: Vec<f64>,
    sumw2: Vec<f64>,
    #[serde(default)]
    entries: f64,
}

impl Histogram2D {
    /// Empty histogram on the given axes.
    pub fn new(name: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        let n = (x_axis.n_bins() + 2) * (y_axis.n_bins() + 2);
        Self {
            name: name.into(),
            title: String::new(),
            x_axis,
            y_axis,
            content: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0.0,
        }
    }

    /// X axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// Y axis.
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Number of fill calls.
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<()> {
        let n = (self.x_axis.n_bins() + 2) * (self.y_axis.n_bins() + 2);
        if self.content.len() != n || self.sumw2.len() != n {
            return Err(Error::Binning(format!(
                "histogram '{}' has {} cells / {} sumw2, expected {n}",
                self.name,
                self.content.len(),
                self.sumw2.len()
            )));
        }
        Ok(())
    }

    fn cell(&self, ix: usize, iy: usize) -> Option<usize> {
        let nx = self.x_axis.n_bins() + 2;
        let ny = self.y_axis.n_bins() + 2;
        (ix < nx && iy < ny).then_some(iy * nx + ix)
    }

    /// Content of cell `(ix, iy)`. Out of range reads as 0.
    pub fn cell_content(&self, ix: usize, iy: usize) -> f64 {
        self.cell(ix, iy).map(|c| self.content[c]).unwrap_or(0.0)
    }

    /// Error of cell `(ix, iy)`.
    pub fn cell_error(&self, ix: usize, iy: usize) -> f64 {
        self.cell(ix, iy).map(|c| self.sumw2[c].sqrt()).unwrap_or(0.0)
    }

    /// Set content and error of cell `(ix, iy)`.
    pub fn set_cell(&mut self, ix: usize, iy: usize, content: f64, error: f64) {
        if let Some(c) = self.cell(ix, iy) {
            self.content[c] = content;
            self.sumw2[c] = error * error;
        }
    }

    /// Fill `(x, y)` with weight `w`.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        let ix = self.x_axis.find_bin(x);
        let iy = self.y_axis.find_bin(y);
        if let Some(c) = self.cell(ix, iy) {
            self.content[c] += w;
            self.sumw2[c] += w * w;
            self.entries += 1.0;
        }
    }

    /// Zero all cells and the entry count.
    pub fn reset(&mut self) {
        self.content.iter_mut().for_each(|c| *c = 0.0);
        self.sumw2.iter_mut().for_each(|w| *w = 0.0);
        self.entries = 0.0;
    }

    /// Empty copy (same binning) under a new name.
    pub fn empty_like(&self, name: impl Into<String>) -> Self {
        let mut h = Self::new(name, self.x_axis.clone(), self.y_axis.clone());
        h.title = self.title.clone();
        h
    }
}

impl Mergeable for Histogram2D {
    fn merge(&mut self, other: &Self) -> Result<()> {
        if self.x_axis != other.x_axis || self.y_axis != other.y_axis {
            return Err(Error::Binning(format!(
                "histograms '{}' and '{}' have different binning",
                self.name, other.name
            )));
        }
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

    fn h() -> Histogram2D {
        Histogram2D::new("h", Axis::uniform(4, -2.0, 2.0).unwrap(), Axis::uniform(2, 0.0, 2.0).unwrap())
    }

    #[test]
    fn fill_and_read() {
        let mut a = h();
        a.fill(-1.5, 0.5, 2.0);
        a.fill(-1.5, 0.5, 1.0);
        a.fill(0.5, -1.0, 1.0);
        assert_eq!(a.cell_content(1, 1), 3.0);
        assert!((a.cell_error(1, 1) - 5.0_f64.sqrt()).abs() < 1e-12);
        // y underflow row
        assert_eq!(a.cell_content(3, 0), 1.0);
        assert_eq!(a.cell_content(9, 9), 0.0);
    }

    #[test]
    fn merge_and_mismatch() {
        let mut a = h();
        let mut b = h();
        b.set_cell(2, 2, 4.0, 2.0);
        a.merge(&b).unwrap();
        assert_eq!(a.cell_content(2, 2), 4.0);

        let c = Histogram2D::new("c", Axis::uniform(3, -2.0, 2.0).unwrap(), Axis::uniform(2, 0.0, 2.0).unwrap());
        assert!(a.merge(&c).is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let mut a = h();
        a.fill(0.1, 1.1, 1.0);
        let json = serde_json::to_string(&a).unwrap();
        let back: Histogram2D = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back, a);
    }
}
