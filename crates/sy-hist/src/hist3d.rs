//! Three-dimensional unit-weight accumulator (centrality × pT × mass).

use serde::{Deserialize, Serialize};
use sy_core::{Error, Mergeable, Result};

use crate::axis::Axis;

/// A 3D counting histogram including under/overflow cells on every axis.
///
/// Cells are stored with `x` fastest: `index = (iz * (ny + 2) + iy) * (nx + 2) + ix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram3D {
    /// Histogram name.
    pub name: String,
    x_axis: Axis,
    y_axis: Axis,
    z_axis: Axis,
    content: Vec<f64>,
    entries: u64,
}

impl Histogram3D {
    /// Empty accumulator on the given axes.
    pub fn new(name: impl Into<String>, x_axis: Axis, y_axis: Axis, z_axis: Axis) -> Self {
        let n = (x_axis.n_bins() + 2) * (y_axis.n_bins() + 2) * (z_axis.n_bins() + 2);
        Self { name: name.into(), x_axis, y_axis, z_axis, content: vec![0.0; n], entries: 0 }
    }

    /// X axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// Y axis.
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Z axis.
    pub fn z_axis(&self) -> &Axis {
        &self.z_axis
    }

    /// Number of fill calls (including flow cells).
    pub fn entries(&self) -> u64 {
        self.entries
    }

    fn cell(&self, ix: usize, iy: usize, iz: usize) -> Option<usize> {
        let nx = self.x_axis.n_bins() + 2;
        let ny = self.y_axis.n_bins() + 2;
        let nz = self.z_axis.n_bins() + 2;
        (ix < nx && iy < ny && iz < nz).then_some((iz * ny + iy) * nx + ix)
    }

    /// Increment the cell containing `(x, y, z)` by one.
    pub fn fill(&mut self, x: f64, y: f64, z: f64) {
        let ix = self.x_axis.find_bin(x);
        let iy = self.y_axis.find_bin(y);
        let iz = self.z_axis.find_bin(z);
        if let Some(c) = self.cell(ix, iy, iz) {
            self.content[c] += 1.0;
            self.entries += 1;
        }
    }

    /// Content of cell `(ix, iy, iz)`. Out of range reads as 0.
    pub fn bin_content(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        self.cell(ix, iy, iz).map(|c| self.content[c]).unwrap_or(0.0)
    }

    /// Sum of all in-range cells.
    pub fn integral(&self) -> f64 {
        let mut sum = 0.0;
        for iz in 1..=self.z_axis.n_bins() {
            for iy in 1..=self.y_axis.n_bins() {
                for ix in 1..=self.x_axis.n_bins() {
                    sum += self.bin_content(ix, iy, iz);
                }
            }
        }
        sum
    }

    /// Mass (z) spectrum summed over all in-range x and y bins.
    pub fn z_spectrum(&self) -> Vec<f64> {
        (1..=self.z_axis.n_bins())
            .map(|iz| {
                let mut s = 0.0;
                for iy in 1..=self.y_axis.n_bins() {
                    for ix in 1..=self.x_axis.n_bins() {
                        s += self.bin_content(ix, iy, iz);
                    }
                }
                s
            })
            .collect()
    }

    /// Empty accumulator with identical binning.
    pub fn empty_like(&self) -> Self {
        Self::new(self.name.clone(), self.x_axis.clone(), self.y_axis.clone(), self.z_axis.clone())
    }

    /// True when both accumulators share the exact same binning.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x_axis == other.x_axis && self.y_axis == other.y_axis && self.z_axis == other.z_axis
    }
}

impl Mergeable for Histogram3D {
    fn merge(&mut self, other: &Self) -> Result<()> {
        if !self.same_binning(other) {
            return Err(Error::Binning(format!(
                "accumulators '{}' and '{}' have different binning",
                self.name, other.name
            )));
        }
        for (a, b) in self.content.iter_mut().zip(&other.content) {
            *a += b;
        }
        self.entries += other.entries;
        Ok(())
    }
}
