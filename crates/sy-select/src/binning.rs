//! Accumulator binning carried by every configuration.

use serde::{Deserialize, Serialize};
use sy_core::Result;
use sy_hist::{Axis, Histogram3D};

/// Centrality × pT × mass binning of one configuration's accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBinning {
    /// Centrality bin edges (percentile).
    pub centrality: Vec<f64>,
    /// pT bin edges (GeV/c).
    pub pt: Vec<f64>,
    /// Number of uniform mass bins.
    pub mass_bins: usize,
    /// Lower mass edge (GeV/c²).
    pub mass_min: f64,
    /// Upper mass edge (GeV/c²).
    pub mass_max: f64,
}

impl Default for ResultBinning {
    fn default() -> Self {
        Self {
            centrality: vec![0.0, 100.0],
            pt: vec![0.0, 20.0],
            mass_bins: 400,
            mass_min: 0.0,
            mass_max: 2.0,
        }
    }
}

impl ResultBinning {
    /// Binning with `mass_bins` uniform mass bins on `center ± window`.
    pub fn around(
        centrality: &[f64],
        pt: &[f64],
        mass_bins: usize,
        center: f64,
        window: f64,
    ) -> Self {
        Self {
            centrality: centrality.to_vec(),
            pt: pt.to_vec(),
            mass_bins,
            mass_min: center - window,
            mass_max: center + window,
        }
    }

    /// Fresh zeroed accumulator named `name`.
    pub fn accumulator(&self, name: &str) -> Result<Histogram3D> {
        Ok(Histogram3D::new(
            name,
            Axis::variable(self.centrality.clone())?,
            Axis::variable(self.pt.clone())?,
            Axis::uniform(self.mass_bins, self.mass_min, self.mass_max)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_axes() {
        let b = ResultBinning::around(&[0.0, 10.0], &[0.0, 1.0, 2.0], 100, 0.497, 0.075);
        let h = b.accumulator("K0Short_Central").unwrap();
        assert_eq!(h.name, "K0Short_Central");
        assert_eq!(h.x_axis().n_bins(), 1);
        assert_eq!(h.y_axis().n_bins(), 2);
        assert_eq!(h.z_axis().n_bins(), 100);
        assert!((h.z_axis().min() - 0.422).abs() < 1e-12);
    }

    #[test]
    fn invalid_binning_is_an_error() {
        let b = ResultBinning::around(&[10.0, 0.0], &[0.0, 1.0], 10, 1.0, 0.1);
        assert!(b.accumulator("bad").is_err());
        let b = ResultBinning::around(&[0.0, 10.0], &[0.0, 1.0], 0, 1.0, 0.1);
        assert!(b.accumulator("bad").is_err());
    }
}
