//! Projection of a (x × vertex-bin) sum onto its x axis.

use serde::{Deserialize, Serialize};
use sy_hist::{Histogram1D, Histogram2D};

/// Contents and errors below this are treated as zero.
const TINY: f64 = 1e-12;

/// How a non-empty cell with (near) zero error enters a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroErrorPolicy {
    /// The cell is left out.
    #[default]
    SkipZeroError,
    /// The cell contributes with error 1.
    UnitError,
}

/// Range and options of one projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// First y cell (0 is the underflow).
    pub first: usize,
    /// Last y cell, `None` for the last in-range bin.
    pub last: Option<usize>,
    /// Scale each x bin by `(cells in range) / (cells used)`.
    pub correct_empty: bool,
    /// Zero-error handling.
    pub zero_error: ZeroErrorPolicy,
}

impl Projection {
    /// Sum y cells `first..=last` of `h` for every x cell, including flow cells.
    ///
    /// Cells with content below 1e-12 are ignored; errors add in quadrature.
    /// An x bin is set only if at least one cell contributed a positive sum.
    /// Returns `None` with a warning when the clamped range is empty or no
    /// cell in it contributed.
    pub fn project(&self, h: &Histogram2D, name: impl Into<String>) -> Option<Histogram1D> {
        let ny = h.y_axis().n_bins();
        let first = self.first.min(ny);
        let last = match self.last {
            Some(l) if l <= ny + 1 => l,
            _ => ny,
        };
        if last < first {
            log::warn!("nothing to project from '{}': [{first}, {last}]", h.name);
            return None;
        }

        let mut out = Histogram1D::new(name, h.x_axis().clone()).with_title(h.title.clone());
        let cells = (last - first + 1) as f64;
        let mut filled = false;
        for ix in 0..=h.x_axis().n_bins() + 1 {
            let mut content = 0.0;
            let mut error2 = 0.0;
            let mut used = 0usize;
            for iy in first..=last {
                let c = h.cell_content(ix, iy);
                if c < TINY {
                    continue;
                }
                let mut e = h.cell_error(ix, iy);
                if e < TINY {
                    match self.zero_error {
                        ZeroErrorPolicy::SkipZeroError => continue,
                        ZeroErrorPolicy::UnitError => e = 1.0,
                    }
                }
                content += c;
                error2 += e * e;
                used += 1;
            }
            if content > 0.0 && used > 0 {
                let factor = if self.correct_empty { cells / used as f64 } else { 1.0 };
                out.set_bin_content(ix, content * factor);
                out.set_bin_error(ix, factor * error2.sqrt());
                filled = true;
            }
        }
        if !filled {
            log::warn!("no contributing cells in '{}' for y cells [{first}, {last}]", h.name);
            return None;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sy_hist::Axis;

    fn sum() -> Histogram2D {
        // 2 eta bins × 4 vertex bins.
        let mut h = Histogram2D::new(
            "sum",
            Axis::uniform(2, -1.0, 1.0).unwrap(),
            Axis::uniform(4, -10.0, 10.0).unwrap(),
        );
        h.set_cell(1, 0, 4.0, 0.0);
        h.set_cell(1, 1, 2.0, 1.0);
        h.set_cell(1, 2, 3.0, 2.0);
        h.set_cell(1, 3, 1e-13, 1.0);
        h.set_cell(2, 1, 6.0, 0.0);
        h
    }

    fn projection(first: usize, last: Option<usize>, zero_error: ZeroErrorPolicy) -> Projection {
        Projection { first, last, correct_empty: false, zero_error }
    }

    #[test]
    fn skip_zero_error_drops_cells() {
        let p = projection(0, Some(1), ZeroErrorPolicy::SkipZeroError)
            .project(&sum(), "norm")
            .unwrap();
        assert_eq!(p.bin_content(1), 2.0);
        assert_eq!(p.bin_error(1), 1.0);
        assert_eq!(p.bin_content(2), 0.0);
    }

    #[test]
    fn unit_error_keeps_cells() {
        let p = projection(1, None, ZeroErrorPolicy::UnitError).project(&sum(), "raw").unwrap();
        assert_eq!(p.bin_content(1), 5.0);
        assert_relative_eq!(p.bin_error(1), 5.0_f64.sqrt());
        assert_eq!(p.bin_content(2), 6.0);
        assert_eq!(p.bin_error(2), 1.0);
    }

    #[test]
    fn empty_correction_scales_by_used_fraction() {
        let mut p = projection(1, Some(4), ZeroErrorPolicy::UnitError);
        p.correct_empty = true;
        let h = p.project(&sum(), "raw").unwrap();
        // Two of four cells contribute in the first eta bin.
        assert_relative_eq!(h.bin_content(1), 10.0);
        assert_relative_eq!(h.bin_error(1), 2.0 * 5.0_f64.sqrt());
    }

    #[test]
    fn range_is_clamped() {
        let h = sum();
        // first clamps to ny = 4; the overflow row is empty too.
        let p = projection(9, Some(5), ZeroErrorPolicy::UnitError).project(&h, "x");
        assert!(p.is_none());
        assert!(projection(3, Some(2), ZeroErrorPolicy::UnitError).project(&h, "x").is_none());
    }

    #[test]
    fn empty_sum_projects_to_nothing() {
        let empty = Histogram2D::new(
            "empty",
            Axis::uniform(3, 0.0, 3.0).unwrap(),
            Axis::uniform(2, -10.0, 10.0).unwrap(),
        );
        for zero_error in [ZeroErrorPolicy::SkipZeroError, ZeroErrorPolicy::UnitError] {
            assert!(projection(1, None, zero_error).project(&empty, "x").is_none());
        }
        // Cells with zero error only count under the unit-error policy.
        let mut h = empty.clone();
        h.set_cell(2, 0, 3.0, 0.0);
        assert!(projection(0, Some(1), ZeroErrorPolicy::SkipZeroError).project(&h, "x").is_none());
        let p = projection(0, Some(1), ZeroErrorPolicy::UnitError).project(&h, "x").unwrap();
        assert_eq!(p.bin_content(2), 3.0);
    }
}
