//! Inverse-variance rebinning.

use sy_hist::Histogram1D;

/// Merge every `factor` adjacent bins of `h` into one.
///
/// The merged content is the inverse-variance weighted mean of the
/// contributing bins with error `1/sqrt(Σ 1/e²)`. Bins with non-positive
/// content or error do not contribute. With `cut_edges`, a bin whose left or
/// right neighbour is empty is dropped too. A merged bin with no contributor
/// keeps the plain sum of its bins.
///
/// Returns `None` for `factor <= 1`, and with a warning when `factor` does
/// not divide the number of bins. The result is named `{name}_rebin{factor:02}`.
pub fn rebin(h: &Histogram1D, factor: usize, cut_edges: bool) -> Option<Histogram1D> {
    if factor <= 1 {
        return None;
    }
    let n = h.n_bins();
    let axis = match h.axis().rebinned(factor) {
        Ok(axis) => axis,
        Err(e) => {
            log::warn!("cannot rebin '{}': {e}", h.name);
            return None;
        }
    };

    let mut out = Histogram1D::new(format!("{}_rebin{factor:02}", h.name), axis)
        .with_title(h.title.clone());
    for i in 1..=n / factor {
        let bins = (i - 1) * factor + 1..=i * factor;

        let mut sum = 0.0;
        let mut sum_err2 = 0.0;
        for bin in bins.clone() {
            sum += h.bin_content(bin);
            sum_err2 += h.bin_error(bin).powi(2);
        }
        out.set_bin_content(i, sum);
        out.set_bin_error(i, sum_err2.sqrt());

        let mut content = 0.0;
        let mut sumw = 0.0;
        let mut wsum = 0.0;
        let mut used = 0usize;
        for bin in bins {
            let c = h.bin_content(bin);
            let e = h.bin_error(bin);
            if c <= 0.0 || e <= 0.0 {
                continue;
            }
            if cut_edges && (h.bin_content(bin + 1) <= 0.0 || h.bin_content(bin - 1) <= 0.0) {
                log::warn!(
                    "removing edge bin {bin}={c} of '{}' ({}={}, {}={})",
                    h.name,
                    bin + 1,
                    h.bin_content(bin + 1),
                    bin - 1,
                    h.bin_content(bin - 1)
                );
                continue;
            }
            let w = 1.0 / (e * e);
            content += c;
            sumw += w;
            wsum += w * c;
            used += 1;
        }
        if content > 0.0 && used > 0 {
            out.set_bin_content(i, wsum / sumw);
            out.set_bin_error(i, 1.0 / sumw.sqrt());
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sy_hist::Axis;

    fn hist(contents: &[f64], errors: &[f64]) -> Histogram1D {
        let mut h =
            Histogram1D::new("dndeta", Axis::uniform(contents.len(), 0.0, contents.len() as f64).unwrap());
        for (i, (&c, &e)) in contents.iter().zip(errors).enumerate() {
            h.set_bin_content(i + 1, c);
            h.set_bin_error(i + 1, e);
        }
        h
    }

    #[test]
    fn disabled_or_invalid_factor() {
        let h = hist(&[1.0; 6], &[1.0; 6]);
        assert!(rebin(&h, 1, false).is_none());
        assert!(rebin(&h, 0, false).is_none());
        assert!(rebin(&h, 4, false).is_none());
    }

    #[test]
    fn weighted_mean() {
        let h = hist(&[2.0, 4.0, 1.0, 1.0], &[1.0, 2.0, 1.0, 1.0]);
        let r = rebin(&h, 2, false).unwrap();
        assert_eq!(r.name, "dndeta_rebin02");
        assert_eq!(r.n_bins(), 2);
        // w = 1, 1/4 -> (2 + 1) / 1.25
        assert_relative_eq!(r.bin_content(1), 3.0 / 1.25);
        assert_relative_eq!(r.bin_error(1), 1.0 / 1.25_f64.sqrt());
        assert_relative_eq!(r.bin_content(2), 1.0);
    }

    #[test]
    fn equal_errors_preserve_the_integral() {
        let contents = [3.0, 5.0, 2.0, 8.0, 1.0, 4.0];
        let h = hist(&contents, &[0.5; 6]);
        let r = rebin(&h, 3, false).unwrap();
        let before: f64 = (1..=6).map(|i| h.bin_content(i) * h.axis().bin_width(i)).sum();
        let after: f64 = (1..=2).map(|i| r.bin_content(i) * r.axis().bin_width(i)).sum();
        assert_relative_eq!(before, after, epsilon = 1e-12);
    }

    #[test]
    fn edge_bins_are_excluded() {
        let h = hist(&[0.0, 10.0, 2.0, 2.0, 2.0, 0.0], &[1.0; 6]);
        let plain = rebin(&h, 3, false).unwrap();
        let cut = rebin(&h, 3, true).unwrap();
        assert_relative_eq!(plain.bin_content(1), 6.0);
        // Bin 2 borders an empty bin 1, only bin 3 is kept.
        assert_relative_eq!(cut.bin_content(1), 2.0);
        assert_relative_eq!(cut.bin_content(2), 2.0);
    }

    #[test]
    fn empty_groups_keep_their_sum() {
        let h = hist(&[0.0, 0.0, 1.0, 1.0], &[0.0, 0.0, 1.0, 1.0]);
        let r = rebin(&h, 2, false).unwrap();
        assert_eq!(r.bin_content(1), 0.0);
        assert_eq!(r.bin_error(1), 0.0);
    }
}
