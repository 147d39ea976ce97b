//! Mirror extension of a one-sided distribution.

use sy_hist::Histogram1D;

/// Reflect `h` onto the negated axis `[−xmax, −xmin]`, named `{name}_mirror`.
///
/// The reflection starts from the first and last non-empty bins of `h` and
/// carries errors along. One extra bin past the reflected range receives the
/// first non-empty bin again, so the two halves overlap by one bin. An input
/// without positive content yields an empty mirror.
pub fn symmetrize(h: &Histogram1D) -> Histogram1D {
    let axis = h.axis().mirrored();
    let mut s = Histogram1D::new(format!("{}_mirror", h.name), axis)
        .with_title(format!("{} (mirrored)", h.title));

    let n = h.n_bins();
    let filled: Vec<usize> = (1..=n).filter(|&i| h.bin_content(i) > 0.0).collect();
    let (Some(&first), Some(&last)) = (filled.first(), filled.last()) else {
        log::warn!("'{}' has no content to mirror", h.name);
        return s;
    };

    let xfirst = h.axis().bin_center(first - 1);
    let f1 = h.axis().find_bin(-xfirst);
    let l2 = s.axis().find_bin(xfirst);

    let mut j = l2 as isize;
    for i in f1..=last {
        if let Ok(target) = usize::try_from(j) {
            s.set_bin_content(target, h.bin_content(i));
            s.set_bin_error(target, h.bin_error(i));
        }
        j -= 1;
    }
    s.set_bin_content(l2 + 1, h.bin_content(first));
    s.set_bin_error(l2 + 1, h.bin_error(first));
    s
}
