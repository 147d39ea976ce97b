//! Builders that derive configurations from a base by overriding one field.
//!
//! A derived configuration is a deep copy of its base. The accumulator is
//! not part of the configuration: it is created fresh when the derived
//! configuration is added to a [`Registry`](crate::Registry).

use crate::registry::Selection;

/// Copy `base` under `new_name` and apply `mutator` to the copy.
pub fn derive_with_override<C: Selection>(
    base: &C,
    new_name: impl Into<String>,
    mutator: impl FnOnce(&mut C),
) -> C {
    let mut derived = base.clone();
    derived.set_name(new_name.into());
    mutator(&mut derived);
    derived
}

/// `n` values `min + (max − min)·(i + 1)/n`, i.e. excluding `min`, ending at `max`.
pub fn linear_steps(min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| min + (max - min) * (i + 1) as f64 / n as f64).collect()
}

/// `n` cosine values equally spaced in angle between `acos(min_cos)/n` and `acos(min_cos)`.
pub fn angular_steps(min_cos: f64, n: usize) -> Vec<f64> {
    let delta = min_cos.acos() / n as f64;
    (0..n).map(|i| ((i + 1) as f64 * delta).cos()).collect()
}

/// One derived configuration per value, named `{particle}_{label}Sweep_{i}`.
pub fn sweep<C: Selection>(
    base: &C,
    particle: &str,
    label: &str,
    values: &[f64],
    setter: impl Fn(&mut C, f64),
) -> Vec<C> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            derive_with_override(base, format!("{particle}_{label}Sweep_{i}"), |c| setter(c, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResultBinning, V0Config, V0Hypothesis};
    use approx::assert_relative_eq;

    #[test]
    fn linear_grid() {
        let v = linear_steps(2.0, 20.0, 4);
        assert_eq!(v.len(), 4);
        assert_relative_eq!(v[0], 6.5);
        assert_relative_eq!(v[3], 20.0);
        assert!(linear_steps(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn angular_grid() {
        let v = angular_steps(0.98, 5);
        assert_relative_eq!(v[4], 0.98, epsilon = 1e-12);
        assert!(v.windows(2).all(|w| w[0] > w[1]));
        assert_relative_eq!(v[0], (0.98_f64.acos() / 5.0).cos());
    }

    #[test]
    fn sweep_names_and_values() {
        let base = V0Config::new("K0Short_Central", V0Hypothesis::K0Short, ResultBinning::default());
        let derived = sweep(&base, "K0Short", "DCANegToPV", &[0.1, 0.2], |c, v| c.dca_neg_to_pv = v);
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[1].name, "K0Short_DCANegToPVSweep_1");
        assert_eq!(derived[1].dca_neg_to_pv, 0.2);
        assert_eq!(base.dca_neg_to_pv, V0Config::default().dca_neg_to_pv);
        // Only the swept field differs.
        let mut expected = base.clone();
        expected.name = derived[0].name.clone();
        expected.dca_neg_to_pv = 0.1;
        assert_eq!(derived[0], expected);
    }
}
