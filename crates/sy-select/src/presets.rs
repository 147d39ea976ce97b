//! Stock configuration sets.
//!
//! - [`topological_qa_v0`]: central K0S/Λ/anti-Λ selections plus one sweep per
//!   topological variable.
//! - [`topological_qa_cascade`]: vertexer-level Ξ±/Ω± selections plus thirteen
//!   single-variable sweeps.
//! - [`cascade_276tev`]: the 2.76 TeV cascade selection, its |y| < 0.3
//!   variant and twelve rapidity slices per species.

use crate::binning::ResultBinning;
use crate::cascade::CascadeConfig;
use crate::cuts::{ExpCurve, VariableCut};
use crate::hypothesis::{CascadeHypothesis, V0Hypothesis};
use crate::sweep::{angular_steps, linear_steps, sweep};
use crate::v0::V0Config;

const V0_PT_EDGES: [f64; 39] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8,
    1.9, 2.0, 2.2, 2.4, 2.6, 2.8, 3.0, 3.2, 3.4, 3.6, 3.8, 4.0, 4.5, 5.0, 5.5, 6.5, 8.0, 10.0, 12.0,
    15.0,
];

const CASCADE_PT_EDGES: [f64; 45] = [
    0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0, 2.1, 2.2,
    2.3, 2.4, 2.5, 2.6, 2.7, 2.8, 3.0, 3.2, 3.4, 3.6, 3.8, 4.0, 4.2, 4.4, 4.6, 4.8, 5.0, 5.5, 6.0,
    6.5, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
];

const QA_CENTRALITY_EDGES: [f64; 2] = [0.0, 10.0];

const CENTRALITY_EDGES_276TEV: [f64; 11] =
    [0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];

const QA_MASS_BINS: usize = 100;

/// Centre of the mass window per hypothesis.
fn v0_mass_window(h: V0Hypothesis) -> (f64, f64) {
    match h {
        V0Hypothesis::K0Short => (0.497, 0.075),
        V0Hypothesis::Lambda | V0Hypothesis::AntiLambda => (1.116, 0.050),
    }
}

fn cascade_mass_center(h: CascadeHypothesis) -> f64 {
    if h.is_omega() { 1.672 } else { 1.322 }
}

/// Central V0 selections followed by five single-variable sweeps of `steps` points each.
pub fn topological_qa_v0(steps: usize) -> Vec<V0Config> {
    let centrals: Vec<V0Config> = V0Hypothesis::ALL
        .iter()
        .map(|&h| {
            let (mass, window) = v0_mass_window(h);
            let binning =
                ResultBinning::around(&QA_CENTRALITY_EDGES, &V0_PT_EDGES, QA_MASS_BINS, mass, window);
            let mut c = V0Config::new(format!("{}_Central", h.particle()), h, binning);
            c.dca_neg_to_pv = 0.05;
            c.dca_pos_to_pv = 0.05;
            c.dca_v0_daughters = 1.2;
            c.v0_cos_pa = VariableCut::constant(0.98);
            c.v0_radius = 0.9;
            c.proper_lifetime = if h == V0Hypothesis::K0Short { 20.0 } else { 30.0 };
            c.least_crossed_rows = 70.0;
            c.least_crossed_rows_over_findable = 0.8;
            c.tpc_dedx = 4.0;
            c
        })
        .collect();

    type Setter = fn(&mut V0Config, f64);
    let sweeps: [(&str, Vec<f64>, Setter); 5] = [
        ("DCANegToPV", linear_steps(0.0, 20.0, steps), |c, v| c.dca_neg_to_pv = v),
        ("DCAPosToPV", linear_steps(0.0, 20.0, steps), |c, v| c.dca_pos_to_pv = v),
        ("DCAV0Daughters", linear_steps(0.0, 1.2, steps), |c, v| c.dca_v0_daughters = v),
        ("V0CosPA", angular_steps(0.98, steps), |c, v| c.v0_cos_pa.value = v),
        ("V0Radius", linear_steps(2.0, 20.0, steps), |c, v| c.v0_radius = v),
    ];

    let mut out = centrals.clone();
    for (label, values, setter) in &sweeps {
        for base in &centrals {
            out.extend(sweep(base, base.hypothesis.particle(), label, values, setter));
        }
    }
    log::debug!("topological QA: {} V0 configurations", out.len());
    out
}

/// Vertexer-level cascade selections followed by thirteen single-variable sweeps.
///
/// Pointing-angle sweeps switch the parametric curve of the swept cut off.
/// The lifetime sweeps use fixed grids of 15 and 32 points.
pub fn topological_qa_cascade(steps: usize) -> Vec<CascadeConfig> {
    let centrals: Vec<CascadeConfig> = CascadeHypothesis::ALL
        .iter()
        .map(|&h| {
            let binning = ResultBinning::around(
                &QA_CENTRALITY_EDGES,
                &CASCADE_PT_EDGES,
                QA_MASS_BINS,
                cascade_mass_center(h),
                0.050,
            );
            let mut c = CascadeConfig::new(format!("{}_VertexerLevel", h.particle()), h, binning);
            c.dca_neg_to_pv = 0.2;
            c.dca_pos_to_pv = 0.2;
            c.dca_v0_daughters = 1.0;
            c.v0_cos_pa = VariableCut::with_curve(
                0.95,
                ExpCurve::new(10.853_f64.exp(), -25.0322, (-0.843948_f64).exp(), -0.890794, 0.057553),
            );
            c.v0_radius = 3.0;
            c.dca_v0_to_pv = 0.1;
            c.v0_mass = 0.006;
            c.dca_bach_to_pv = 0.1;
            c.dca_casc_daughters = VariableCut::constant(1.0);
            c.casc_radius = if h.is_omega() { 1.0 } else { 1.2 };
            c.casc_cos_pa = VariableCut::with_curve(
                0.95,
                ExpCurve::new(4.86664_f64.exp(), -10.786, (-1.33411_f64).exp(), -0.729825, 0.0695724),
            );
            c.proper_lifetime = if h.is_omega() { 12.0 } else { 15.0 };
            c.least_clusters = 70.0;
            c.tpc_dedx = 4.0;
            c.xi_rejection = 0.008;
            c.bach_baryon_cos_pa = VariableCut::with_curve(
                0.04_f64.cos(),
                ExpCurve::new(
                    (-2.29048_f64).exp(),
                    -20.2016,
                    (-2.9581_f64).exp(),
                    -0.649153,
                    0.00526455,
                ),
            );
            c
        })
        .collect();

    type Setter = fn(&mut CascadeConfig, f64);
    let sweeps: [(&str, Vec<f64>, Setter); 13] = [
        ("DCANegToPV", linear_steps(0.0, 1.5, steps), |c, v| c.dca_neg_to_pv = v),
        ("DCAPosToPV", linear_steps(0.0, 1.5, steps), |c, v| c.dca_pos_to_pv = v),
        ("DCAV0Daughters", linear_steps(0.0, 1.4, steps), |c, v| c.dca_v0_daughters = v),
        ("V0CosPA", angular_steps(0.95, steps), |c, v| c.v0_cos_pa = VariableCut::constant(v)),
        ("V0Radius", linear_steps(0.0, 20.0, steps), |c, v| c.v0_radius = v),
        ("DCAV0ToPV", linear_steps(0.0, 0.5, steps), |c, v| c.dca_v0_to_pv = v),
        ("DCABachToPV", linear_steps(0.0, 0.5, steps), |c, v| c.dca_bach_to_pv = v),
        ("DCACascDaughters", linear_steps(0.0, 1.4, steps), |c, v| {
            c.dca_casc_daughters.value = v
        }),
        ("CascRadius", linear_steps(0.5, 7.0, steps), |c, v| c.casc_radius = v),
        ("CascCosPA", angular_steps(0.95, steps), |c, v| c.casc_cos_pa = VariableCut::constant(v)),
        ("BBCosPA", angular_steps(0.1_f64.cos(), steps), |c, v| {
            c.bach_baryon_cos_pa = VariableCut::constant(v)
        }),
        ("CascLifetime", linear_steps(5.0, 20.0, 15), |c, v| c.proper_lifetime = v),
        ("MaxV0Lifetime", linear_steps(8.0, 40.0, 32), |c, v| c.max_v0_lifetime = Some(v)),
    ];

    let mut out = centrals.clone();
    for (label, values, setter) in &sweeps {
        for base in &centrals {
            out.extend(sweep(base, base.hypothesis.particle(), label, values, setter));
        }
    }
    log::debug!("topological QA: {} cascade configurations", out.len());
    out
}

/// 2.76 TeV cascade selections: 4 central, 4 with |y| < 0.3, 48 rapidity slices.
pub fn cascade_276tev() -> Vec<CascadeConfig> {
    let centrals: Vec<CascadeConfig> = CascadeHypothesis::ALL
        .iter()
        .map(|&h| {
            let binning = ResultBinning::around(
                &CENTRALITY_EDGES_276TEV,
                &CASCADE_PT_EDGES,
                200,
                cascade_mass_center(h),
                0.1,
            );
            let mut c = CascadeConfig::new(format!("{}_276TeV", h.particle()), h, binning);
            c.dca_neg_to_pv = 0.1;
            c.dca_pos_to_pv = 0.1;
            c.dca_v0_daughters = 0.8;
            c.v0_cos_pa = VariableCut::constant(0.95);
            c.use_276tev_v0_cos_pa = true;
            c.v0_radius = 3.0;
            c.dca_v0_to_pv = 0.1;
            c.v0_mass = 0.005;
            c.dca_bach_to_pv = 0.03;
            c.dca_casc_daughters = VariableCut::constant(0.3);
            c.casc_radius = if h.is_omega() { 1.0 } else { 1.5 };
            c.casc_cos_pa = VariableCut::constant(0.9992);
            c.proper_lifetime = if h.is_omega() { 8.0 } else { 15.0 };
            c.least_clusters = 70.0;
            c.tpc_dedx = 4.0;
            c.xi_rejection = 0.008;
            c.dca_bach_to_baryon = 0.0;
            c
        })
        .collect();

    let mut out = centrals.clone();
    for base in &centrals {
        let mut c = base.clone();
        c.name = format!("{}_y03", base.name);
        c.min_rapidity = -0.3;
        c.max_rapidity = 0.3;
        out.push(c);
    }
    for base in &centrals {
        for k in 0..12 {
            let lo = (k as f64 - 6.0) / 10.0;
            let hi = (k as f64 - 5.0) / 10.0;
            let mut c = base.clone();
            c.name = format!("{}_276TeVRapiditySweep_{lo:.1}_{hi:.1}", base.hypothesis.particle());
            c.min_rapidity = lo;
            c.max_rapidity = hi;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn v0_qa_layout() {
        let configs = topological_qa_v0(10);
        assert_eq!(configs.len(), 3 + 5 * 3 * 10);
        assert_eq!(configs[0].name, "K0Short_Central");
        assert_eq!(configs[2].name, "AntiLambda_Central");
        assert_eq!(configs[3].name, "K0Short_DCANegToPVSweep_0");
        assert_eq!(configs[13].name, "Lambda_DCANegToPVSweep_0");
        let last = configs.last().unwrap();
        assert_eq!(last.name, "AntiLambda_V0RadiusSweep_9");
        assert_eq!(last.v0_radius, 20.0);
        assert_eq!(last.proper_lifetime, 30.0);
        assert_eq!(configs[0].binning.mass_min, 0.497 - 0.075);
    }

    #[test]
    fn cascade_qa_layout() {
        let steps = 4;
        let configs = topological_qa_cascade(steps);
        assert_eq!(configs.len(), 4 + 4 * (11 * steps + 15 + 32));
        assert_eq!(configs[3].name, "OmegaPlus_VertexerLevel");
        assert_eq!(configs[3].casc_radius, 1.0);

        let mut registry = Registry::new();
        registry.extend(configs).unwrap();
        let v0_cos = registry.find("XiPlus_V0CosPASweep_3").unwrap();
        assert!(v0_cos.v0_cos_pa.curve.is_none());
        assert!((v0_cos.v0_cos_pa.value - 0.95).abs() < 1e-9);
        // Other curves stay on.
        assert!(v0_cos.casc_cos_pa.curve.is_some());
        let lifetime = registry.find("OmegaMinus_MaxV0LifetimeSweep_31").unwrap();
        assert_eq!(lifetime.max_v0_lifetime, Some(40.0));
        let bb = registry.find("XiMinus_BBCosPASweep_0").unwrap();
        assert!(bb.bach_baryon_cos_pa.curve.is_none());
    }

    #[test]
    fn cascade_276tev_layout() {
        let configs = cascade_276tev();
        assert_eq!(configs.len(), 4 + 4 + 48);
        assert_eq!(configs[4].name, "XiMinus_276TeV_y03");
        assert_eq!(configs[8].name, "XiMinus_276TeVRapiditySweep_-0.6_-0.5");
        assert_eq!(configs[14].name, "XiMinus_276TeVRapiditySweep_0.0_0.1");
        assert_eq!(configs[19].name, "XiMinus_276TeVRapiditySweep_0.5_0.6");
        let omega = &configs[2];
        assert_eq!(omega.proper_lifetime, 8.0);
        assert_eq!(omega.casc_radius, 1.0);
        assert!(omega.use_276tev_v0_cos_pa);
    }

    #[test]
    fn registry_accepts_every_preset() {
        let mut r = Registry::new();
        r.extend(cascade_276tev()).unwrap();
        r.extend(topological_qa_cascade(2)).unwrap();
        assert_eq!(r.len(), 56 + 4 + 4 * (22 + 47));
    }
}
