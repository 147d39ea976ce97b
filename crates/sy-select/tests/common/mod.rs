//! Random candidate generators shared by the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sy_select::candidate::{ITS_REFIT, TPC_REFIT};
use sy_select::{CascadeCandidate, DaughterTrack, NSigma, V0Candidate};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn nsigma(rng: &mut StdRng) -> NSigma {
    NSigma {
        pion: rng.random_range(-5.0..5.0),
        kaon: rng.random_range(-5.0..5.0),
        proton: rng.random_range(-5.0..5.0),
    }
}

pub fn track(rng: &mut StdRng, index: u64, charge: i8) -> DaughterTrack {
    DaughterTrack {
        index: Some(index),
        charge,
        status: TPC_REFIT | if rng.random_bool(0.8) { ITS_REFIT } else { 0 },
        tpc_clusters: rng.random_range(70.0..160.0),
        tpc_findable_clusters: 160.0,
        length_in_active_zone: Some(rng.random_range(80.0..200.0)),
        is_kink: false,
        eta: rng.random_range(-0.9..0.9),
        inner_p: rng.random_range(0.2..5.0),
        inner_pt: rng.random_range(0.2..5.0),
        tpc: nsigma(rng),
        tof: nsigma(rng),
        dca_sigma_x2: 0.01,
        dca_sigma_y2: 0.01,
    }
}

pub fn v0(rng: &mut StdRng) -> V0Candidate {
    let pt = rng.random_range(0.1..14.0);
    V0Candidate {
        on_the_fly: false,
        pt,
        total_momentum: pt * rng.random_range(1.0..1.5),
        decay_length: rng.random_range(0.0..60.0),
        pos: track(rng, 1, 1),
        neg: track(rng, 2, -1),
        rap_k0short: rng.random_range(-0.7..0.7),
        rap_lambda: rng.random_range(-0.7..0.7),
        mass_k0short: rng.random_range(0.42..0.57),
        mass_lambda: rng.random_range(1.07..1.16),
        mass_antilambda: rng.random_range(1.07..1.16),
        radius: rng.random_range(0.0..40.0),
        dca_neg_to_pv: rng.random_range(0.0..25.0),
        dca_pos_to_pv: rng.random_range(0.0..25.0),
        dca_daughters: rng.random_range(0.0..1.5),
        cos_pa: rng.random_range(0.97..1.0),
        pt_arm: rng.random_range(0.0..0.25),
        alpha_arm: rng.random_range(-1.0..1.0),
        max_chi2_per_cluster: rng.random_range(0.5..5.0),
    }
}

pub fn cascade(rng: &mut StdRng) -> CascadeCandidate {
    let charge: i8 = if rng.random_bool(0.5) { -1 } else { 1 };
    let pt = rng.random_range(0.4..12.0);
    let v0_pt = pt * rng.random_range(0.5..0.95);
    CascadeCandidate {
        charge,
        pt,
        total_momentum: pt * rng.random_range(1.0..1.5),
        decay_length: rng.random_range(0.0..40.0),
        v0_pt,
        v0_total_momentum: v0_pt * rng.random_range(1.0..1.5),
        pos: track(rng, 1, 1),
        neg: track(rng, 2, -1),
        bach: track(rng, 3, charge),
        rap_xi: rng.random_range(-0.7..0.7),
        rap_omega: rng.random_range(-0.7..0.7),
        mass_xi: rng.random_range(1.27..1.37),
        mass_omega: rng.random_range(1.62..1.72),
        v0_mass_lambda: rng.random_range(1.105..1.127),
        v0_mass_antilambda: rng.random_range(1.105..1.127),
        dca_neg_to_pv: rng.random_range(0.0..2.0),
        dca_pos_to_pv: rng.random_range(0.0..2.0),
        dca_bach_to_pv: rng.random_range(0.0..0.7),
        dca_v0_daughters: rng.random_range(0.0..1.6),
        dca_v0_to_pv: rng.random_range(0.0..0.7),
        dca_casc_daughters: rng.random_range(0.0..1.6),
        dca_bach_to_baryon: rng.random_range(0.0..1.0),
        v0_cos_pa: rng.random_range(0.94..1.0),
        casc_cos_pa: rng.random_range(0.94..1.0),
        bach_baryon_cos_pa: rng.random_range(0.99..1.0),
        v0_radius: rng.random_range(0.0..25.0),
        casc_radius: rng.random_range(0.0..8.0),
        v0_lifetime: rng.random_range(0.0..45.0),
        max_chi2_per_cluster: rng.random_range(0.5..5.0),
        casc_dca_to_pv_xy: rng.random_range(0.0..0.5),
        casc_dca_to_pv_z: rng.random_range(0.0..0.5),
    }
}
