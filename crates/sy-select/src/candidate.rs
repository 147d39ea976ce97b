//! Reconstructed decay candidates (flat attribute records).
//!
//! Candidates are built upstream by the reconstruction layer, handed to the
//! engine once, and dropped. Everything the cut predicates need is either a
//! plain field or derived here from the daughter tracks.

use serde::{Deserialize, Serialize};

use crate::hypothesis::Species;

/// Track status bit: TPC refit succeeded.
pub const TPC_REFIT: u64 = 0x40;
/// Track status bit: ITS refit succeeded.
pub const ITS_REFIT: u64 = 0x4;

/// Crossed rows below which a daughter is considered short.
const MIN_CROSSED_ROWS: f64 = 70.0;
/// Track length (cm) below which a short daughter is dropped.
const MIN_LENGTH_FOR_SHORT_TRACKS: f64 = 80.0;
/// Starting value of the smallest-track-length search.
const TRACK_LENGTH_CEILING: f64 = 1000.0;

/// Why a candidate was skipped before any configuration was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A daughter track could not be resolved.
    #[error("unresolved daughter track")]
    UnresolvedTrack,
    /// Both V0 daughters carry the same charge.
    #[error("like-sign V0 daughters")]
    LikeSign,
    /// The bachelor shares its track with a V0 daughter.
    #[error("bachelor shares a track with a V0 daughter")]
    SharedBachelor,
    /// A daughter has no TPC refit.
    #[error("daughter without TPC refit")]
    NoTpcRefit,
    /// A V0 daughter is a kink daughter.
    #[error("kink daughter")]
    Kink,
    /// A daughter has no findable TPC clusters.
    #[error("daughter without findable clusters")]
    NoFindableClusters,
    /// Too few crossed rows on a short track.
    #[error("too few crossed rows on a short track")]
    PoorTrackQuality,
}

/// Something the engine can evaluate configurations against.
pub trait Candidate {
    /// Transverse momentum used both for filling and for parametric cuts.
    fn pt(&self) -> f64;

    /// Candidate-wide checks that skip every configuration at once.
    fn prescreen(&self) -> Result<(), SkipReason>;
}

/// PID response of one track under each species hypothesis, in sigmas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NSigma {
    /// Pion hypothesis.
    pub pion: f64,
    /// Kaon hypothesis.
    pub kaon: f64,
    /// Proton hypothesis.
    pub proton: f64,
}

impl NSigma {
    /// Response under `species`.
    pub fn get(&self, species: Species) -> f64 {
        match species {
            Species::Pion => self.pion,
            Species::Kaon => self.kaon,
            Species::Proton => self.proton,
        }
    }
}

/// One daughter track of a decay candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaughterTrack {
    /// Track index in the event (`None` when resolution failed).
    pub index: Option<u64>,
    /// Electric charge sign.
    pub charge: i8,
    /// Status bit flags (see [`TPC_REFIT`], [`ITS_REFIT`]).
    pub status: u64,
    /// TPC crossed rows (or clusters for cascade daughters).
    pub tpc_clusters: f64,
    /// Findable TPC clusters.
    pub tpc_findable_clusters: f64,
    /// Length in the active TPC volume, if the inner parameters exist.
    pub length_in_active_zone: Option<f64>,
    /// Track is a kink daughter.
    pub is_kink: bool,
    /// Pseudorapidity.
    pub eta: f64,
    /// Momentum at the inner TPC wall.
    pub inner_p: f64,
    /// Transverse momentum at the inner TPC wall.
    pub inner_pt: f64,
    /// TPC dE/dx response.
    pub tpc: NSigma,
    /// TOF response.
    pub tof: NSigma,
    /// DCA-to-PV covariance term (x).
    pub dca_sigma_x2: f64,
    /// DCA-to-PV covariance term (y).
    pub dca_sigma_y2: f64,
}

impl DaughterTrack {
    /// Track has TPC refit.
    pub fn has_tpc_refit(&self) -> bool {
        self.status & TPC_REFIT != 0
    }

    /// Track has ITS refit.
    pub fn has_its_refit(&self) -> bool {
        self.status & ITS_REFIT != 0
    }

    /// Active-zone length, `-1` when unknown.
    pub fn track_length(&self) -> f64 {
        self.length_in_active_zone.unwrap_or(-1.0)
    }

    /// `dca / sqrt(sx2² + sy2² + 1e-6)`.
    pub fn weighted_dca(&self, dca: f64) -> f64 {
        let sx = self.dca_sigma_x2;
        let sy = self.dca_sigma_y2;
        dca / (sx * sx + sy * sy + 1e-6).sqrt()
    }

    fn crossed_rows_over_findable(&self) -> f64 {
        if self.tpc_findable_clusters > 0.0 {
            self.tpc_clusters / self.tpc_findable_clusters
        } else {
            0.0
        }
    }
}

fn smallest_track_length<'a>(tracks: impl IntoIterator<Item = &'a DaughterTrack>) -> f64 {
    tracks.into_iter().map(DaughterTrack::track_length).fold(TRACK_LENGTH_CEILING, f64::min)
}

/// Two-prong (V0) decay candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V0Candidate {
    /// Found by the on-the-fly vertexer (vs offline).
    pub on_the_fly: bool,
    /// Transverse momentum.
    pub pt: f64,
    /// Total momentum.
    pub total_momentum: f64,
    /// Decay length from the primary vertex.
    pub decay_length: f64,
    /// Positive daughter.
    pub pos: DaughterTrack,
    /// Negative daughter.
    pub neg: DaughterTrack,
    /// Rapidity under the K0S mass.
    pub rap_k0short: f64,
    /// Rapidity under the Λ mass.
    pub rap_lambda: f64,
    /// Invariant mass as K0S.
    pub mass_k0short: f64,
    /// Invariant mass as Λ.
    pub mass_lambda: f64,
    /// Invariant mass as anti-Λ.
    pub mass_antilambda: f64,
    /// Transverse decay radius.
    pub radius: f64,
    /// Negative daughter DCA to the primary vertex.
    pub dca_neg_to_pv: f64,
    /// Positive daughter DCA to the primary vertex.
    pub dca_pos_to_pv: f64,
    /// DCA between the daughters.
    pub dca_daughters: f64,
    /// Cosine of the pointing angle.
    pub cos_pa: f64,
    /// Armenteros qT.
    pub pt_arm: f64,
    /// Armenteros α.
    pub alpha_arm: f64,
    /// Largest χ²/cluster among the daughters.
    pub max_chi2_per_cluster: f64,
}

impl V0Candidate {
    /// Smaller crossed-row count of the two daughters.
    pub fn least_crossed_rows(&self) -> f64 {
        self.pos.tpc_clusters.min(self.neg.tpc_clusters)
    }

    /// Smaller crossed-rows / findable ratio of the two daughters.
    pub fn least_crossed_rows_over_findable(&self) -> f64 {
        self.pos.crossed_rows_over_findable().min(self.neg.crossed_rows_over_findable())
    }

    /// Smallest active-zone length of the two daughters.
    pub fn min_track_length(&self) -> f64 {
        smallest_track_length([&self.pos, &self.neg])
    }

    /// `L / p`; multiply by a mass for the proper-lifetime proxy.
    pub fn dist_over_total_momentum(&self) -> f64 {
        self.decay_length / (self.total_momentum + 1e-10)
    }
}

impl Candidate for V0Candidate {
    fn pt(&self) -> f64 {
        self.pt
    }

    fn prescreen(&self) -> Result<(), SkipReason> {
        if self.pos.index.is_none() || self.neg.index.is_none() {
            return Err(SkipReason::UnresolvedTrack);
        }
        if self.pos.charge == self.neg.charge {
            return Err(SkipReason::LikeSign);
        }
        if !self.pos.has_tpc_refit() || !self.neg.has_tpc_refit() {
            return Err(SkipReason::NoTpcRefit);
        }
        if self.pos.is_kink || self.neg.is_kink {
            return Err(SkipReason::Kink);
        }
        if self.pos.tpc_findable_clusters <= 0.0 || self.neg.tpc_findable_clusters <= 0.0 {
            return Err(SkipReason::NoFindableClusters);
        }
        let short = self.pos.tpc_clusters < MIN_CROSSED_ROWS || self.neg.tpc_clusters < MIN_CROSSED_ROWS;
        if short && self.min_track_length() < MIN_LENGTH_FOR_SHORT_TRACKS {
            return Err(SkipReason::PoorTrackQuality);
        }
        Ok(())
    }
}

/// Three-prong (cascade) decay candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeCandidate {
    /// Cascade charge (bachelor sign).
    pub charge: i8,
    /// Transverse momentum.
    pub pt: f64,
    /// Total momentum.
    pub total_momentum: f64,
    /// Cascade decay length from the primary vertex.
    pub decay_length: f64,
    /// Transverse momentum of the V0.
    pub v0_pt: f64,
    /// Total momentum of the V0.
    pub v0_total_momentum: f64,
    /// Positive V0 daughter.
    pub pos: DaughterTrack,
    /// Negative V0 daughter.
    pub neg: DaughterTrack,
    /// Bachelor track.
    pub bach: DaughterTrack,
    /// Rapidity under the Ξ mass.
    pub rap_xi: f64,
    /// Rapidity under the Ω mass.
    pub rap_omega: f64,
    /// Invariant mass as Ξ.
    pub mass_xi: f64,
    /// Invariant mass as Ω.
    pub mass_omega: f64,
    /// V0 invariant mass as Λ.
    pub v0_mass_lambda: f64,
    /// V0 invariant mass as anti-Λ.
    pub v0_mass_antilambda: f64,
    /// Negative daughter DCA to the primary vertex.
    pub dca_neg_to_pv: f64,
    /// Positive daughter DCA to the primary vertex.
    pub dca_pos_to_pv: f64,
    /// Bachelor DCA to the primary vertex.
    pub dca_bach_to_pv: f64,
    /// DCA between the V0 daughters.
    pub dca_v0_daughters: f64,
    /// V0 DCA to the primary vertex.
    pub dca_v0_to_pv: f64,
    /// DCA between the V0 and the bachelor.
    pub dca_casc_daughters: f64,
    /// DCA between the bachelor and the baryon daughter.
    pub dca_bach_to_baryon: f64,
    /// V0 cosine of pointing angle.
    pub v0_cos_pa: f64,
    /// Cascade cosine of pointing angle.
    pub casc_cos_pa: f64,
    /// Bachelor–baryon pair cosine of pointing angle.
    pub bach_baryon_cos_pa: f64,
    /// V0 transverse decay radius.
    pub v0_radius: f64,
    /// Cascade transverse decay radius.
    pub casc_radius: f64,
    /// V0 lifetime proxy.
    pub v0_lifetime: f64,
    /// Largest χ²/cluster among the daughters.
    pub max_chi2_per_cluster: f64,
    /// Cascade DCA to the primary vertex (transverse).
    pub casc_dca_to_pv_xy: f64,
    /// Cascade DCA to the primary vertex (longitudinal).
    pub casc_dca_to_pv_z: f64,
}

impl CascadeCandidate {
    /// Smallest TPC cluster count of the three daughters.
    pub fn least_clusters(&self) -> f64 {
        self.pos.tpc_clusters.min(self.neg.tpc_clusters).min(self.bach.tpc_clusters)
    }

    /// Smallest active-zone length of the three daughters.
    pub fn min_track_length(&self) -> f64 {
        smallest_track_length([&self.pos, &self.neg, &self.bach])
    }

    /// `L / p`; multiply by a mass for the proper-lifetime proxy.
    pub fn dist_over_total_momentum(&self) -> f64 {
        self.decay_length / (self.total_momentum + 1e-13)
    }

    /// 3D DCA of the cascade to the primary vertex.
    pub fn casc_dca_to_pv(&self) -> f64 {
        self.casc_dca_to_pv_xy.hypot(self.casc_dca_to_pv_z)
    }
}

impl Candidate for CascadeCandidate {
    fn pt(&self) -> f64 {
        self.pt
    }

    fn prescreen(&self) -> Result<(), SkipReason> {
        let (Some(pos), Some(neg), Some(bach)) = (self.pos.index, self.neg.index, self.bach.index)
        else {
            return Err(SkipReason::UnresolvedTrack);
        };
        if bach == pos || bach == neg {
            return Err(SkipReason::SharedBachelor);
        }
        if ![&self.pos, &self.neg, &self.bach].iter().all(|t| t.has_tpc_refit()) {
            return Err(SkipReason::NoTpcRefit);
        }
        let shortest = self.min_track_length();
        for t in [&self.pos, &self.neg, &self.bach] {
            if t.tpc_clusters < MIN_CROSSED_ROWS && shortest < MIN_LENGTH_FOR_SHORT_TRACKS {
                return Err(SkipReason::PoorTrackQuality);
            }
        }
        Ok(())
    }
}
