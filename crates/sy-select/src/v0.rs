//! Two-prong (V0) configurations and their cut predicate.

use serde::{Deserialize, Serialize};

use crate::binning::ResultBinning;
use crate::candidate::{DaughterTrack, V0Candidate};
use crate::cuts::{CutPolicy, ExpCurve, VariableCut, require, within};
use crate::hypothesis::{Leg, V0Hypothesis};
use crate::registry::Selection;

/// Baryon inner pT above which the 2.76 TeV-like dE/dx check is waived.
const DEDX_276TEV_MIN_BARYON_PT: f64 = 1.0;
/// Proton n-sigma window of the 2.76 TeV-like dE/dx check.
const DEDX_276TEV_PROTON_SIGMA: f64 = 3.0;

/// First V0 sub-cut a candidate failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V0Cut {
    /// Vertexer type mismatch.
    OnTheFly,
    /// Daughter pseudorapidity window.
    DaughterEta,
    /// Rapidity window.
    Rapidity,
    /// Decay radius window.
    Radius,
    /// Negative daughter DCA to PV.
    DcaNegToPv,
    /// Positive daughter DCA to PV.
    DcaPosToPv,
    /// DCA between daughters.
    DcaDaughters,
    /// Cosine of pointing angle.
    CosPa,
    /// Proper lifetime proxy.
    ProperLifetime,
    /// Least crossed rows.
    CrossedRows,
    /// Least crossed rows over findable.
    CrossedRowsOverFindable,
    /// Baryon daughter inner momentum.
    BaryonMomentum,
    /// TPC dE/dx n-sigma.
    TpcDedx,
    /// Armenteros–Podolanski cut.
    Armenteros,
    /// ITS refit on both daughters.
    ItsRefit,
    /// Max χ²/cluster.
    MaxChi2PerCluster,
    /// Min track length.
    MinTrackLength,
    /// 2.76 TeV-like baryon dE/dx.
    Dedx276TeV,
}

/// One named V0 configuration.
///
/// Windows are open (`lo < x < hi`) and every comparison is strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V0Config {
    /// Configuration name.
    pub name: String,
    /// Mass hypothesis.
    pub hypothesis: V0Hypothesis,
    /// Accumulator binning.
    pub binning: ResultBinning,
    /// Accept on-the-fly (true) or offline (false) V0s.
    pub use_on_the_fly: bool,
    /// Lower daughter η.
    pub min_eta_tracks: f64,
    /// Upper daughter η.
    pub max_eta_tracks: f64,
    /// Lower rapidity.
    pub min_rapidity: f64,
    /// Upper rapidity.
    pub max_rapidity: f64,
    /// Minimum decay radius.
    pub v0_radius: f64,
    /// Maximum decay radius.
    pub max_v0_radius: f64,
    /// Minimum negative daughter DCA to PV.
    pub dca_neg_to_pv: f64,
    /// Minimum positive daughter DCA to PV.
    pub dca_pos_to_pv: f64,
    /// Maximum DCA between daughters.
    pub dca_v0_daughters: f64,
    /// Minimum cosine of pointing angle.
    pub v0_cos_pa: VariableCut,
    /// Maximum `L/p · m`.
    pub proper_lifetime: f64,
    /// Minimum crossed rows (least of both daughters).
    pub least_crossed_rows: f64,
    /// Minimum crossed rows / findable (least of both daughters).
    pub least_crossed_rows_over_findable: f64,
    /// Minimum baryon inner momentum (Λ, anti-Λ).
    pub min_baryon_momentum: f64,
    /// Maximum |n-sigma| of both daughters.
    pub tpc_dedx: f64,
    /// Armenteros parameter `p` requiring `qT > p·|α|` (K0S only).
    pub armenteros: Option<f64>,
    /// Require ITS refit on both daughters.
    pub use_its_refit: bool,
    /// Maximum χ²/cluster.
    pub max_chi2_per_cluster: Option<f64>,
    /// Minimum track length.
    pub min_track_length: Option<f64>,
    /// Low-pT baryon daughters must be within 3σ of the proton band.
    pub dedx_276tev_like: bool,
}

impl Default for V0Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            hypothesis: V0Hypothesis::K0Short,
            binning: ResultBinning::default(),
            use_on_the_fly: false,
            min_eta_tracks: -0.8,
            max_eta_tracks: 0.8,
            min_rapidity: -0.5,
            max_rapidity: 0.5,
            v0_radius: 0.5,
            max_v0_radius: 200.0,
            dca_neg_to_pv: 0.05,
            dca_pos_to_pv: 0.05,
            dca_v0_daughters: 1.2,
            v0_cos_pa: VariableCut::constant(0.97),
            proper_lifetime: 1000.0,
            least_crossed_rows: -1.0,
            least_crossed_rows_over_findable: -1.0,
            min_baryon_momentum: -1.0,
            tpc_dedx: 5.0,
            armenteros: None,
            use_its_refit: false,
            max_chi2_per_cluster: None,
            min_track_length: None,
            dedx_276tev_like: false,
        }
    }
}

impl V0Config {
    /// Configuration with default (loose) cuts.
    pub fn new(name: impl Into<String>, hypothesis: V0Hypothesis, binning: ResultBinning) -> Self {
        Self { name: name.into(), hypothesis, binning, ..Default::default() }
    }

    /// Enable the Armenteros cut with parameter `p`.
    pub fn armenteros(mut self, p: f64) -> Self {
        self.armenteros = Some(p);
        self
    }

    /// Attach a parametric cos PA curve.
    pub fn cos_pa_curve(mut self, curve: ExpCurve) -> Self {
        self.v0_cos_pa.curve = Some(curve);
        self
    }
}

fn daughter(c: &V0Candidate, leg: Leg) -> &DaughterTrack {
    match leg {
        Leg::Pos => &c.pos,
        Leg::Neg => &c.neg,
    }
}

impl Selection for V0Config {
    type Candidate = V0Candidate;
    type Rejection = V0Cut;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn binning(&self) -> &ResultBinning {
        &self.binning
    }

    fn check(&self, c: &V0Candidate) -> Result<f64, V0Cut> {
        let s = self.hypothesis.strategy();
        let cos_pa_cut = self.v0_cos_pa.effective(CutPolicy::V0_COSPA, c.pt);
        let baryon = s.baryon.map(|leg| daughter(c, leg));

        require(c.on_the_fly == self.use_on_the_fly, V0Cut::OnTheFly)?;
        require(
            within(c.neg.eta, self.min_eta_tracks, self.max_eta_tracks)
                && within(c.pos.eta, self.min_eta_tracks, self.max_eta_tracks),
            V0Cut::DaughterEta,
        )?;
        require(within((s.rapidity)(c), self.min_rapidity, self.max_rapidity), V0Cut::Rapidity)?;

        require(within(c.radius, self.v0_radius, self.max_v0_radius), V0Cut::Radius)?;
        require(c.dca_neg_to_pv > self.dca_neg_to_pv, V0Cut::DcaNegToPv)?;
        require(c.dca_pos_to_pv > self.dca_pos_to_pv, V0Cut::DcaPosToPv)?;
        require(c.dca_daughters < self.dca_v0_daughters, V0Cut::DcaDaughters)?;
        require(c.cos_pa > cos_pa_cut, V0Cut::CosPa)?;
        require(
            c.dist_over_total_momentum() * s.pdg_mass < self.proper_lifetime,
            V0Cut::ProperLifetime,
        )?;
        require(c.least_crossed_rows() > self.least_crossed_rows, V0Cut::CrossedRows)?;
        require(
            c.least_crossed_rows_over_findable() > self.least_crossed_rows_over_findable,
            V0Cut::CrossedRowsOverFindable,
        )?;

        if let Some(b) = baryon {
            require(b.inner_p > self.min_baryon_momentum, V0Cut::BaryonMomentum)?;
        }

        require(
            c.neg.tpc.get(s.neg).abs() < self.tpc_dedx && c.pos.tpc.get(s.pos).abs() < self.tpc_dedx,
            V0Cut::TpcDedx,
        )?;

        if let Some(p) = self.armenteros
            && self.hypothesis == V0Hypothesis::K0Short
        {
            require(c.pt_arm > p * c.alpha_arm.abs(), V0Cut::Armenteros)?;
        }
        if self.use_its_refit {
            require(c.pos.has_its_refit() && c.neg.has_its_refit(), V0Cut::ItsRefit)?;
        }
        if let Some(max) = self.max_chi2_per_cluster {
            require(c.max_chi2_per_cluster < max, V0Cut::MaxChi2PerCluster)?;
        }
        if let Some(min) = self.min_track_length {
            require(c.min_track_length() > min, V0Cut::MinTrackLength)?;
        }
        if self.dedx_276tev_like
            && let Some(b) = baryon
        {
            require(
                b.inner_pt > DEDX_276TEV_MIN_BARYON_PT
                    || b.tpc.proton.abs() < DEDX_276TEV_PROTON_SIGMA,
                V0Cut::Dedx276TeV,
            )?;
        }

        Ok((s.mass)(c))
    }
}
