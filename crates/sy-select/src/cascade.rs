//! Three-prong (cascade) configurations and their cut predicate.

use serde::{Deserialize, Serialize};

use crate::binning::ResultBinning;
use crate::candidate::CascadeCandidate;
use crate::cuts::{CutPolicy, LambdaMassModel, VariableCut, cospa_276tev, require, within};
use crate::hypothesis::{CascadeHypothesis, LAMBDA_WINDOW_CENTER, XI_MASS};
use crate::registry::Selection;

/// TOF |n-sigma| limit applied when TOF PID is enabled.
const TOF_NSIGMA_MAX: f64 = 4.0;

/// First cascade sub-cut a candidate failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeCut {
    /// Charge does not match the hypothesis.
    Charge,
    /// Daughter pseudorapidity window.
    DaughterEta,
    /// Rapidity window.
    Rapidity,
    /// Negative daughter DCA to PV.
    DcaNegToPv,
    /// Positive daughter DCA to PV.
    DcaPosToPv,
    /// DCA between V0 daughters.
    DcaV0Daughters,
    /// V0 cosine of pointing angle.
    V0CosPa,
    /// V0 decay radius.
    V0Radius,
    /// V0 DCA to PV.
    DcaV0ToPv,
    /// V0 mass window.
    V0Mass,
    /// Bachelor DCA to PV.
    DcaBachToPv,
    /// DCA between cascade daughters.
    DcaCascDaughters,
    /// Cascade cosine of pointing angle.
    CascCosPa,
    /// Cascade decay radius.
    CascRadius,
    /// Parametric V0 mass pull.
    V0MassSigma,
    /// Proper lifetime proxy.
    ProperLifetime,
    /// Least TPC clusters.
    LeastClusters,
    /// TPC dE/dx n-sigma.
    TpcDedx,
    /// TOF n-sigma.
    TofNSigma,
    /// Competing Ξ mass (Ω only).
    XiRejection,
    /// Bachelor–baryon DCA.
    DcaBachToBaryon,
    /// Bachelor–baryon cosine of pointing angle.
    BachBaryonCosPa,
    /// V0 lifetime window.
    V0Lifetime,
    /// ITS refit on all daughters.
    ItsRefit,
    /// Max χ²/cluster.
    MaxChi2PerCluster,
    /// Min track length.
    MinTrackLength,
    /// 2.76 TeV momentum-dependent V0 cos PA.
    V0CosPa276TeV,
    /// 3D cascade DCA to PV.
    DcaCascToPv,
    /// Uncertainty-weighted daughter DCA to PV.
    WeightedDca,
}

/// One named cascade configuration.
///
/// Windows are open (`lo < x < hi`) and every comparison is strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Configuration name.
    pub name: String,
    /// Mass hypothesis.
    pub hypothesis: CascadeHypothesis,
    /// Accumulator binning.
    pub binning: ResultBinning,
    /// Expect the opposite charge (like-sign background study).
    pub swap_bachelor_charge: bool,
    /// Lower daughter η.
    pub min_eta_tracks: f64,
    /// Upper daughter η.
    pub max_eta_tracks: f64,
    /// Lower rapidity.
    pub min_rapidity: f64,
    /// Upper rapidity.
    pub max_rapidity: f64,
    /// Minimum negative daughter DCA to PV.
    pub dca_neg_to_pv: f64,
    /// Minimum positive daughter DCA to PV.
    pub dca_pos_to_pv: f64,
    /// Maximum DCA between V0 daughters.
    pub dca_v0_daughters: f64,
    /// Minimum V0 cosine of pointing angle.
    pub v0_cos_pa: VariableCut,
    /// Minimum V0 radius.
    pub v0_radius: f64,
    /// Minimum V0 DCA to PV.
    pub dca_v0_to_pv: f64,
    /// Half-width of the V0 mass window around 1.116.
    pub v0_mass: f64,
    /// Minimum bachelor DCA to PV.
    pub dca_bach_to_pv: f64,
    /// Maximum DCA between cascade daughters.
    pub dca_casc_daughters: VariableCut,
    /// Minimum cascade cosine of pointing angle.
    pub casc_cos_pa: VariableCut,
    /// Minimum cascade radius.
    pub casc_radius: f64,
    /// Maximum |V0 mass pull| under [`CascadeConfig::lambda_mass`].
    pub v0_mass_sigma: Option<f64>,
    /// Expected Λ peak used by the mass pull.
    pub lambda_mass: LambdaMassModel,
    /// Maximum `L/p · m`.
    pub proper_lifetime: f64,
    /// Minimum TPC clusters (least of three daughters).
    pub least_clusters: f64,
    /// Maximum TPC |n-sigma| of all daughters.
    pub tpc_dedx: f64,
    /// Apply TOF n-sigma (|n| < 4) on all daughters.
    pub use_tof_unchecked: bool,
    /// Ω only: minimum |m(Ξ) − m_PDG(Ξ)|.
    pub xi_rejection: f64,
    /// Minimum bachelor–baryon DCA.
    pub dca_bach_to_baryon: f64,
    /// Maximum bachelor–baryon cos PA. Values above 1 never reject.
    pub bach_baryon_cos_pa: VariableCut,
    /// Minimum V0 lifetime.
    pub min_v0_lifetime: f64,
    /// Maximum V0 lifetime.
    pub max_v0_lifetime: Option<f64>,
    /// Require ITS refit on all daughters.
    pub use_its_refit: bool,
    /// Maximum χ²/cluster.
    pub max_chi2_per_cluster: Option<f64>,
    /// Minimum track length.
    pub min_track_length: Option<f64>,
    /// Apply the 2.76 TeV momentum-dependent V0 cos PA cut.
    pub use_276tev_v0_cos_pa: bool,
    /// Maximum 3D cascade DCA to PV.
    pub dca_casc_to_pv: Option<f64>,
    /// Minimum weighted DCA of the negative daughter.
    pub dca_neg_to_pv_weighted: Option<f64>,
    /// Minimum weighted DCA of the positive daughter.
    pub dca_pos_to_pv_weighted: Option<f64>,
    /// Minimum weighted DCA of the bachelor.
    pub dca_bach_to_pv_weighted: Option<f64>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            hypothesis: CascadeHypothesis::XiMinus,
            binning: ResultBinning::default(),
            swap_bachelor_charge: false,
            min_eta_tracks: -0.8,
            max_eta_tracks: 0.8,
            min_rapidity: -0.5,
            max_rapidity: 0.5,
            dca_neg_to_pv: 0.05,
            dca_pos_to_pv: 0.05,
            dca_v0_daughters: 1.5,
            v0_cos_pa: VariableCut::constant(0.95),
            v0_radius: 0.5,
            dca_v0_to_pv: 0.05,
            v0_mass: 0.01,
            dca_bach_to_pv: 0.03,
            dca_casc_daughters: VariableCut::constant(1.5),
            casc_cos_pa: VariableCut::constant(0.95),
            casc_radius: 0.4,
            v0_mass_sigma: None,
            lambda_mass: LambdaMassModel::default(),
            proper_lifetime: 1000.0,
            least_clusters: -1.0,
            tpc_dedx: 5.0,
            use_tof_unchecked: false,
            xi_rejection: 0.008,
            dca_bach_to_baryon: -1.0,
            bach_baryon_cos_pa: VariableCut::constant(2.0),
            min_v0_lifetime: -1.0,
            max_v0_lifetime: None,
            use_its_refit: false,
            max_chi2_per_cluster: None,
            min_track_length: None,
            use_276tev_v0_cos_pa: false,
            dca_casc_to_pv: None,
            dca_neg_to_pv_weighted: None,
            dca_pos_to_pv_weighted: None,
            dca_bach_to_pv_weighted: None,
        }
    }
}

impl CascadeConfig {
    /// Configuration with default (loose) cuts.
    pub fn new(
        name: impl Into<String>,
        hypothesis: CascadeHypothesis,
        binning: ResultBinning,
    ) -> Self {
        Self { name: name.into(), hypothesis, binning, ..Default::default() }
    }

    /// Expected cascade charge, honouring `swap_bachelor_charge`.
    pub fn expected_charge(&self) -> i8 {
        let q = self.hypothesis.strategy().charge;
        if self.swap_bachelor_charge { -q } else { q }
    }
}

fn optional_min(value: f64, cut: Option<f64>) -> bool {
    cut.is_none_or(|min| value > min)
}

fn optional_max(value: f64, cut: Option<f64>) -> bool {
    cut.is_none_or(|max| value < max)
}

impl Selection for CascadeConfig {
    type Candidate = CascadeCandidate;
    type Rejection = CascadeCut;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn binning(&self) -> &ResultBinning {
        &self.binning
    }

    fn check(&self, c: &CascadeCandidate) -> Result<f64, CascadeCut> {
        let s = self.hypothesis.strategy();
        let v0_cos_pa_cut = self.v0_cos_pa.effective(CutPolicy::V0_COSPA, c.pt);
        let casc_cos_pa_cut = self.casc_cos_pa.effective(CutPolicy::CASC_COSPA, c.pt);
        let casc_dau_cut = self.dca_casc_daughters.effective(CutPolicy::CASC_DCA_DAUGHTERS, c.pt);
        let bb_cos_pa_cut = self.bach_baryon_cos_pa.effective(CutPolicy::BB_COSPA, c.pt);
        let v0_mass = (s.v0_mass)(c);
        let eta_ok = |eta: f64| within(eta, self.min_eta_tracks, self.max_eta_tracks);

        require(c.charge == self.expected_charge(), CascadeCut::Charge)?;
        require(eta_ok(c.pos.eta) && eta_ok(c.neg.eta) && eta_ok(c.bach.eta), CascadeCut::DaughterEta)?;
        require(within((s.rapidity)(c), self.min_rapidity, self.max_rapidity), CascadeCut::Rapidity)?;

        // V0 topology
        require(c.dca_neg_to_pv > self.dca_neg_to_pv, CascadeCut::DcaNegToPv)?;
        require(c.dca_pos_to_pv > self.dca_pos_to_pv, CascadeCut::DcaPosToPv)?;
        require(c.dca_v0_daughters < self.dca_v0_daughters, CascadeCut::DcaV0Daughters)?;
        require(c.v0_cos_pa > v0_cos_pa_cut, CascadeCut::V0CosPa)?;
        require(c.v0_radius > self.v0_radius, CascadeCut::V0Radius)?;

        // Cascade topology
        require(c.dca_v0_to_pv > self.dca_v0_to_pv, CascadeCut::DcaV0ToPv)?;
        require((v0_mass - LAMBDA_WINDOW_CENTER).abs() < self.v0_mass, CascadeCut::V0Mass)?;
        require(c.dca_bach_to_pv > self.dca_bach_to_pv, CascadeCut::DcaBachToPv)?;
        require(c.dca_casc_daughters < casc_dau_cut, CascadeCut::DcaCascDaughters)?;
        require(c.casc_cos_pa > casc_cos_pa_cut, CascadeCut::CascCosPa)?;
        require(c.casc_radius > self.casc_radius, CascadeCut::CascRadius)?;

        if let Some(n) = self.v0_mass_sigma {
            require(self.lambda_mass.pull(v0_mass, c.v0_pt).abs() < n, CascadeCut::V0MassSigma)?;
        }

        require(
            c.dist_over_total_momentum() * s.pdg_mass < self.proper_lifetime,
            CascadeCut::ProperLifetime,
        )?;
        require(c.least_clusters() > self.least_clusters, CascadeCut::LeastClusters)?;

        require(
            c.neg.tpc.get(s.neg).abs() < self.tpc_dedx
                && c.pos.tpc.get(s.pos).abs() < self.tpc_dedx
                && c.bach.tpc.get(s.bach).abs() < self.tpc_dedx,
            CascadeCut::TpcDedx,
        )?;
        if self.use_tof_unchecked {
            require(
                c.neg.tof.get(s.neg).abs() < TOF_NSIGMA_MAX
                    && c.pos.tof.get(s.pos).abs() < TOF_NSIGMA_MAX
                    && c.bach.tof.get(s.bach).abs() < TOF_NSIGMA_MAX,
                CascadeCut::TofNSigma,
            )?;
        }

        if s.is_omega {
            require((c.mass_xi - XI_MASS).abs() > self.xi_rejection, CascadeCut::XiRejection)?;
        }
        require(c.dca_bach_to_baryon > self.dca_bach_to_baryon, CascadeCut::DcaBachToBaryon)?;
        require(c.bach_baryon_cos_pa < bb_cos_pa_cut, CascadeCut::BachBaryonCosPa)?;
        require(
            c.v0_lifetime > self.min_v0_lifetime && optional_max(c.v0_lifetime, self.max_v0_lifetime),
            CascadeCut::V0Lifetime,
        )?;

        if self.use_its_refit {
            require(
                c.pos.has_its_refit() && c.neg.has_its_refit() && c.bach.has_its_refit(),
                CascadeCut::ItsRefit,
            )?;
        }
        require(
            optional_max(c.max_chi2_per_cluster, self.max_chi2_per_cluster),
            CascadeCut::MaxChi2PerCluster,
        )?;
        require(optional_min(c.min_track_length(), self.min_track_length), CascadeCut::MinTrackLength)?;
        if self.use_276tev_v0_cos_pa {
            require(c.v0_cos_pa > cospa_276tev(c.v0_total_momentum), CascadeCut::V0CosPa276TeV)?;
        }
        require(optional_max(c.casc_dca_to_pv(), self.dca_casc_to_pv), CascadeCut::DcaCascToPv)?;
        require(
            optional_min(c.neg.weighted_dca(c.dca_neg_to_pv), self.dca_neg_to_pv_weighted)
                && optional_min(c.pos.weighted_dca(c.dca_pos_to_pv), self.dca_pos_to_pv_weighted)
                && optional_min(c.bach.weighted_dca(c.dca_bach_to_pv), self.dca_bach_to_pv_weighted),
            CascadeCut::WeightedDca,
        )?;

        Ok((s.mass)(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{TPC_REFIT, fixtures};
    use crate::cuts::ExpCurve;

    fn vertexer_level(hypothesis: CascadeHypothesis) -> CascadeConfig {
        let mut c = CascadeConfig::new(
            format!("{}_VertexerLevel", hypothesis.particle()),
            hypothesis,
            ResultBinning::around(&[0.0, 10.0], &[0.4, 12.0], 100, 1.322, 0.05),
        );
        c.dca_neg_to_pv = 0.2;
        c.dca_pos_to_pv = 0.2;
        c.dca_v0_daughters = 1.0;
        c.v0_cos_pa = VariableCut::constant(0.95);
        c.v0_radius = 3.0;
        c.dca_v0_to_pv = 0.1;
        c.v0_mass = 0.006;
        c.dca_bach_to_pv = 0.1;
        c.dca_casc_daughters = VariableCut::constant(1.0);
        c.casc_radius = 1.2;
        c.casc_cos_pa = VariableCut::constant(0.95);
        c.proper_lifetime = 15.0;
        c.least_clusters = 70.0;
        c.tpc_dedx = 4.0;
        c
    }

    type Mutation = Box<dyn Fn(&mut CascadeCandidate)>;

    fn case(cut: CascadeCut, f: impl Fn(&mut CascadeCandidate) + 'static) -> (CascadeCut, Mutation) {
        (cut, Box::new(f))
    }

    fn rejected_by(cfg: &CascadeConfig, cand: &CascadeCandidate) -> CascadeCut {
        cfg.check(cand).expect_err("candidate should be rejected")
    }

    #[test]
    fn vertexer_level_accepts_fixture() {
        let c = fixtures::xi_minus();
        assert_eq!(vertexer_level(CascadeHypothesis::XiMinus).check(&c), Ok(c.mass_xi));
    }

    #[test]
    fn each_sub_cut_rejects_on_its_own() {
        let cfg = vertexer_level(CascadeHypothesis::XiMinus);
        let cases = vec![
            case(CascadeCut::Charge, |c| c.charge = 1),
            case(CascadeCut::DaughterEta, |c| c.bach.eta = -0.85),
            case(CascadeCut::Rapidity, |c| c.rap_xi = 0.5),
            case(CascadeCut::DcaNegToPv, |c| c.dca_neg_to_pv = 0.2),
            case(CascadeCut::DcaPosToPv, |c| c.dca_pos_to_pv = 0.1),
            case(CascadeCut::DcaV0Daughters, |c| c.dca_v0_daughters = 1.1),
            case(CascadeCut::V0CosPa, |c| c.v0_cos_pa = 0.94),
            case(CascadeCut::V0Radius, |c| c.v0_radius = 2.0),
            case(CascadeCut::DcaV0ToPv, |c| c.dca_v0_to_pv = 0.05),
            case(CascadeCut::V0Mass, |c| c.v0_mass_lambda = 1.125),
            case(CascadeCut::DcaBachToPv, |c| c.dca_bach_to_pv = 0.1),
            case(CascadeCut::DcaCascDaughters, |c| c.dca_casc_daughters = 1.0),
            case(CascadeCut::CascCosPa, |c| c.casc_cos_pa = 0.9),
            case(CascadeCut::CascRadius, |c| c.casc_radius = 1.0),
            case(CascadeCut::ProperLifetime, |c| c.decay_length = 30.0),
            case(CascadeCut::LeastClusters, |c| c.bach.tpc_clusters = 60.0),
            case(CascadeCut::TpcDedx, |c| c.bach.tpc.pion = 4.2),
        ];
        for (cut, mutate) in cases {
            let mut c = fixtures::xi_minus();
            mutate(&mut c);
            assert_eq!(rejected_by(&cfg, &c), cut);
        }
    }

    #[test]
    fn swapped_bachelor_charge() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        cfg.swap_bachelor_charge = true;
        assert_eq!(cfg.expected_charge(), 1);
        let mut c = fixtures::xi_minus();
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::Charge);
        c.charge = 1;
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn tof_is_ignored_unless_enabled() {
        let mut c = fixtures::xi_minus();
        c.bach.tof.pion = 6.0;
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        assert!(cfg.select(&c).is_some());
        cfg.use_tof_unchecked = true;
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::TofNSigma);
    }

    #[test]
    fn xi_rejection_only_for_omega() {
        let mut c = fixtures::xi_minus();
        c.bach.tpc.kaon = 1.0;
        c.mass_xi = 1.325;
        let mut omega = vertexer_level(CascadeHypothesis::OmegaMinus);
        omega.proper_lifetime = 12.0;
        assert_eq!(rejected_by(&omega, &c), CascadeCut::XiRejection);
        c.mass_xi = 1.34;
        assert_eq!(omega.check(&c), Ok(c.mass_omega));
        c.mass_xi = 1.325;
        assert!(vertexer_level(CascadeHypothesis::XiMinus).select(&c).is_some());
    }

    #[test]
    fn parametric_v0_mass() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        cfg.v0_mass_sigma = Some(3.0);
        let mut c = fixtures::xi_minus();
        // pull = (1.1159 - 1.116) / 0.002 = -0.05
        assert!(cfg.select(&c).is_some());
        c.v0_mass_lambda = 1.1225;
        cfg.v0_mass = 0.01;
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::V0MassSigma);
    }

    #[test]
    fn bachelor_baryon_cuts() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        cfg.dca_bach_to_baryon = 0.6;
        let c = fixtures::xi_minus();
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::DcaBachToBaryon);

        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        cfg.bach_baryon_cos_pa = VariableCut::constant(0.04_f64.cos());
        // Candidate cos PA 0.99 is below cos(0.04) ≈ 0.9992: kept.
        assert!(cfg.select(&c).is_some());
        cfg.bach_baryon_cos_pa = VariableCut::constant(0.98);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::BachBaryonCosPa);
        // A curve can only loosen it: cos(0.1) ≈ 0.995 > 0.98 rescues the candidate.
        cfg.bach_baryon_cos_pa.curve = Some(ExpCurve::new(0.0, 0.0, 0.0, 0.0, 0.1));
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn v0_lifetime_window() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        let c = fixtures::xi_minus(); // v0 lifetime 10
        cfg.min_v0_lifetime = 10.0;
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::V0Lifetime);
        cfg.min_v0_lifetime = 5.0;
        cfg.max_v0_lifetime = Some(9.0);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::V0Lifetime);
        cfg.max_v0_lifetime = None;
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn optional_quality_cuts() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        let mut c = fixtures::xi_minus();
        cfg.use_its_refit = true;
        c.bach.status = TPC_REFIT;
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::ItsRefit);
        cfg.use_its_refit = false;

        cfg.max_chi2_per_cluster = Some(2.0);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::MaxChi2PerCluster);
        cfg.max_chi2_per_cluster = None;

        cfg.min_track_length = Some(150.0);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::MinTrackLength);
        cfg.min_track_length = None;

        cfg.dca_casc_to_pv = Some(0.05);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::DcaCascToPv);
        cfg.dca_casc_to_pv = Some(0.1);
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn momentum_dependent_v0_cos_pa() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        cfg.use_276tev_v0_cos_pa = true;
        let mut c = fixtures::xi_minus();
        c.v0_cos_pa = 0.997;
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::V0CosPa276TeV);
        // At low momentum the threshold drops below 0.997.
        c.v0_total_momentum = 0.4;
        assert!(cospa_276tev(0.4) < 0.997);
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn weighted_dca() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        let mut c = fixtures::xi_minus();
        c.bach.dca_sigma_x2 = 0.1;
        c.bach.dca_sigma_y2 = 0.1;
        // 0.3 / sqrt(0.02 + 1e-6) ≈ 2.12
        cfg.dca_bach_to_pv_weighted = Some(2.5);
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::WeightedDca);
        cfg.dca_bach_to_pv_weighted = Some(2.0);
        assert!(cfg.select(&c).is_some());
    }

    #[test]
    fn parametric_dca_casc_daughters_tightens() {
        let mut cfg = vertexer_level(CascadeHypothesis::XiMinus);
        let c = fixtures::xi_minus(); // 0.2
        cfg.dca_casc_daughters.curve = Some(ExpCurve::new(0.0, 0.0, 0.0, 0.0, 0.15));
        assert_eq!(rejected_by(&cfg, &c), CascadeCut::DcaCascDaughters);
        cfg.dca_casc_daughters.curve = Some(ExpCurve::new(0.0, 0.0, 0.0, 0.0, 3.0));
        assert!(cfg.select(&c).is_some());
    }
}
