//! Cut-threshold model: constant, parametric and optional thresholds.
//!
//! A parametric threshold is the curve
//!
//! ```text
//! f(pT) = a·exp(b·pT) + c·exp(d·pT) + e
//! ```
//!
//! evaluated at the candidate pT. Each cut family declares whether the curve
//! is an angle (compared through its cosine) or a plain length, whether the
//! cut is a lower or an upper bound on the candidate value, and whether the
//! curve may only make the cut tighter or only looser. The policy for each
//! family is a constant below and is never taken from configuration.

use serde::{Deserialize, Serialize};

/// Two-exponential parametrization in pT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpCurve {
    /// `a`
    pub exp0_const: f64,
    /// `b`
    pub exp0_slope: f64,
    /// `c`
    pub exp1_const: f64,
    /// `d`
    pub exp1_slope: f64,
    /// `e`
    pub constant: f64,
}

impl ExpCurve {
    /// Curve `a·exp(b·pT) + c·exp(d·pT) + e`.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        Self { exp0_const: a, exp0_slope: b, exp1_const: c, exp1_slope: d, constant: e }
    }

    /// Evaluate at `pt`.
    pub fn eval(&self, pt: f64) -> f64 {
        self.exp0_const * (self.exp0_slope * pt).exp()
            + self.exp1_const * (self.exp1_slope * pt).exp()
            + self.constant
    }
}

/// How the curve value is turned into a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveSpace {
    /// Curve is an angle; the threshold is its cosine.
    Cosine,
    /// Curve is the threshold itself.
    Linear,
}

/// Direction in which a cut bounds the candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Candidate value must be above the threshold.
    Lower,
    /// Candidate value must be below the threshold.
    Upper,
}

/// Which of {constant, parametric} wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// The more restrictive of the two.
    Tighter,
    /// The less restrictive of the two.
    Looser,
}

/// Fixed combination policy of one cut family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPolicy {
    /// Curve space.
    pub space: CurveSpace,
    /// Bound direction.
    pub bound: Bound,
    /// Combination rule.
    pub combine: Combine,
}

impl CutPolicy {
    /// V0 cosine of pointing angle (V0 and cascade topologies).
    pub const V0_COSPA: Self =
        Self { space: CurveSpace::Cosine, bound: Bound::Lower, combine: Combine::Tighter };
    /// Cascade cosine of pointing angle.
    pub const CASC_COSPA: Self =
        Self { space: CurveSpace::Cosine, bound: Bound::Lower, combine: Combine::Tighter };
    /// DCA between the cascade daughters.
    pub const CASC_DCA_DAUGHTERS: Self =
        Self { space: CurveSpace::Linear, bound: Bound::Upper, combine: Combine::Tighter };
    /// Bachelor–baryon cosine of pointing angle. This is a rejection cut
    /// (candidate value must stay below), and the curve may only loosen it.
    pub const BB_COSPA: Self =
        Self { space: CurveSpace::Cosine, bound: Bound::Upper, combine: Combine::Looser };

    /// Combine `constant` with the raw curve value.
    pub fn combine(&self, constant: f64, curve: f64) -> f64 {
        let parametric = match self.space {
            CurveSpace::Cosine => curve.cos(),
            CurveSpace::Linear => curve,
        };
        // Larger threshold is tighter for a lower bound and looser for an upper one.
        let take_larger = matches!(
            (self.bound, self.combine),
            (Bound::Lower, Combine::Tighter) | (Bound::Upper, Combine::Looser)
        );
        // A NaN curve leaves the constant in place.
        if take_larger { constant.max(parametric) } else { constant.min(parametric) }
    }
}

/// A constant threshold with an optional parametric refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableCut {
    /// Constant threshold.
    pub value: f64,
    /// Parametric refinement (`None` = constant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<ExpCurve>,
}

impl VariableCut {
    /// Constant-only threshold.
    pub const fn constant(value: f64) -> Self {
        Self { value, curve: None }
    }

    /// Threshold with a parametric refinement.
    pub const fn with_curve(value: f64, curve: ExpCurve) -> Self {
        Self { value, curve: Some(curve) }
    }

    /// Effective threshold at `pt` under `policy`.
    pub fn effective(&self, policy: CutPolicy, pt: f64) -> f64 {
        match &self.curve {
            Some(curve) => policy.combine(self.value, curve.eval(pt)),
            None => self.value,
        }
    }
}

impl From<f64> for VariableCut {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

/// Expected Λ mass peak position and width as a function of V0 pT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaMassModel {
    /// `mean(p) = m0 + m1·exp(m2·p) + m3·exp(m4·p)`
    pub mean: [f64; 5],
    /// `sigma(p) = s0 + s1·p + s2·exp(s3·p)`
    pub sigma: [f64; 4],
}

impl Default for LambdaMassModel {
    fn default() -> Self {
        Self { mean: [1.116, 0.0, 0.0, 0.0, 0.0], sigma: [0.002, 0.0, 0.0, 0.0] }
    }
}

impl LambdaMassModel {
    /// Expected peak position.
    pub fn mean(&self, p: f64) -> f64 {
        let m = &self.mean;
        m[0] + m[1] * (m[2] * p).exp() + m[3] * (m[4] * p).exp()
    }

    /// Expected peak width.
    pub fn sigma(&self, p: f64) -> f64 {
        let s = &self.sigma;
        s[0] + s[1] * p + s[2] * (s[3] * p).exp()
    }

    /// Distance of `mass` from the expected peak, in units of the expected width.
    pub fn pull(&self, mass: f64, p: f64) -> f64 {
        (mass - self.mean(p)) / self.sigma(p)
    }
}

/// Momentum above which the 2.76 TeV V0 pointing cut is constant.
const COSPA_276TEV_P_THRESHOLD: f64 = 1.5;
/// Constant part of the 2.76 TeV V0 pointing cut.
const COSPA_276TEV_PLATEAU: f64 = 0.998;
/// Approximate Ξ bending angle.
const XI_BENDING: f64 = 0.03;
/// Maximum Λ qT in the Ω decay.
const LAMBDA_QT_MAX: f64 = 0.211;

/// Momentum-dependent V0 cos PA threshold used by the 2.76 TeV cascade analysis.
pub fn cospa_276tev(v0_total_momentum: f64) -> f64 {
    if v0_total_momentum < COSPA_276TEV_P_THRESHOLD {
        let at_threshold = ((LAMBDA_QT_MAX / COSPA_276TEV_P_THRESHOLD).atan() + XI_BENDING).cos();
        (COSPA_276TEV_PLATEAU / at_threshold)
            * ((LAMBDA_QT_MAX / v0_total_momentum).atan() + XI_BENDING).cos()
    } else {
        COSPA_276TEV_PLATEAU
    }
}

/// `Ok(())` when `ok`, otherwise the failed cut.
#[inline]
pub(crate) fn require<C>(ok: bool, cut: C) -> Result<(), C> {
    if ok { Ok(()) } else { Err(cut) }
}

/// Strict open window `lo < x < hi`.
#[inline]
pub(crate) fn within(x: f64, lo: f64, hi: f64) -> bool {
    lo < x && x < hi
}
