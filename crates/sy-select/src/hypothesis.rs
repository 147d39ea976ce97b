//! Mass hypotheses and their strategy tables.
//!
//! Each hypothesis resolves, once, to a static table of accessors: which
//! invariant mass and rapidity field of the candidate belong to it, its PDG
//! mass, and which species each daughter is expected to be. Cut predicates
//! only ever go through the table.

use serde::{Deserialize, Serialize};

use crate::candidate::{CascadeCandidate, V0Candidate};

/// PDG mass of K0S used in the lifetime proxy.
pub const K0SHORT_MASS: f64 = 0.497;
/// PDG mass of Λ.
pub const LAMBDA_MASS: f64 = 1.115683;
/// PDG mass of Ξ.
pub const XI_MASS: f64 = 1.32171;
/// PDG mass of Ω.
pub const OMEGA_MASS: f64 = 1.67245;
/// Λ mass used for the V0 mass window in cascades.
pub const LAMBDA_WINDOW_CENTER: f64 = 1.116;

/// Particle species for PID lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    /// π±
    Pion,
    /// K±
    Kaon,
    /// p / anti-p
    Proton,
}

/// V0 daughter leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Positive daughter.
    Pos,
    /// Negative daughter.
    Neg,
}

/// Two-prong mass hypotheses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum V0Hypothesis {
    /// K0S → π+ π−
    #[default]
    K0Short,
    /// Λ → p π−
    Lambda,
    /// anti-Λ → anti-p π+
    AntiLambda,
}

/// Accessor table for one V0 hypothesis.
pub struct V0Strategy {
    /// Particle name used in configuration names.
    pub particle: &'static str,
    /// Mass used in the lifetime proxy.
    pub pdg_mass: f64,
    /// Invariant mass under this hypothesis.
    pub mass: fn(&V0Candidate) -> f64,
    /// Rapidity under this hypothesis.
    pub rapidity: fn(&V0Candidate) -> f64,
    /// Expected species of the negative daughter.
    pub neg: Species,
    /// Expected species of the positive daughter.
    pub pos: Species,
    /// Baryon daughter, if any.
    pub baryon: Option<Leg>,
}

static K0SHORT: V0Strategy = V0Strategy {
    particle: "K0Short",
    pdg_mass: K0SHORT_MASS,
    mass: |c| c.mass_k0short,
    rapidity: |c| c.rap_k0short,
    neg: Species::Pion,
    pos: Species::Pion,
    baryon: None,
};

static LAMBDA: V0Strategy = V0Strategy {
    particle: "Lambda",
    pdg_mass: LAMBDA_MASS,
    mass: |c| c.mass_lambda,
    rapidity: |c| c.rap_lambda,
    neg: Species::Pion,
    pos: Species::Proton,
    baryon: Some(Leg::Pos),
};

static ANTILAMBDA: V0Strategy = V0Strategy {
    particle: "AntiLambda",
    pdg_mass: LAMBDA_MASS,
    mass: |c| c.mass_antilambda,
    rapidity: |c| c.rap_lambda,
    neg: Species::Proton,
    pos: Species::Pion,
    baryon: Some(Leg::Neg),
};

impl V0Hypothesis {
    /// All V0 hypotheses in preset order.
    pub const ALL: [Self; 3] = [Self::K0Short, Self::Lambda, Self::AntiLambda];

    /// Strategy table.
    pub fn strategy(self) -> &'static V0Strategy {
        match self {
            Self::K0Short => &K0SHORT,
            Self::Lambda => &LAMBDA,
            Self::AntiLambda => &ANTILAMBDA,
        }
    }

    /// Particle name.
    pub fn particle(self) -> &'static str {
        self.strategy().particle
    }
}

/// Three-prong mass hypotheses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CascadeHypothesis {
    /// Ξ− → Λ π−
    #[default]
    XiMinus,
    /// Ξ+ → anti-Λ π+
    XiPlus,
    /// Ω− → Λ K−
    OmegaMinus,
    /// Ω+ → anti-Λ K+
    OmegaPlus,
}

/// Accessor table for one cascade hypothesis.
pub struct CascadeStrategy {
    /// Particle name used in configuration names.
    pub particle: &'static str,
    /// Expected cascade charge.
    pub charge: i8,
    /// Mass used in the lifetime proxy.
    pub pdg_mass: f64,
    /// Cascade invariant mass under this hypothesis.
    pub mass: fn(&CascadeCandidate) -> f64,
    /// V0 invariant mass under the matching (anti-)Λ hypothesis.
    pub v0_mass: fn(&CascadeCandidate) -> f64,
    /// Rapidity under this hypothesis.
    pub rapidity: fn(&CascadeCandidate) -> f64,
    /// Expected species of the negative V0 daughter.
    pub neg: Species,
    /// Expected species of the positive V0 daughter.
    pub pos: Species,
    /// Expected species of the bachelor.
    pub bach: Species,
    /// Ω hypotheses carry the competing-Ξ rejection.
    pub is_omega: bool,
}

static XI_MINUS: CascadeStrategy = CascadeStrategy {
    particle: "XiMinus",
    charge: -1,
    pdg_mass: XI_MASS,
    mass: |c| c.mass_xi,
    v0_mass: |c| c.v0_mass_lambda,
    rapidity: |c| c.rap_xi,
    neg: Species::Pion,
    pos: Species::Proton,
    bach: Species::Pion,
    is_omega: false,
};

static XI_PLUS: CascadeStrategy = CascadeStrategy {
    particle: "XiPlus",
    charge: 1,
    pdg_mass: XI_MASS,
    mass: |c| c.mass_xi,
    v0_mass: |c| c.v0_mass_antilambda,
    rapidity: |c| c.rap_xi,
    neg: Species::Proton,
    pos: Species::Pion,
    bach: Species::Pion,
    is_omega: false,
};

static OMEGA_MINUS: CascadeStrategy = CascadeStrategy {
    particle: "OmegaMinus",
    charge: -1,
    pdg_mass: OMEGA_MASS,
    mass: |c| c.mass_omega,
    v0_mass: |c| c.v0_mass_lambda,
    rapidity: |c| c.rap_omega,
    neg: Species::Pion,
    pos: Species::Proton,
    bach: Species::Kaon,
    is_omega: true,
};

static OMEGA_PLUS: CascadeStrategy = CascadeStrategy {
    particle: "OmegaPlus",
    charge: 1,
    pdg_mass: OMEGA_MASS,
    mass: |c| c.mass_omega,
    v0_mass: |c| c.v0_mass_antilambda,
    rapidity: |c| c.rap_omega,
    neg: Species::Proton,
    pos: Species::Pion,
    bach: Species::Kaon,
    is_omega: true,
};

impl CascadeHypothesis {
    /// All cascade hypotheses in preset order.
    pub const ALL: [Self; 4] = [Self::XiMinus, Self::XiPlus, Self::OmegaMinus, Self::OmegaPlus];

    /// Strategy table.
    pub fn strategy(self) -> &'static CascadeStrategy {
        match self {
            Self::XiMinus => &XI_MINUS,
            Self::XiPlus => &XI_PLUS,
            Self::OmegaMinus => &OMEGA_MINUS,
            Self::OmegaPlus => &OMEGA_PLUS,
        }
    }

    /// Particle name.
    pub fn particle(self) -> &'static str {
        self.strategy().particle
    }

    /// Ω− or Ω+.
    pub fn is_omega(self) -> bool {
        self.strategy().is_omega
    }
}
