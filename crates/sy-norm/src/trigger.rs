//! Trigger classes, the selection mask and event classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::counters::TriggerCounters;

/// Trigger classes fired in one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerBits {
    /// Inelastic (minimum bias).
    pub inel: bool,
    /// Inelastic with at least one charged particle in |η| < 1.
    pub inel_gt0: bool,
    /// Non-single-diffractive.
    pub nsd: bool,
    /// Beam-beam crossing.
    pub b: bool,
    /// A-side beam only.
    pub a: bool,
    /// C-side beam only.
    pub c: bool,
    /// Empty bunch.
    pub e: bool,
}

/// Trigger classes an event must carry (all of them) to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerMask {
    inel: bool,
    inel_gt0: bool,
    nsd: bool,
}

impl TriggerMask {
    /// INEL.
    pub const INEL: Self = Self { inel: true, inel_gt0: false, nsd: false };
    /// INEL>0.
    pub const INEL_GT0: Self = Self { inel: false, inel_gt0: true, nsd: false };
    /// NSD.
    pub const NSD: Self = Self { inel: false, inel_gt0: false, nsd: true };

    /// Parse a mask such as `"INEL"`, `"inel>0"` or `"INEL | NSD"`.
    ///
    /// Tokens are separated by spaces, commas or `|` and compared without
    /// case. Unknown tokens are ignored with a warning; a mask with no known
    /// token falls back to INEL.
    pub fn parse(mask: &str) -> Self {
        let mut out = Self { inel: false, inel_gt0: false, nsd: false };
        for token in mask.split([' ', ',', '|']).filter(|t| !t.is_empty()) {
            match token.to_ascii_uppercase().as_str() {
                "INEL" => out.inel = true,
                "INEL>0" => out.inel_gt0 = true,
                "NSD" => out.nsd = true,
                _ => log::warn!("unknown trigger '{token}' in mask '{mask}'"),
            }
        }
        if out.is_empty() {
            log::warn!("trigger mask '{mask}' selects nothing, using INEL");
            return Self::INEL;
        }
        out
    }

    fn is_empty(&self) -> bool {
        !(self.inel || self.inel_gt0 || self.nsd)
    }

    /// Whether `bits` carries every class of this mask.
    pub fn matches(&self, bits: &TriggerBits) -> bool {
        (!self.inel || bits.inel) && (!self.inel_gt0 || bits.inel_gt0) && (!self.nsd || bits.nsd)
    }
}

impl Default for TriggerMask {
    fn default() -> Self {
        Self::INEL
    }
}

impl fmt::Display for TriggerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [(self.inel, "INEL"), (self.inel_gt0, "INEL>0"), (self.nsd, "NSD")]
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
        f.write_str(&names.join(" "))
    }
}

impl FromStr for TriggerMask {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl TryFrom<String> for TriggerMask {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&s))
    }
}

impl From<TriggerMask> for String {
    fn from(mask: TriggerMask) -> Self {
        mask.to_string()
    }
}

/// Event selection: trigger mask, then vertex presence, then vertex range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventClassifier {
    /// Required trigger classes.
    pub mask: TriggerMask,
    /// Lower edge of the accepted vertex z range (cm, inclusive).
    pub vtx_min: f64,
    /// Upper edge of the accepted vertex z range (cm, inclusive).
    pub vtx_max: f64,
}

impl EventClassifier {
    /// Count one event into `counters`; returns whether it is accepted.
    pub fn classify(
        &self,
        counters: &mut TriggerCounters,
        bits: &TriggerBits,
        ip_z: Option<f64>,
    ) -> bool {
        counters.all += 1;
        counters.b += u64::from(bits.b);
        counters.a += u64::from(bits.a);
        counters.c += u64::from(bits.c);
        counters.e += u64::from(bits.e);
        counters.min_bias += u64::from(bits.inel);

        if !self.mask.matches(bits) {
            return false;
        }
        counters.with_trigger += 1;

        let Some(z) = ip_z else {
            return false;
        };
        counters.with_vertex += 1;

        if !(self.vtx_min..=self.vtx_max).contains(&z) {
            return false;
        }
        counters.accepted += 1;
        true
    }
}
