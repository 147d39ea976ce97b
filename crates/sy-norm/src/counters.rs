//! Per-run event counters.

use serde::{Deserialize, Serialize};
use sy_core::{Mergeable, Result};

/// Event counts in classification order.
///
/// `all` counts every event; `b`, `a`, `c`, `e` and `min_bias` count trigger
/// classes independently; `with_trigger`, `with_vertex` and `accepted` are
/// successive stages of the event selection, so each is a subset of the one
/// before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerCounters {
    /// All events.
    pub all: u64,
    /// Beam-beam (B) triggers.
    pub b: u64,
    /// A-side-only beam (A) triggers.
    pub a: u64,
    /// C-side-only beam (C) triggers.
    pub c: u64,
    /// Empty-bunch (E) triggers.
    pub e: u64,
    /// Minimum-bias (INEL) triggers.
    pub min_bias: u64,
    /// Events matching the trigger mask.
    pub with_trigger: u64,
    /// ...that also have a primary vertex.
    pub with_vertex: u64,
    /// ...whose vertex lies in the accepted range.
    pub accepted: u64,
}

impl TriggerCounters {
    /// Background-corrected beam-beam count `B − A − C + 2E`.
    pub fn good_events(&self) -> i64 {
        self.b as i64 - self.a as i64 - self.c as i64 + 2 * self.e as i64
    }
}

impl Mergeable for TriggerCounters {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.all += other.all;
        self.b += other.b;
        self.a += other.a;
        self.c += other.c;
        self.e += other.e;
        self.min_bias += other.min_bias;
        self.with_trigger += other.with_trigger;
        self.with_vertex += other.with_vertex;
        self.accepted += other.accepted;
        Ok(())
    }
}
