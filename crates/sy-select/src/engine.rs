//! Selection-and-fill engine.
//!
//! Every candidate is pre-screened once, then evaluated against every
//! configuration in registry order. There is no early exit across
//! configurations: a candidate can fill any number of accumulators.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use sy_core::{Error, Mergeable, Result};
use sy_hist::Histogram3D;

use crate::candidate::{Candidate, SkipReason};
use crate::registry::{Registry, Selection};

/// Counters collected while filling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Candidates seen.
    pub candidates: u64,
    /// Candidates rejected by the pre-screen, per reason.
    pub skipped: BTreeMap<SkipReason, u64>,
    /// Configuration × candidate predicate evaluations.
    pub evaluations: u64,
    /// Accumulator fills.
    pub fills: u64,
}

impl EngineStats {
    /// Candidates rejected by the pre-screen, all reasons.
    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().sum()
    }
}

impl Mergeable for EngineStats {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.candidates += other.candidates;
        self.evaluations += other.evaluations;
        self.fills += other.fills;
        for (reason, n) in &other.skipped {
            *self.skipped.entry(*reason).or_default() += n;
        }
        Ok(())
    }
}

fn admit<T: Candidate>(candidate: &T, stats: &mut EngineStats) -> bool {
    stats.candidates += 1;
    match candidate.prescreen() {
        Ok(()) => true,
        Err(reason) => {
            log::trace!("candidate skipped: {reason}");
            *stats.skipped.entry(reason).or_default() += 1;
            false
        }
    }
}

fn evaluate<C: Selection>(
    config: &C,
    accumulator: &mut Histogram3D,
    centrality: f64,
    candidate: &C::Candidate,
    stats: &mut EngineStats,
) {
    stats.evaluations += 1;
    match config.check(candidate) {
        Ok(mass) => {
            accumulator.fill(centrality, candidate.pt(), mass);
            stats.fills += 1;
        }
        Err(cut) => log::trace!("{}: rejected by {cut:?}", config.name()),
    }
}

/// Evaluate one candidate against every configuration of `registry`.
pub fn fill_candidate<C: Selection>(
    registry: &mut Registry<C>,
    centrality: f64,
    candidate: &C::Candidate,
    stats: &mut EngineStats,
) {
    if !admit(candidate, stats) {
        return;
    }
    for entry in registry.entries_mut() {
        evaluate(&entry.config, &mut entry.accumulator, centrality, candidate, stats);
    }
}

/// Evaluate a batch of candidates from one event.
pub fn fill_candidates<C: Selection>(
    registry: &mut Registry<C>,
    centrality: f64,
    candidates: &[C::Candidate],
) -> EngineStats {
    let mut stats = EngineStats::default();
    for candidate in candidates {
        fill_candidate(registry, centrality, candidate, &mut stats);
    }
    stats
}

/// Fill per-worker accumulator sets from `events` in parallel, then merge
/// them into `registry`.
///
/// `view` extracts the event centrality and its candidates. The result is
/// identical to filling the events sequentially.
pub fn fill_events_parallel<C, E, F>(
    registry: &mut Registry<C>,
    events: &[E],
    view: F,
) -> Result<EngineStats>
where
    C: Selection,
    E: Sync,
    F: Fn(&E) -> (f64, &[C::Candidate]) + Sync,
{
    let shared: &Registry<C> = registry;
    let init = || (shared.fresh_accumulators(), EngineStats::default());

    let (partial, stats) = events
        .par_iter()
        .fold(init, |(mut accumulators, mut stats), event| {
            let (centrality, candidates) = view(event);
            for candidate in candidates {
                if !admit(candidate, &mut stats) {
                    continue;
                }
                for (entry, acc) in shared.iter().zip(accumulators.iter_mut()) {
                    evaluate(&entry.config, acc, centrality, candidate, &mut stats);
                }
            }
            (accumulators, stats)
        })
        .map(Ok::<_, Error>)
        .try_reduce(init, |(mut a, mut sa), (b, sb)| {
            for (x, y) in a.iter_mut().zip(&b) {
                x.merge(y)?;
            }
            sa.merge(&sb)?;
            Ok((a, sa))
        })?;

    registry.absorb(&partial)?;
    log::debug!(
        "parallel fill: {} events, {} candidates, {} fills",
        events.len(),
        stats.candidates,
        stats.fills
    );
    Ok(stats)
}
