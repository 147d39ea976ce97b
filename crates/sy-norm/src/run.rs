//! Run lifecycle: accumulate events, then finalize into normalized yields.

use serde::{Deserialize, Serialize};
use sy_core::{Error, Mergeable, NamedList, Result};
use sy_hist::{Histogram1D, Histogram2D};

use crate::counters::TriggerCounters;
use crate::projection::{Projection, ZeroErrorPolicy};
use crate::rebin::rebin;
use crate::symmetrize::symmetrize;
use crate::trigger::{EventClassifier, TriggerBits, TriggerMask};

/// Normalization options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Name of the data sum; output histograms derive their names from it.
    pub name: String,
    /// Required trigger classes, e.g. `"INEL"` or `"INEL>0"`.
    pub trigger_mask: TriggerMask,
    /// Lower edge of the accepted vertex z range (cm).
    pub vtx_min: f64,
    /// Upper edge of the accepted vertex z range (cm).
    pub vtx_max: f64,
    /// Correct projections for cells without content.
    pub correct_empty: bool,
    /// Rebin factor; `<= 1` disables rebinning.
    pub rebin: usize,
    /// Drop bins next to an empty bin when rebinning.
    pub cut_edges: bool,
    /// Also produce mirrored yields.
    pub symmetrize: bool,
    /// Zero-error handling of the acceptance profile.
    pub acceptance_errors: ZeroErrorPolicy,
    /// Zero-error handling of the raw yield.
    pub yield_errors: ZeroErrorPolicy,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            name: "Forward".into(),
            trigger_mask: TriggerMask::INEL,
            vtx_min: -10.0,
            vtx_max: 10.0,
            correct_empty: true,
            rebin: 5,
            cut_edges: false,
            symmetrize: true,
            acceptance_errors: ZeroErrorPolicy::SkipZeroError,
            yield_errors: ZeroErrorPolicy::UnitError,
        }
    }
}

impl NormalizationConfig {
    /// Name of the Monte-Carlo sum.
    pub fn mc_name(&self) -> String {
        format!("{}MC", self.name)
    }

    fn classifier(&self) -> EventClassifier {
        EventClassifier { mask: self.trigger_mask, vtx_min: self.vtx_min, vtx_max: self.vtx_max }
    }
}

/// The part of an event the normalization consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardEvent {
    /// Trigger classes fired.
    pub triggers: TriggerBits,
    /// Primary vertex z (cm), absent when no vertex was found.
    pub ip_z: Option<f64>,
    /// η × vertex-bin histogram of this event.
    pub forward: Option<Histogram2D>,
    /// Monte-Carlo truth counterpart of `forward`.
    pub forward_mc: Option<Histogram2D>,
}

/// Lifecycle phase of a [`RunState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Events can be processed.
    Accumulating,
    /// Outputs were produced; only [`RunState::reset`] is allowed.
    Finalized,
}

/// Acceptance-corrected yields derived from one sum histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldSet {
    /// Acceptance profile (underflow vertex bins), per accepted event.
    /// `None` when no cell contributed.
    pub acceptance: Option<Histogram1D>,
    /// Normalized dN/dη, `None` when either projection is empty.
    pub dndeta: Option<Histogram1D>,
    /// Mirror of `dndeta`.
    pub mirrored: Option<Histogram1D>,
    /// Rebinned `dndeta`.
    pub rebinned: Option<Histogram1D>,
    /// Mirror of `rebinned`.
    pub rebinned_mirrored: Option<Histogram1D>,
}

impl YieldSet {
    /// Every histogram of the set, in output order.
    pub fn histograms(&self) -> impl Iterator<Item = &Histogram1D> {
        [
            self.mirrored.as_ref(),
            self.dndeta.as_ref(),
            self.acceptance.as_ref(),
            self.rebinned.as_ref(),
            self.rebinned_mirrored.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Everything a finalized run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationOutput {
    /// Counters at finalization.
    pub counters: TriggerCounters,
    /// Good-event count used for normalization (after the min-bias fallback).
    pub good_events: i64,
    /// `(min_bias / with_trigger) · (accepted / good)`, `None` without good events.
    pub vertex_efficiency: Option<f64>,
    /// `accepted / good`, `None` without good events.
    pub normalization: Option<f64>,
    /// Data yields.
    pub data: YieldSet,
    /// Monte-Carlo yields, when a Monte-Carlo sum was accumulated.
    pub mc: Option<YieldSet>,
    /// Trigger mask as text.
    pub trigger: String,
    /// Accepted vertex z range (cm).
    pub vtx_range: (f64, f64),
}

impl NormalizationOutput {
    /// All output histograms by name.
    pub fn objects(&self) -> NamedList<Histogram1D> {
        let mut list = NamedList::new();
        for h in self.data.histograms().chain(self.mc.iter().flat_map(YieldSet::histograms)) {
            list.push(h.name.clone(), h.clone());
        }
        list
    }
}

/// Per-run normalization state, owned by the caller and passed to the event loop.
#[derive(Debug, Clone)]
pub struct RunState {
    config: NormalizationConfig,
    counters: TriggerCounters,
    sums: NamedList<Histogram2D>,
    phase: RunPhase,
}

impl RunState {
    /// Fresh accumulating state.
    pub fn new(config: NormalizationConfig) -> Self {
        Self { config, counters: TriggerCounters::default(), sums: NamedList::new(), phase: RunPhase::Accumulating }
    }

    /// Options of this run.
    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    /// Counters so far.
    pub fn counters(&self) -> &TriggerCounters {
        &self.counters
    }

    /// Current phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Sum histogram by name.
    pub fn sum(&self, name: &str) -> Option<&Histogram2D> {
        self.sums.find(name)
    }

    /// Back to an empty accumulating state, keeping the options.
    pub fn reset(&mut self) {
        self.counters = TriggerCounters::default();
        self.sums = NamedList::new();
        self.phase = RunPhase::Accumulating;
    }

    fn ensure_accumulating(&self) -> Result<()> {
        match self.phase {
            RunPhase::Accumulating => Ok(()),
            RunPhase::Finalized => {
                Err(Error::Validation("run is finalized; reset it before adding events".into()))
            }
        }
    }

    /// Classify one event and, if accepted, add its histograms to the sums.
    ///
    /// An event without a data histogram is skipped with a warning and not
    /// counted. Returns whether the event was accepted.
    pub fn process(&mut self, event: &ForwardEvent) -> Result<bool> {
        self.ensure_accumulating()?;
        let Some(data) = &event.forward else {
            log::warn!("no forward histogram in event, skipping");
            return Ok(false);
        };
        data.validate()?;

        // Sums take their binning from the first event that carries them.
        let name = self.config.name.clone();
        if self.sums.find(&name).is_none() {
            self.sums.push(name.clone(), data.empty_like(name.clone()));
        }
        let mc_name = self.config.mc_name();
        if let Some(mc) = &event.forward_mc {
            mc.validate()?;
            if self.sums.find(&mc_name).is_none() {
                self.sums.push(mc_name.clone(), mc.empty_like(mc_name.clone()));
            }
        }

        if !self.config.classifier().classify(&mut self.counters, &event.triggers, event.ip_z) {
            return Ok(false);
        }

        if let Some(sum) = self.sums.find_mut(&name) {
            sum.merge(data)?;
        }
        if let (Some(mc), Some(sum)) = (&event.forward_mc, self.sums.find_mut(&mc_name)) {
            sum.merge(mc)?;
        }
        Ok(true)
    }

    /// Produce the normalized outputs and move to [`RunPhase::Finalized`].
    ///
    /// Fails, leaving the state untouched, when the data sum is missing or no
    /// event passed the trigger selection. Every other shortfall is logged and
    /// shows up as a missing value in the output.
    pub fn finalize(&mut self) -> Result<NormalizationOutput> {
        self.ensure_accumulating()?;
        let name = &self.config.name;
        let sum = self.sums.find(name).ok_or_else(|| Error::MissingObject(name.clone()))?;

        let n = self.counters;
        if n.with_trigger == 0 {
            return Err(Error::Finalization("number of triggered events <= 0".into()));
        }
        let mut good = n.good_events();
        if good <= 0 {
            log::warn!(
                "number of good events = {good} = {} - {} - {} + 2*{} <= 0, using min-bias count {}",
                n.b,
                n.a,
                n.c,
                n.e,
                n.min_bias
            );
            good = n.min_bias as i64;
        }
        // Without any good events the yields keep their bin-width scaling only.
        let normalization = if good > 0 {
            Some(n.accepted as f64 / good as f64)
        } else {
            log::warn!("no good or min-bias events, yields are left unnormalized");
            None
        };
        let vertex_efficiency = normalization.map(|norm| n.min_bias as f64 / n.with_trigger as f64 * norm);
        log::info!(
            "{} events: {} min-bias, {} with {} trigger, {} with vertex, {} in [{:+.1}, {:+.1}] cm; \
             B={} A={} C={} E={} -> {} good; vertex efficiency {:?} ({:?})",
            n.all,
            n.min_bias,
            n.with_trigger,
            self.config.trigger_mask,
            n.with_vertex,
            n.accepted,
            self.config.vtx_min,
            self.config.vtx_max,
            n.b,
            n.a,
            n.c,
            n.e,
            good,
            vertex_efficiency,
            normalization
        );

        let scale = normalization.unwrap_or(1.0);
        let data = self.yields(sum, name, scale)?;
        let mc_name = self.config.mc_name();
        let mc = match self.sums.find(&mc_name) {
            Some(sum_mc) => Some(self.yields(sum_mc, &mc_name, scale)?),
            None => None,
        };

        let output = NormalizationOutput {
            counters: n,
            good_events: good,
            vertex_efficiency,
            normalization,
            data,
            mc,
            trigger: self.config.trigger_mask.to_string(),
            vtx_range: (self.config.vtx_min, self.config.vtx_max),
        };
        self.phase = RunPhase::Finalized;
        Ok(output)
    }

    fn yields(&self, sum: &Histogram2D, label: &str, normalization: f64) -> Result<YieldSet> {
        let cfg = &self.config;
        let acceptance_projection = Projection {
            first: 0,
            last: Some(1),
            correct_empty: cfg.correct_empty,
            zero_error: cfg.acceptance_errors,
        };
        let raw_projection =
            Projection { first: 1, last: None, correct_empty: cfg.correct_empty, zero_error: cfg.yield_errors };

        let mut acceptance = acceptance_projection.project(sum, format!("norm{label}"));
        let raw = raw_projection.project(sum, format!("dndeta{label}"));

        let dndeta = match (raw, &acceptance) {
            (Some(mut dndeta), Some(acc)) => {
                dndeta.divide(acc)?;
                dndeta.scale_by_width(normalization);
                Some(dndeta)
            }
            _ => {
                log::warn!("no dN/deta for '{label}': empty projection");
                None
            }
        };
        if let Some(acc) = acceptance.as_mut() {
            acc.scale(1.0 / self.counters.accepted.max(1) as f64);
        }

        let rebinned = dndeta.as_ref().and_then(|h| rebin(h, cfg.rebin, cfg.cut_edges));
        let (mirrored, rebinned_mirrored) = if cfg.symmetrize {
            (dndeta.as_ref().map(symmetrize), rebinned.as_ref().map(symmetrize))
        } else {
            (None, None)
        };
        Ok(YieldSet { acceptance, dndeta, mirrored, rebinned, rebinned_mirrored })
    }
}

impl Mergeable for RunState {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.ensure_accumulating()?;
        other.ensure_accumulating()?;
        self.counters.merge(&other.counters)?;
        for (name, sum) in other.sums.iter() {
            match self.sums.find_mut(name) {
                Some(mine) => mine.merge(sum)?,
                None => {
                    self.sums.push(name, sum.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sy_hist::Axis;

    fn event_hist(name: &str) -> Histogram2D {
        // 4 eta bins on [0, 2] × 2 vertex bins; y cell 0 carries the acceptance.
        let mut h = Histogram2D::new(
            name,
            Axis::uniform(4, 0.0, 2.0).unwrap(),
            Axis::uniform(2, -10.0, 10.0).unwrap(),
        );
        for ix in 1..=4 {
            h.set_cell(ix, 0, 1.0, 1.0);
            h.set_cell(ix, 1, ix as f64, 1.0);
            h.set_cell(ix, 2, ix as f64, 1.0);
        }
        h
    }

    fn mb_event(z: f64) -> ForwardEvent {
        ForwardEvent {
            triggers: TriggerBits { inel: true, b: true, ..Default::default() },
            ip_z: Some(z),
            forward: Some(event_hist("forward")),
            forward_mc: None,
        }
    }

    fn config() -> NormalizationConfig {
        NormalizationConfig { rebin: 2, ..Default::default() }
    }

    #[test]
    fn only_accepted_events_are_summed() {
        let mut run = RunState::new(config());
        assert!(run.process(&mb_event(0.0)).unwrap());
        assert!(!run.process(&mb_event(12.0)).unwrap());
        let sum = run.sum("Forward").unwrap();
        assert_eq!(sum.cell_content(2, 1), 2.0);
        assert_eq!(run.counters().all, 2);
        assert_eq!(run.counters().accepted, 1);
    }

    #[test]
    fn event_without_histogram_is_not_counted() {
        let mut run = RunState::new(config());
        let mut e = mb_event(0.0);
        e.forward = None;
        assert!(!run.process(&e).unwrap());
        assert_eq!(run.counters().all, 0);
    }

    #[test]
    fn finalize_produces_named_outputs() {
        let mut run = RunState::new(config());
        for _ in 0..4 {
            run.process(&mb_event(1.0)).unwrap();
        }
        let out = run.finalize().unwrap();
        assert_eq!(run.phase(), RunPhase::Finalized);
        assert_eq!(out.good_events, 4);
        assert_relative_eq!(out.normalization.unwrap(), 1.0);
        assert_relative_eq!(out.vertex_efficiency.unwrap(), 1.0);

        // Acceptance sums y cells 0..=1, the raw yield y cells 1..=2:
        // 8·ix / (4 + 4·ix), divided by the 0.5 bin width.
        assert_relative_eq!(out.data.dndeta.as_ref().unwrap().bin_content(3), 3.0);
        assert_relative_eq!(out.data.acceptance.as_ref().unwrap().bin_content(3), 4.0);

        let names: Vec<String> = out.objects().iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(
            names,
            [
                "dndetaForward_mirror",
                "dndetaForward",
                "normForward",
                "dndetaForward_rebin02",
                "dndetaForward_rebin02_mirror",
            ]
        );
        assert!(run.process(&mb_event(0.0)).is_err());
        assert!(run.finalize().is_err());

        run.reset();
        assert_eq!(run.phase(), RunPhase::Accumulating);
        assert!(run.sum("Forward").is_none());
    }

    #[test]
    fn no_trigger_is_fatal_without_output() {
        let mut run = RunState::new(NormalizationConfig {
            trigger_mask: TriggerMask::NSD,
            ..config()
        });
        run.process(&mb_event(0.0)).unwrap();
        let err = run.finalize().unwrap_err();
        assert!(matches!(err, Error::Finalization(_)));
        assert_eq!(run.phase(), RunPhase::Accumulating);
    }

    #[test]
    fn missing_sum_is_reported() {
        let mut run = RunState::new(config());
        assert!(matches!(run.finalize(), Err(Error::MissingObject(_))));
    }

    #[test]
    fn mc_sum_runs_the_same_steps() {
        let mut run = RunState::new(NormalizationConfig { symmetrize: false, ..config() });
        let mut e = mb_event(0.0);
        e.forward_mc = Some(event_hist("truth"));
        run.process(&e).unwrap();
        let out = run.finalize().unwrap();
        let mc = out.mc.unwrap();
        assert_eq!(mc.dndeta.unwrap().name, "dndetaForwardMC");
        assert_eq!(mc.acceptance.unwrap().name, "normForwardMC");
        assert!(mc.mirrored.is_none());
        assert_eq!(mc.rebinned.unwrap().name, "dndetaForwardMC_rebin02");
    }

    #[test]
    fn partial_runs_merge() {
        let mut a = RunState::new(config());
        let mut b = RunState::new(config());
        a.process(&mb_event(0.0)).unwrap();
        b.process(&mb_event(0.0)).unwrap();
        b.process(&mb_event(0.0)).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.counters().accepted, 3);
        assert_eq!(a.sum("Forward").unwrap().cell_content(1, 1), 3.0);
    }

    #[test]
    fn triggered_without_good_events_still_finalizes() {
        let mut run = RunState::new(NormalizationConfig {
            trigger_mask: TriggerMask::NSD,
            symmetrize: false,
            ..config()
        });
        let mut e = mb_event(0.0);
        e.triggers = TriggerBits { nsd: true, ..Default::default() };
        assert!(run.process(&e).unwrap());
        assert_eq!(run.counters().min_bias, 0);

        let out = run.finalize().unwrap();
        assert_eq!(out.good_events, 0);
        assert!(out.normalization.is_none());
        assert!(out.vertex_efficiency.is_none());
        // Only the 0.5 bin width scales the ratio 2·ix / (1 + ix).
        assert_relative_eq!(out.data.dndeta.unwrap().bin_content(3), 3.0);
    }

    #[test]
    fn empty_sum_gives_no_yields() {
        let mut run = RunState::new(config());
        let mut e = mb_event(0.0);
        e.forward.as_mut().unwrap().reset();
        run.process(&e).unwrap();

        let out = run.finalize().unwrap();
        assert!(out.data.acceptance.is_none());
        assert!(out.data.dndeta.is_none());
        assert!(out.data.rebinned.is_none());
        assert!(out.data.mirrored.is_none());
        assert_eq!(out.objects().len(), 0);
    }
}
