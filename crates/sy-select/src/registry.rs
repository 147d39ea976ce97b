//! Ordered registry of named configurations and their accumulators.

use std::fmt::Debug;

use sy_core::{Error, Mergeable, NamedList, Result};
use sy_hist::Histogram3D;

use crate::binning::ResultBinning;
use crate::candidate::Candidate;

/// A named cut configuration that can accept or reject candidates.
///
/// Implementations are immutable while the engine runs and are shared
/// read-only between worker threads.
pub trait Selection: Clone + Send + Sync {
    /// Candidate type this configuration evaluates.
    type Candidate: Candidate + Sync;
    /// First failing cut reported by [`Selection::check`].
    type Rejection: Copy + Debug;

    /// Configuration name.
    fn name(&self) -> &str;

    /// Rename (used when deriving configurations).
    fn set_name(&mut self, name: String);

    /// Accumulator binning.
    fn binning(&self) -> &ResultBinning;

    /// Evaluate the full predicate. On pass returns the invariant mass to
    /// fill under this configuration's hypothesis.
    fn check(&self, candidate: &Self::Candidate) -> std::result::Result<f64, Self::Rejection>;

    /// [`Selection::check`] without the rejection detail.
    fn select(&self, candidate: &Self::Candidate) -> Option<f64> {
        self.check(candidate).ok()
    }
}

/// One registry entry: a configuration and the accumulator it owns.
#[derive(Debug, Clone)]
pub struct ResultEntry<C> {
    /// Configuration.
    pub config: C,
    /// Centrality × pT × mass accumulator.
    pub accumulator: Histogram3D,
}

/// Append-only, insertion-ordered configuration registry.
///
/// Lookup by name goes through a map built on insertion. Duplicate names are
/// accepted; lookup returns the first one.
#[derive(Debug, Clone)]
pub struct Registry<C: Selection> {
    entries: NamedList<ResultEntry<C>>,
}

impl<C: Selection> Default for Registry<C> {
    fn default() -> Self {
        Self { entries: NamedList::new() }
    }
}

impl<C: Selection> Registry<C> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `config` with a zeroed accumulator built from its binning.
    /// Returns the configuration index.
    pub fn add_configuration(&mut self, config: C) -> Result<usize> {
        let accumulator = config.binning().accumulator(config.name())?;
        let name = config.name().to_string();
        log::trace!("adding configuration '{name}'");
        Ok(self.entries.push(name, ResultEntry { config, accumulator }))
    }

    /// Append every configuration in order.
    pub fn extend(&mut self, configs: impl IntoIterator<Item = C>) -> Result<()> {
        for config in configs {
            self.add_configuration(config)?;
        }
        Ok(())
    }

    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no configuration was added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configuration at `index`.
    pub fn configuration(&self, index: usize) -> Option<&C> {
        self.entries.get(index).map(|e| &e.config)
    }

    /// Entry at `index`.
    pub fn entry(&self, index: usize) -> Option<&ResultEntry<C>> {
        self.entries.get(index)
    }

    /// Index of the first configuration named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.position(name)
    }

    /// First configuration named `name`.
    pub fn find(&self, name: &str) -> Option<&C> {
        self.entries.find(name).map(|e| &e.config)
    }

    /// Accumulator of configuration `index`.
    pub fn accumulator(&self, index: usize) -> Option<&Histogram3D> {
        self.entries.get(index).map(|e| &e.accumulator)
    }

    /// Accumulator of the first configuration named `name`.
    pub fn accumulator_by_name(&self, name: &str) -> Option<&Histogram3D> {
        self.entries.find(name).map(|e| &e.accumulator)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry<C>> {
        self.entries.values()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut ResultEntry<C>> {
        self.entries.values_mut()
    }

    /// Zeroed accumulators with the same binning, one per configuration, in order.
    pub fn fresh_accumulators(&self) -> Vec<Histogram3D> {
        self.iter().map(|e| e.accumulator.empty_like()).collect()
    }

    /// Add per-worker accumulators (as from [`Registry::fresh_accumulators`]) bin by bin.
    pub fn absorb(&mut self, partial: &[Histogram3D]) -> Result<()> {
        if partial.len() != self.len() {
            return Err(Error::Validation(format!(
                "cannot absorb {} accumulators into a registry of {}",
                partial.len(),
                self.len()
            )));
        }
        for (entry, acc) in self.entries.values_mut().zip(partial) {
            entry.accumulator.merge(acc)?;
        }
        Ok(())
    }

    /// Zero every accumulator, keeping the configurations.
    pub fn reset_accumulators(&mut self) {
        for entry in self.entries.values_mut() {
            entry.accumulator = entry.accumulator.empty_like();
        }
    }
}

impl<C: Selection> Mergeable for Registry<C> {
    fn merge(&mut self, other: &Self) -> Result<()> {
        let partial: Vec<Histogram3D> = other.iter().map(|e| e.accumulator.clone()).collect();
        self.absorb(&partial)
    }
}
