//! JSON-lines event input.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use sy_norm::ForwardEvent;
use sy_select::{CascadeCandidate, V0Candidate};

/// One event: centrality, candidates and the normalization inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    /// Centrality percentile.
    pub centrality: f64,
    /// Two-prong candidates.
    pub v0s: Vec<V0Candidate>,
    /// Cascade candidates.
    pub cascades: Vec<CascadeCandidate>,
    /// Triggers, vertex and forward histograms.
    #[serde(flatten)]
    pub forward: ForwardEvent,
}

/// Read one record per non-empty line.
pub fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut events = Vec::new();
    for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: EventRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid event record", path.display(), i + 1))?;
        events.push(event);
    }
    Ok(events)
}
