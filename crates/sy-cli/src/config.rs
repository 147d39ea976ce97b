//! Run configuration (YAML or JSON).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use sy_norm::NormalizationConfig;
use sy_select::{CascadeConfig, CascadeRegistry, V0Config, V0Registry, presets};

/// Stock V0 configuration sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum V0Preset {
    /// Central selections plus single-variable sweeps.
    TopologicalQa {
        /// Points per sweep.
        steps: usize,
    },
}

/// Stock cascade configuration sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum CascadePreset {
    /// Vertexer-level selections plus single-variable sweeps.
    TopologicalQa {
        /// Points per sweep.
        steps: usize,
    },
    /// 2.76 TeV selections with rapidity slices.
    #[serde(rename = "cascade_276tev")]
    Cascade276TeV,
}

/// Presets followed by explicit configurations, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "P: Deserialize<'de>, C: Deserialize<'de>"))]
pub struct SelectionSet<P, C> {
    /// Stock sets, expanded first.
    pub presets: Vec<P>,
    /// Hand-written configurations.
    pub configurations: Vec<C>,
}

impl<P, C> Default for SelectionSet<P, C> {
    fn default() -> Self {
        Self { presets: Vec::new(), configurations: Vec::new() }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Task name, echoed in the output.
    #[serde(default = "default_task")]
    pub task: String,

    /// Threads (0 = auto). Use 1 for sequential filling.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Two-prong selections.
    #[serde(default)]
    pub v0: SelectionSet<V0Preset, V0Config>,

    /// Cascade selections.
    #[serde(default)]
    pub cascade: SelectionSet<CascadePreset, CascadeConfig>,

    /// dN/dη normalization; omitted to skip it.
    #[serde(default)]
    pub normalization: Option<NormalizationConfig>,
}

fn default_task() -> String {
    "StrangeYield".to_string()
}

fn default_threads() -> usize {
    1
}

impl RunConfig {
    /// Two-prong registry: presets first, then explicit configurations.
    pub fn v0_registry(&self) -> Result<V0Registry> {
        let mut registry = V0Registry::new();
        for preset in &self.v0.presets {
            match preset {
                V0Preset::TopologicalQa { steps } => {
                    registry.extend(presets::topological_qa_v0(*steps))?
                }
            }
        }
        registry.extend(self.v0.configurations.iter().cloned())?;
        Ok(registry)
    }

    /// Cascade registry: presets first, then explicit configurations.
    pub fn cascade_registry(&self) -> Result<CascadeRegistry> {
        let mut registry = CascadeRegistry::new();
        for preset in &self.cascade.presets {
            match preset {
                CascadePreset::TopologicalQa { steps } => {
                    registry.extend(presets::topological_qa_cascade(*steps))?
                }
                CascadePreset::Cascade276TeV => registry.extend(presets::cascade_276tev())?,
            }
        }
        registry.extend(self.cascade.configurations.iter().cloned())?;
        Ok(registry)
    }
}

/// Read a run configuration; `.json` files are JSON, anything else YAML.
pub fn read_run_config(path: &Path) -> Result<RunConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: RunConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    Ok(cfg)
}
