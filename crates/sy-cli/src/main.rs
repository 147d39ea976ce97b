//! StrangeYield CLI

mod config;
mod events;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use sy_core::Mergeable;
use sy_norm::RunState;
use sy_select::engine::{self, EngineStats};
use sy_select::{Registry, Selection, presets};

use crate::config::read_run_config;
use crate::events::{EventRecord, read_events};

#[derive(Parser)]
#[command(name = "strangeyield")]
#[command(about = "StrangeYield - strange-hadron selection and yield normalization")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the selection engine and the normalization over an event file
    Run {
        /// Run configuration (YAML, or JSON by extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Events, one JSON record per line
        #[arg(short, long)]
        events: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Overrides the configuration.
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print the configurations of a stock set
    Presets {
        /// Stock set
        #[arg(value_enum)]
        preset: PresetKind,

        /// Points per sweep (topological QA sets)
        #[arg(long, default_value = "10")]
        steps: usize,

        /// Print names only
        #[arg(long)]
        names: bool,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetKind {
    /// K0S/Λ/anti-Λ topological QA
    V0Qa,
    /// Ξ/Ω topological QA
    CascadeQa,
    /// Ξ/Ω 2.76 TeV selections
    Cascade276tev,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config, events, output, threads } => {
            cmd_run(&config, &events, output.as_ref(), threads)
        }
        Commands::Presets { preset, steps, names, output } => {
            cmd_presets(preset, steps, names, output.as_ref())
        }
        Commands::Version => write_json(
            None,
            serde_json::json!({ "name": "strangeyield", "version": sy_core::VERSION }),
        ),
    }
}

#[derive(Serialize)]
struct ConfigurationSummary {
    name: String,
    entries: u64,
    integral: f64,
}

#[derive(Serialize)]
struct RegistrySummary {
    stats: EngineStats,
    configurations: Vec<ConfigurationSummary>,
}

fn summarize<C: Selection>(registry: &Registry<C>, stats: EngineStats) -> RegistrySummary {
    let configurations = registry
        .iter()
        .map(|e| ConfigurationSummary {
            name: e.config.name().to_string(),
            entries: e.accumulator.entries(),
            integral: e.accumulator.integral(),
        })
        .collect();
    RegistrySummary { stats, configurations }
}

fn fill<C, F>(registry: &mut Registry<C>, events: &[EventRecord], threads: usize, view: F) -> Result<EngineStats>
where
    C: Selection,
    F: Fn(&EventRecord) -> &[C::Candidate] + Sync,
{
    if registry.is_empty() {
        return Ok(EngineStats::default());
    }
    if threads == 1 {
        let mut stats = EngineStats::default();
        for event in events {
            stats.merge(&engine::fill_candidates(registry, event.centrality, view(event)))?;
        }
        return Ok(stats);
    }
    Ok(engine::fill_events_parallel(registry, events, |e| (e.centrality, view(e)))?)
}

fn cmd_run(
    config: &PathBuf,
    events: &PathBuf,
    output: Option<&PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    let cfg = read_run_config(config)?;
    let threads = threads.unwrap_or(cfg.threads);
    if threads > 1 {
        // Best-effort; if a global pool already exists, keep going.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
    }

    let mut v0_registry = cfg.v0_registry()?;
    let mut cascade_registry = cfg.cascade_registry()?;
    tracing::info!(
        task = %cfg.task,
        v0_configurations = v0_registry.len(),
        cascade_configurations = cascade_registry.len(),
        "registries built"
    );

    let records = read_events(events)?;
    tracing::info!(events = records.len(), path = %events.display(), "events loaded");

    let v0_stats = fill(&mut v0_registry, &records, threads, |e| e.v0s.as_slice())?;
    let cascade_stats = fill(&mut cascade_registry, &records, threads, |e| e.cascades.as_slice())?;
    tracing::info!(v0_fills = v0_stats.fills, cascade_fills = cascade_stats.fills, "selection done");

    let normalization = match &cfg.normalization {
        Some(norm_cfg) => {
            let mut run = RunState::new(norm_cfg.clone());
            for record in &records {
                run.process(&record.forward)?;
            }
            match run.finalize() {
                Ok(out) => {
                    tracing::info!(
                        good_events = out.good_events,
                        vertex_efficiency = ?out.vertex_efficiency,
                        "normalization done"
                    );
                    Some(out)
                }
                Err(e) => {
                    tracing::error!(error = %e, "normalization failed");
                    None
                }
            }
        }
        None => None,
    };

    let output_json = serde_json::json!({
        "task": cfg.task,
        "events": records.len(),
        "v0": summarize(&v0_registry, v0_stats),
        "cascade": summarize(&cascade_registry, cascade_stats),
        "normalization": normalization,
    });
    write_json(output, output_json)
}

fn cmd_presets(preset: PresetKind, steps: usize, names: bool, output: Option<&PathBuf>) -> Result<()> {
    let value = match preset {
        PresetKind::V0Qa => preset_json(presets::topological_qa_v0(steps), names)?,
        PresetKind::CascadeQa => preset_json(presets::topological_qa_cascade(steps), names)?,
        PresetKind::Cascade276tev => preset_json(presets::cascade_276tev(), names)?,
    };
    write_json(output, value)
}

fn preset_json<C: Selection + Serialize>(configs: Vec<C>, names: bool) -> Result<serde_json::Value> {
    tracing::info!(configurations = configs.len(), "preset expanded");
    if names {
        let names: Vec<&str> = configs.iter().map(|c| c.name()).collect();
        return Ok(serde_json::to_value(names)?);
    }
    Ok(serde_json::to_value(&configs)?)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
