//! vibration-health - command-line front end for the analysis engine
//!
//! # Usage
//!
//! ```bash
//! # Assess every sensor in an exported acquisition bundle
//! vibration-health analyze --input bundle.json --pretty
//!
//! # Print the ISO 10816-3 class table
//! vibration-health classes
//!
//! # Print the effective engine config as TOML
//! vibration-health config
//! ```
//!
//! # Environment Variables
//!
//! - `VIBRATION_CONFIG`: Path to the engine config TOML
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use vibration_health::classification::FleetSummary;
use vibration_health::config::EngineConfig;
use vibration_health::engine::{SensorAssessment, VibrationEngine};
use vibration_health::ingest::AnalysisBundle;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "vibration-health")]
#[command(about = "Vibration analysis and ISO 10816-3 condition classification")]
#[command(version)]
struct CliArgs {
    /// Engine config TOML (overrides VIBRATION_CONFIG and ./engine_config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Assess all sensors in a JSON acquisition bundle
    Analyze {
        /// Bundle file with `sensors` and `overrides`
        #[arg(short, long)]
        input: PathBuf,

        /// Include full spectra in the output
        #[arg(long)]
        spectra: bool,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the ISO 10816-3 machine class table
    Classes,

    /// Print the effective engine config as TOML
    Config,
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Serialize)]
struct IngestIssueReport {
    record: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct FleetReport {
    generated_at: DateTime<Utc>,
    summary: FleetSummary,
    sensors: Vec<SensorAssessment>,
    rejected: Vec<IngestIssueReport>,
}

// ============================================================================
// Main
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load_from_file(p)
            .with_context(|| format!("Failed to load engine config from {}", p.display())),
        None => Ok(EngineConfig::load()),
    }
}

fn analyze(engine: &VibrationEngine, input: &Path, spectra: bool, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let bundle: AnalysisBundle = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse bundle {}", input.display()))?;

    let ingested = bundle.ingest();
    if !ingested.issues.is_empty() {
        warn!(rejected = ingested.issues.len(), "Some records were rejected");
    }
    info!(
        sensors = ingested.inputs.len(),
        overrides = ingested.overrides.len(),
        "Bundle ingested"
    );

    let fleet = engine.assess_fleet(&ingested.inputs, &ingested.overrides);
    let sensors = if spectra {
        fleet.sensors
    } else {
        fleet
            .sensors
            .into_iter()
            .map(SensorAssessment::without_spectra)
            .collect()
    };

    let report = FleetReport {
        generated_at: Utc::now(),
        summary: fleet.summary,
        sensors,
        rejected: ingested
            .issues
            .into_iter()
            .map(|i| IngestIssueReport {
                record: i.record,
                error: i.error.to_string(),
            })
            .collect(),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn print_classes(engine: &VibrationEngine) {
    println!("{:<20} {:>8} {:>8} {:>8}", "class", "min", "medium", "max");
    for (class, set) in engine.class_table().iter() {
        println!(
            "{:<20} {:>8.2} {:>8.2} {:>8.2}",
            class.id(),
            set.min(),
            set.medium(),
            set.max()
        );
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.json_logs);

    let config = load_config(args.config.as_deref())?;
    let engine = VibrationEngine::new(config);

    match &args.command {
        SubCommand::Analyze {
            input,
            spectra,
            pretty,
        } => analyze(&engine, input, *spectra, *pretty)?,
        SubCommand::Classes => print_classes(&engine),
        SubCommand::Config => {
            let text = engine.config().to_toml().context("Failed to render config")?;
            print!("{text}");
        }
    }

    Ok(())
}
