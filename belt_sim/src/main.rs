//! # Belt Sim
//!
//! Runs the reference move list through the belt spring model with and
//! without compensation and reports the peak head deviation. With
//! `--output` every trimmed series is written as JSON.

#![deny(warnings)]

use belt_common::config::{LogLevel, SimulationConfig};
use belt_common::model::{AccelOrder, FilterKind};
use belt_sim::output::write_bundle;
use belt_sim::pipeline::Pipeline;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Belt Sim — belt resonance compensation simulator
#[derive(Parser, Debug)]
#[command(name = "belt_sim")]
#[command(version)]
#[command(about = "Simulate belt-as-spring head motion and compensation filters")]
struct Args {
    /// Path to configuration TOML. Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the trimmed trajectories as JSON to this file.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Acceleration kernel order (2, 4 or 6). Overrides the config file.
    #[arg(long, value_parser = parse_accel_order)]
    accel_order: Option<AccelOrder>,

    /// Compensation filter. Overrides the config file.
    #[arg(long)]
    filter: Option<FilterKind>,

    /// Window length of the windowed filters [s]. Overrides the config file.
    #[arg(long)]
    smooth_time: Option<f64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn parse_accel_order(s: &str) -> Result<AccelOrder, String> {
    let n: u8 = s
        .parse()
        .map_err(|e| format!("invalid accel order '{s}': {e}"))?;
    AccelOrder::try_from(n)
}

fn main() {
    let args = Args::parse();
    let config = SimulationConfig::load_or_default(args.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Belt Sim v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, mut config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(order) = args.accel_order {
        config.motion.accel_order = order;
    }
    if let Some(kind) = args.filter {
        config.filter.kind = kind;
    }
    if let Some(st) = args.smooth_time {
        config.filter.smooth_time = Some(st);
    }

    info!(
        "Config OK: sample_period={}s, margin_time={}s, {}, spring={}Hz/{}, filter={}",
        config.timing.sample_period,
        config.timing.margin_time,
        config.motion.accel_order,
        config.spring.natural_frequency,
        config.spring.damping,
        config.filter.kind,
    );

    let bundle = Pipeline::from_config(&config)?.run()?;
    let summary = bundle.summary;
    match summary.ratio() {
        Some(ratio) => info!(
            "Peak head deviation: nominal {:.6} mm, compensated {:.6} mm ({:.1}%)",
            summary.nominal_peak,
            summary.compensated_peak,
            ratio * 100.0
        ),
        None => info!(
            "Peak head deviation: nominal {:.6} mm, compensated {:.6} mm (no nominal deviation)",
            summary.nominal_peak, summary.compensated_peak
        ),
    }

    if let Some(ref path) = args.output {
        write_bundle(path, &bundle)?;
        info!("Wrote {} samples per series to {}", bundle.len(), path.display());
    }
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
