//! 5G Node Site Selection CLI
//!
//! Selects up to 10 spatially diverse node sites for a planning region.
//!
//! Usage:
//!   select-sites --inputs data/nairobi_scenario.json \
//!                --output data/selected_sites.json --geojson

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use site_selector::{
    format_report, loader, optimize, report, OptimizeParams, Report, ScorerConfig,
    SelectionMetadata, SiteInputs, CANDIDATE_COUNT, DEFAULT_SEED, EXCLUSION_RADIUS_KM,
    TARGET_COUNT,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "select-sites",
    about = "Select diverse 5G node sites by coverage and air quality"
)]
struct Args {
    /// Scenario JSON (region, centers, rural density, AQI anchor). Built-in
    /// Nairobi defaults are used when omitted.
    #[arg(short, long)]
    inputs: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long, default_value = "data/selected_sites.json")]
    output: PathBuf,

    /// Also output GeoJSON
    #[arg(long)]
    geojson: bool,

    /// Number of candidates to generate
    #[arg(long, default_value_t = CANDIDATE_COUNT)]
    candidates: usize,

    /// Candidate generator seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of sites to select
    #[arg(long, default_value_t = TARGET_COUNT)]
    target: usize,

    /// Minimum spacing between selected sites in km
    #[arg(long, default_value_t = EXCLUSION_RADIUS_KM)]
    exclusion_km: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct OutputDocument<'a> {
    generated_at: String,
    inputs: &'a SiteInputs,
    metadata: &'a SelectionMetadata,
    report: &'a Report,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("CleanNet 5G Node Site Selector");
    info!("{}", "=".repeat(60));

    let inputs = match &args.inputs {
        Some(path) => loader::load_inputs(path)?,
        None => {
            info!("No scenario given, using built-in defaults");
            SiteInputs::default()
        }
    };

    let params = OptimizeParams {
        candidate_count: args.candidates,
        seed: args.seed,
        target_count: args.target,
        exclusion_radius_km: args.exclusion_km,
        scorer: ScorerConfig::default(),
    };

    let result = optimize(&inputs, &params)?;
    let table = format_report(&result);

    println!("{}", table.to_markdown());

    // Write output
    info!("Writing output to {:?}", args.output);
    let document = OutputDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        inputs: &inputs,
        metadata: &result.metadata,
        report: &table,
    };
    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &document)?;

    // Write GeoJSON if requested
    if args.geojson {
        let geojson_path = args.output.with_extension("geojson");
        info!("Writing GeoJSON to {:?}", geojson_path);
        let geojson = report::to_geojson(&result, &inputs, params.scorer.coverage_radius_km);
        let file = File::create(&geojson_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &geojson)?;
    }

    // Summary
    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!(
        "Selected {} of {} requested sites from {} candidates",
        result.metadata.selected_count, result.metadata.target_count, result.metadata.total_candidates
    );

    Ok(())
}
