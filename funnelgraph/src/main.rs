//! funnelgraph - shopping funnel graphs from tracker logs
//!
//! Runs the whole pipeline: collect the raw log (or read a local one with
//! `--test`), prepare events, build the funnel graph and write the global
//! stats and weighted edges as CSV.

mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use funnelgraph_core::collector::SyncLogCollector;
use funnelgraph_core::config::JourneyConfig;
use funnelgraph_core::{analytics, build_graph, ingest, table};

#[derive(Parser)]
#[command(name = "funnelgraph")]
#[command(about = "Build a shopping funnel graph from a tracker log")]
#[command(version)]
struct Args {
    /// Read the raw log from this file instead of fetching it
    #[arg(long, value_name = "LOG")]
    test: Option<PathBuf>,

    /// Inactivity timeout in minutes (overrides config)
    #[arg(long)]
    timeout_minutes: Option<u32>,

    /// Output stats CSV file
    output_file_stats: PathBuf,

    /// Output edges CSV file
    output_file_edges: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = startup::init("funnelgraph")?;

    let content = match &args.test {
        Some(path) => {
            tracing::info!(path = %path.display(), "Test mode: reading raw log from file");
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let collector = SyncLogCollector::new(&config.collector)
                .context("collector is not configured (set [collector] url)")?;
            let (content, summary) = collector.collect().context("failed to collect log")?;
            println!(
                "Collected {} lines from {} (last: {})",
                summary.lines,
                summary.source,
                summary.last_date.as_deref().unwrap_or("-")
            );
            content
        }
    };

    let prepared = ingest::prepare(&content, &config.ingest);
    if !prepared.warnings.is_empty() {
        eprintln!("Skipped {} malformed line(s)", prepared.warnings.len());
    }

    let journey_config = match args.timeout_minutes {
        Some(minutes) => JourneyConfig::with_timeout_minutes(minutes),
        None => config.journey.clone(),
    };
    let graph = build_graph(prepared.events, &journey_config);
    let analysis = analytics::analyze(&graph.edges);

    table::write_stats(&args.output_file_stats, &analysis.stats)
        .with_context(|| format!("failed to write {}", args.output_file_stats.display()))?;
    table::write_weighted_edges(&args.output_file_edges, &analysis.edges)
        .with_context(|| format!("failed to write {}", args.output_file_edges.display()))?;

    tracing::info!(
        stats = %args.output_file_stats.display(),
        edges = %args.output_file_edges.display(),
        "Data written"
    );
    println!(
        "{} visitors, {} journeys in graph, {} weighted edges",
        analysis.stats.visitors,
        graph.journeys_in_graph,
        analysis.edges.len()
    );
    println!(
        "Data written to: {} and {}",
        args.output_file_stats.display(),
        args.output_file_edges.display()
    );

    Ok(())
}
