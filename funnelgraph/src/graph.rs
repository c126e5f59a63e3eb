//! funnelgraph-graph - build funnel edges from an events table

mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use funnelgraph_core::config::JourneyConfig;
use funnelgraph_core::{build_graph, table};

#[derive(Parser)]
#[command(name = "funnelgraph-graph")]
#[command(about = "Segment journeys and extract funnel edges from an events CSV")]
#[command(version)]
struct Args {
    /// Events CSV file (from funnelgraph-prepare)
    input_file: PathBuf,

    /// Output edges CSV file
    output_file: PathBuf,

    /// Inactivity timeout in minutes (overrides config)
    #[arg(long)]
    timeout_minutes: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = startup::init("funnelgraph-graph")?;

    let events = table::read_events(&args.input_file)
        .with_context(|| format!("failed to read {}", args.input_file.display()))?;

    let journey_config = match args.timeout_minutes {
        Some(minutes) => JourneyConfig::with_timeout_minutes(minutes),
        None => config.journey.clone(),
    };
    let graph = build_graph(events, &journey_config);

    table::write_edges(&args.output_file, &graph.edges)
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;

    println!("Graph was created successfully.");
    println!("  Events:          {}", graph.events_in);
    println!("  Unclassified:    {}", graph.events_unclassified);
    println!("  Journeys:        {}", graph.journeys);
    println!("  In graph:        {}", graph.journeys_in_graph);
    println!("  Edges:           {}", graph.edges.len());
    println!("Data written to: {}", args.output_file.display());

    Ok(())
}
