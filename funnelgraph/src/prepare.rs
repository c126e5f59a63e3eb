//! funnelgraph-prepare - turn a raw tracker log into an events table

mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use funnelgraph_core::{ingest, table};

#[derive(Parser)]
#[command(name = "funnelgraph-prepare")]
#[command(about = "Parse a raw tracker log into an events CSV")]
#[command(version)]
struct Args {
    /// Raw log file
    input_file: PathBuf,

    /// Output events CSV file
    output_file: PathBuf,

    /// Print every skipped line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = startup::init("funnelgraph-prepare")?;

    let prepared = ingest::prepare_file(&args.input_file, &config.ingest)
        .with_context(|| format!("failed to read {}", args.input_file.display()))?;

    table::write_events(&args.output_file, &prepared.events)
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;

    println!("Data preparation completed successfully.");
    println!("  Lines read:      {}", prepared.lines_read);
    println!("  Events:          {}", prepared.events.len());
    println!("  Dropped:         {}", prepared.dropped);
    println!("  Malformed:       {}", prepared.warnings.len());
    if args.verbose {
        for warning in &prepared.warnings {
            eprintln!("  {}", warning);
        }
    }
    println!("Data written to: {}", args.output_file.display());

    Ok(())
}
