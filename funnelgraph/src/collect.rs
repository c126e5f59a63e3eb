//! funnelgraph-collect - download the raw tracker log

mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use funnelgraph_core::collector::{self, SyncLogCollector};

#[derive(Parser)]
#[command(name = "funnelgraph-collect")]
#[command(about = "Download the most recent raw tracker log")]
#[command(version)]
struct Args {
    /// Target file for the raw log
    output_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = startup::init("funnelgraph-collect")?;

    let log_collector = SyncLogCollector::new(&config.collector)
        .context("collector is not configured (set [collector] url)")?;
    let (content, summary) = log_collector.collect().context("failed to collect log")?;

    collector::save(&content, &args.output_file)
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;

    println!("Data collection completed successfully.");
    println!("  Source:          {}", summary.source);
    println!("  Number of lines: {}", summary.lines);
    println!(
        "  Last date:       {}",
        summary.last_date.as_deref().unwrap_or("-")
    );
    println!("Data written to: {}", args.output_file.display());

    Ok(())
}
