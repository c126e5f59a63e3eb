//! funnelgraph-analyze - global stats and weighted edges from an edges table

mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use funnelgraph_core::analytics::{self, Analysis};
use funnelgraph_core::format::{format_duration_secs, format_opt, format_pct};
use funnelgraph_core::table;

#[derive(Parser)]
#[command(name = "funnelgraph-analyze")]
#[command(about = "Compute funnel stats and weighted edges from an edges CSV")]
#[command(version)]
struct Args {
    /// Edges CSV file (from funnelgraph-graph)
    input_file: PathBuf,

    /// Output stats CSV file
    output_file_stats: PathBuf,

    /// Output weighted edges CSV file
    output_file_edges: PathBuf,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (_config, _log_guard) = startup::init("funnelgraph-analyze")?;

    if args.format != "text" && args.format != "json" {
        anyhow::bail!("unknown format '{}' (expected text or json)", args.format);
    }

    let edges = table::read_edges(&args.input_file)
        .with_context(|| format!("failed to read {}", args.input_file.display()))?;

    let analysis = analytics::analyze(&edges);

    table::write_stats(&args.output_file_stats, &analysis.stats)
        .with_context(|| format!("failed to write {}", args.output_file_stats.display()))?;
    table::write_weighted_edges(&args.output_file_edges, &analysis.edges)
        .with_context(|| format!("failed to write {}", args.output_file_edges.display()))?;

    if args.format == "json" {
        print_json(&analysis)?;
    } else {
        print_text(&analysis);
        println!(
            "\nData written to: {} and {}",
            args.output_file_stats.display(),
            args.output_file_edges.display()
        );
    }

    Ok(())
}

fn print_text(analysis: &Analysis) {
    let stats = &analysis.stats;

    println!("Visitors:              {}", stats.visitors);
    println!(
        "Browse abandonment:    {} ({})",
        stats.browse_abandonment_n,
        format_opt(stats.browse_abandonment_pct, format_pct)
    );
    println!(
        "  avg steps / time:    {} / {}",
        format_opt(stats.avg_steps_abandonment, |v| format!("{:.1}", v)),
        format_opt(stats.avg_time_abandonment, format_duration_secs)
    );
    println!(
        "Cart conversion:       {} ({})",
        stats.cart_conversion_n,
        format_opt(stats.cart_conversion_pct, format_pct)
    );
    println!(
        "  avg steps / time:    {} / {}",
        format_opt(stats.avg_steps_cart_conversion, |v| format!("{:.1}", v)),
        format_opt(stats.avg_time_cart_conversion, format_duration_secs)
    );
    println!("Weighted edges:        {}", analysis.edges.len());
}

fn print_json(analysis: &Analysis) -> Result<()> {
    let output = serde_json::json!({
        "stats": analysis.stats.to_rows().iter().map(|row| {
            serde_json::json!({
                "name": row.name,
                "value": row.value,
            })
        }).collect::<Vec<_>>(),
        "edges": analysis.edges,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
