//! Funnel analytics
//!
//! Summarizes an edge table into:
//! - [`GlobalStats`]: visitors, browse abandonment and cart conversion
//! - [`WeightedEdge`]s: node-to-node transitions with summed frequency,
//!   ready for a Sankey or graph view

pub mod stats;
pub mod weighted;

pub use stats::{GlobalStats, StatRow};
pub use weighted::{weighted_edges, WeightedEdge};

use crate::types::Edge;

/// Output of [`analyze`].
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub stats: GlobalStats,
    pub edges: Vec<WeightedEdge>,
}

/// Compute global stats and weighted edges for an edge table.
pub fn analyze(edges: &[Edge]) -> Analysis {
    let stats = GlobalStats::from_edges(edges);
    let weighted = weighted_edges(edges, stats.visitors);

    tracing::info!(
        visitors = stats.visitors,
        abandoned = stats.browse_abandonment_n,
        weighted_edges = weighted.len(),
        "Analysis completed successfully"
    );

    Analysis {
        stats,
        edges: weighted,
    }
}
