//! Funnel graph construction
//!
//! Turns a complete batch of [`RawEvent`]s into the funnel edge table.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌────────────┐   ┌────────────┐   ┌───────┐
//! │ RawEvents  │ ─►│ JourneySegmenter │ ─►│ Phase      │ ─►│ compress   │ ─►│ edges │
//! │ (any order)│   │ (sort, identity, │   │ classify / │   │ (5 slots + │   │       │
//! │            │   │  cart & timeout) │   │ filter     │   │  exit)     │   │       │
//! └────────────┘   └──────────────────┘   └────────────┘   └────────────┘   └───────┘
//! ```
//!
//! Segmentation sees every event, including ones of unrecognized type, so that
//! cart and timeout boundaries follow the visitor's real timeline. Unrecognized
//! events are dropped only when journeys are compressed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnelgraph_core::config::JourneyConfig;
//! use funnelgraph_core::graph::build_graph;
//!
//! let result = build_graph(events, &JourneyConfig::default());
//! println!("{} edges from {} journeys", result.edges.len(), result.journeys);
//! ```

pub mod compress;
pub mod edges;
pub mod phase;
pub mod segment;

pub use compress::{compress, PhaseRow, Slot, SlotState, Transition};
pub use edges::{extract_edges, node_name};
pub use phase::{Phase, PHASE_COUNT};
pub use segment::{Boundary, JourneySegmenter};

use crate::config::JourneyConfig;
use crate::types::{Edge, RawEvent};

/// Result of building the graph for one batch.
#[derive(Debug, Default)]
pub struct GraphResult {
    /// One edge per compressed phase row, grouped by journey
    pub edges: Vec<Edge>,
    /// Number of input events
    pub events_in: usize,
    /// Input events of unrecognized type
    pub events_unclassified: usize,
    /// Journeys found by segmentation
    pub journeys: usize,
    /// Journeys that made it into the graph (had a recognized event)
    pub journeys_in_graph: usize,
}

/// Build the funnel edge table for a complete batch of events.
pub fn build_graph(events: Vec<RawEvent>, config: &JourneyConfig) -> GraphResult {
    let events_in = events.len();
    let events_unclassified = events
        .iter()
        .filter(|e| Phase::classify(&e.event_type).is_none())
        .count();

    let journeys = JourneySegmenter::from_config(config).segment(events);

    let mut edges = Vec::new();
    let mut journeys_in_graph = 0;
    for journey in &journeys {
        let rows = compress(journey);
        if rows.is_empty() {
            continue;
        }
        journeys_in_graph += 1;
        edges.extend(extract_edges(journey, &rows));
    }

    tracing::info!(
        events_in,
        events_unclassified,
        journeys = journeys.len(),
        journeys_in_graph,
        edges = edges.len(),
        "Graph was created successfully"
    );

    GraphResult {
        edges,
        events_in,
        events_unclassified,
        journeys: journeys.len(),
        journeys_in_graph,
    }
}
