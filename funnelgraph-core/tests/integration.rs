//! Integration tests for the funnelgraph pipeline
//!
//! These tests use `tests/fixtures/shop-log.txt`, a small tracker log with
//! four journeys, to verify the end-to-end flow from raw log to CSV tables.

use funnelgraph_core::analytics::{self, StatRow, WeightedEdge};
use funnelgraph_core::config::{IngestConfig, JourneyConfig};
use funnelgraph_core::types::{Edge, NODE_CART, NODE_START, NODE_STOP};
use funnelgraph_core::{build_graph, ingest, table};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn graph_edges() -> Vec<Edge> {
    let prepared = ingest::prepare_file(&fixture_path("shop-log.txt"), &IngestConfig::default())
        .expect("prepare should succeed");
    build_graph(prepared.events, &JourneyConfig::default()).edges
}

fn by_journey(edges: &[Edge]) -> BTreeMap<String, Vec<Edge>> {
    let mut map: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
    for edge in edges {
        map.entry(edge.journey_id.clone()).or_default().push(edge.clone());
    }
    map
}

// ============================================
// Prepare
// ============================================

#[test]
fn test_prepare_fixture() {
    let prepared = ingest::prepare_file(&fixture_path("shop-log.txt"), &IngestConfig::default())
        .expect("prepare should succeed");

    assert_eq!(prepared.lines_read, 10);
    assert_eq!(prepared.warnings.len(), 1);
    // visitor 4 sent no url
    assert_eq!(prepared.dropped, 1);
    assert_eq!(prepared.events.len(), 8);

    let phone = prepared
        .events
        .iter()
        .find(|e| e.ip == "2.2.2.2")
        .expect("visitor 2 events");
    assert_eq!(phone.device, "Mobile");
    assert_eq!(phone.source_type, "Social Sites");
    assert_eq!(phone.url_subdomain, "example");
}

#[test]
fn test_prepare_with_exclusions() {
    let config = IngestConfig {
        exclude_url_patterns: vec!["/cart/".to_string()],
    };
    let prepared = ingest::prepare_file(&fixture_path("shop-log.txt"), &config).unwrap();
    assert_eq!(prepared.dropped, 2);
    assert_eq!(prepared.events.len(), 7);
}

// ============================================
// Graph
// ============================================

#[test]
fn test_graph_journeys() {
    let edges = graph_edges();
    let journeys = by_journey(&edges);

    // visitor 3 comes back after 3.5 hours: two journeys
    assert_eq!(journeys.len(), 4);
    assert_eq!(edges.len(), 5 + 3 + 2 + 2);

    for edges in journeys.values() {
        assert_eq!(edges[0].from_node.as_deref(), Some(NODE_START));
        for pair in edges.windows(2) {
            assert_eq!(pair[1].from_node, pair[0].to_node);
            assert_eq!(pair[1].from_node_type, pair[0].to_node_type);
        }
        assert_eq!(edges.last().unwrap().to_node.as_deref(), Some(NODE_STOP));
    }
}

/// Edges of every journey of one visitor identity.
fn identity_edges<'a>(edges: &'a [Edge], identity: &str) -> Vec<&'a Edge> {
    let prefix = format!("{}_", identity);
    edges
        .iter()
        .filter(|e| e.journey_id.starts_with(&prefix))
        .collect()
}

#[test]
fn test_graph_converted_journey() {
    let edges = graph_edges();
    let converted = identity_edges(&edges, "1.1.1.1_1_Desktop_example");

    let nodes: Vec<Option<&str>> = converted.iter().map(|e| e.to_node.as_deref()).collect();
    assert_eq!(
        nodes,
        vec![
            Some("http://example.com/landing/home"),
            Some("Shoes"),
            Some("Boot"),
            Some(NODE_CART),
            Some(NODE_STOP),
        ]
    );
    assert!(converted.iter().all(|e| e.total_steps == 4));
    assert!(converted.iter().all(|e| e.total_time == 15.0));
    // source type is per event: only the landing came from search
    assert_eq!(converted[0].source_type, "Organic Search");
    assert_eq!(converted[1].source_type, "Misc");
}

#[test]
fn test_graph_returning_visitor() {
    let edges = graph_edges();
    let returning = identity_edges(&edges, "3.3.3.3_3_Desktop_example");

    assert_eq!(returning.len(), 4);
    assert_eq!(returning[0].journey_id, "3.3.3.3_3_Desktop_example_0");
    assert_eq!(returning[2].journey_id, "3.3.3.3_3_Desktop_example_1");
    // journeys are ordered by their identity's first event
    assert_eq!(edges[0].journey_id, "3.3.3.3_3_Desktop_example_0");
    assert!(returning.iter().all(|e| e.total_steps == 1 && e.total_time == 0.0));
}

// ============================================
// Analyze
// ============================================

#[test]
fn test_analyze_fixture() {
    let analysis = analytics::analyze(&graph_edges());
    let stats = &analysis.stats;

    assert_eq!(stats.visitors, 4);
    assert_eq!(stats.browse_abandonment_n, 3);
    assert_eq!(stats.cart_conversion_n, 1);
    assert_eq!(stats.browse_abandonment_pct, Some(0.75));
    assert_eq!(stats.avg_steps_cart_conversion, Some(4.0));
    assert_eq!(stats.avg_time_cart_conversion, Some(15.0));
    assert!((stats.avg_steps_abandonment.unwrap() - 4.0 / 3.0).abs() < 1e-9);
    assert!((stats.avg_time_abandonment.unwrap() - 10.0 / 3.0).abs() < 1e-9);

    // both visits of visitor 3 share the landing -> STOP transition
    let landing_exit = analysis
        .edges
        .iter()
        .find(|w| {
            w.from_node.as_deref() == Some("http://example.com/landing/home")
                && w.to_node.as_deref() == Some(NODE_STOP)
        })
        .expect("landing -> STOP");
    assert_eq!(landing_exit.freq, 2);
    assert!(analysis.edges.iter().all(|w| w.total_visitors == 4));
}

// ============================================
// CSV stages
// ============================================

#[test]
fn test_pipeline_through_csv_tables() {
    let dir = TempDir::new().unwrap();
    let events_csv = dir.path().join("events.csv");
    let edges_csv = dir.path().join("edges.csv");
    let stats_csv = dir.path().join("stats.csv");
    let weighted_csv = dir.path().join("weighted.csv");

    let prepared =
        ingest::prepare_file(&fixture_path("shop-log.txt"), &IngestConfig::default()).unwrap();
    table::write_events(&events_csv, &prepared.events).unwrap();

    let events = table::read_events(&events_csv).unwrap();
    assert_eq!(events.len(), prepared.events.len());
    let graph = build_graph(events, &JourneyConfig::default());
    table::write_edges(&edges_csv, &graph.edges).unwrap();

    let edges = table::read_edges(&edges_csv).unwrap();
    assert_eq!(edges, graph_edges());
    let analysis = analytics::analyze(&edges);
    table::write_stats(&stats_csv, &analysis.stats).unwrap();
    table::write_weighted_edges(&weighted_csv, &analysis.edges).unwrap();

    let stats: Vec<StatRow> = table::read_records(&stats_csv).unwrap();
    assert_eq!(stats[0].name, "visitors");
    assert_eq!(stats[0].value, Some(4.0));

    let weighted: Vec<WeightedEdge> = table::read_records(&weighted_csv).unwrap();
    assert_eq!(weighted, analysis.edges);
}
