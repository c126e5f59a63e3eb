//! Edge weighting: collapse per-journey edges into node-to-node transitions.

use crate::types::Edge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A transition between two named nodes, counted over all journeys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub url_subdomain: String,
    pub source_type: String,
    pub from_node: Option<String>,
    pub from_node_type: String,
    pub to_node: Option<String>,
    pub to_node_type: String,
    /// Number of journey edges in this group
    pub freq: u64,
    /// Journeys in the whole table, repeated on every row
    pub total_visitors: u64,
}

type GroupKey<'a> = (
    &'a str,
    &'a str,
    Option<&'a str>,
    &'a str,
    Option<&'a str>,
    &'a str,
);

/// Group edges by site, source and both endpoints, summing `freq`.
///
/// Missing node names form their own group. Output is sorted by the group key.
pub fn weighted_edges(edges: &[Edge], total_visitors: u64) -> Vec<WeightedEdge> {
    let mut groups: BTreeMap<GroupKey<'_>, u64> = BTreeMap::new();
    for edge in edges {
        let key = (
            edge.url_subdomain.as_str(),
            edge.source_type.as_str(),
            edge.from_node.as_deref(),
            edge.from_node_type.as_str(),
            edge.to_node.as_deref(),
            edge.to_node_type.as_str(),
        );
        *groups.entry(key).or_default() += edge.freq;
    }

    groups
        .into_iter()
        .map(
            |((url_subdomain, source_type, from_node, from_node_type, to_node, to_node_type), freq)| {
                WeightedEdge {
                    url_subdomain: url_subdomain.to_string(),
                    source_type: source_type.to_string(),
                    from_node: from_node.map(String::from),
                    from_node_type: from_node_type.to_string(),
                    to_node: to_node.map(String::from),
                    to_node_type: to_node_type.to_string(),
                    freq,
                    total_visitors,
                }
            },
        )
        .collect()
}
