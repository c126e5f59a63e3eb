//! Edge extraction from compressed journeys.

use super::compress::PhaseRow;
use crate::types::{Edge, EventType, Journey, RawEvent, NODE_CART, NODE_START, NODE_STOP};

/// Name of the graph node an event stands for.
///
/// Depends only on the event's own payload. Returns `None` when the field the
/// type is named by is missing, or for types that never reach the graph.
pub fn node_name(event: &RawEvent) -> Option<String> {
    match &event.event_type {
        EventType::LandingView => event.url.clone(),
        EventType::ProductView => event.product_name.clone(),
        EventType::CategoryView => event.category.clone(),
        EventType::CartAdd => Some(NODE_CART.to_string()),
        EventType::Exit => Some(NODE_STOP.to_string()),
        EventType::Other(_) => None,
    }
}

/// Chain a compressed journey into edges, starting from the `START` node.
///
/// Produces exactly one edge per row; each edge leaves from the node the
/// previous edge arrived at.
pub fn extract_edges(journey: &Journey, rows: &[PhaseRow]) -> Vec<Edge> {
    let mut from_node = Some(NODE_START.to_string());
    let mut from_node_type = NODE_START.to_string();

    rows.iter()
        .map(|row| {
            let to_node = node_name(&row.event);
            let to_node_type = row.event.event_type.as_str().to_string();

            Edge {
                journey_id: journey.id.clone(),
                url_subdomain: row.event.url_subdomain.clone(),
                event_type: to_node_type.clone(),
                phase_level: row.phase.level(),
                device: row.event.device.clone(),
                source_type: row.event.source_type.clone(),
                from_node: std::mem::replace(&mut from_node, to_node.clone()),
                from_node_type: std::mem::replace(&mut from_node_type, to_node_type.clone()),
                to_node,
                to_node_type,
                total_time: journey.total_time,
                total_steps: journey.total_steps,
                freq: 1,
            }
        })
        .collect()
}
