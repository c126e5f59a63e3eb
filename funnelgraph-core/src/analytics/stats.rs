//! Journey-level funnel statistics.

use crate::types::Edge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global statistics over every journey in the edge table.
///
/// A journey is *abandoned* when it leaves the funnel without passing through
/// the cart; every other journey counts as a cart conversion. Averages over an
/// empty set of journeys are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStats {
    /// Number of journeys
    pub visitors: u64,

    // Browse abandonment
    pub browse_abandonment_n: u64,
    pub browse_abandonment_pct: Option<f64>,
    pub avg_steps_abandonment: Option<f64>,
    /// Seconds
    pub avg_time_abandonment: Option<f64>,

    // Cart conversion
    pub cart_conversion_n: u64,
    pub cart_conversion_pct: Option<f64>,
    pub avg_steps_cart_conversion: Option<f64>,
    /// Seconds
    pub avg_time_cart_conversion: Option<f64>,

    // Sales conversion (no checkout events are tracked yet)
    pub sales_conversion_n: u64,
    pub sales_conversion_pct: f64,
    pub avg_steps_sales_conversion: Option<f64>,
    pub avg_time_sales_conversion: Option<f64>,
}

/// One `name,value` row of the stats table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub name: String,
    pub value: Option<f64>,
}

/// Per-journey aggregate.
#[derive(Debug, Default, Clone, Copy)]
struct JourneySummary {
    abandoned: bool,
    total_steps: usize,
    total_time: f64,
}

impl GlobalStats {
    /// Compute the stats from an edge table.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut journeys: BTreeMap<&str, JourneySummary> = BTreeMap::new();
        for edge in edges {
            let summary = journeys.entry(edge.journey_id.as_str()).or_default();
            summary.abandoned |= edge.is_abandonment();
            summary.total_steps = summary.total_steps.max(edge.total_steps);
            summary.total_time = summary.total_time.max(edge.total_time);
        }

        let (abandoned, converted): (Vec<JourneySummary>, Vec<JourneySummary>) =
            journeys.into_values().partition(|j| j.abandoned);

        let visitors = (abandoned.len() + converted.len()) as u64;
        let browse_abandonment_n = abandoned.len() as u64;
        let browse_abandonment_pct = ratio(browse_abandonment_n, visitors);

        Self {
            visitors,
            browse_abandonment_n,
            browse_abandonment_pct,
            avg_steps_abandonment: mean(abandoned.iter().map(|j| j.total_steps as f64)),
            avg_time_abandonment: mean(abandoned.iter().map(|j| j.total_time)),
            cart_conversion_n: converted.len() as u64,
            cart_conversion_pct: browse_abandonment_pct.map(|pct| 1.0 - pct),
            avg_steps_cart_conversion: mean(converted.iter().map(|j| j.total_steps as f64)),
            avg_time_cart_conversion: mean(converted.iter().map(|j| j.total_time)),
            sales_conversion_n: 0,
            sales_conversion_pct: 0.0,
            avg_steps_sales_conversion: None,
            avg_time_sales_conversion: None,
        }
    }

    /// Render as `name,value` rows, in a fixed order.
    pub fn to_rows(&self) -> Vec<StatRow> {
        let row = |name: &str, value: Option<f64>| StatRow {
            name: name.to_string(),
            value,
        };

        vec![
            row("visitors", Some(self.visitors as f64)),
            row("browse_abandonment_n", Some(self.browse_abandonment_n as f64)),
            row("browse_abandonment_pct", self.browse_abandonment_pct),
            row("avg_steps_abandonment", self.avg_steps_abandonment),
            row("avg_time_abandonment", self.avg_time_abandonment),
            row("cart_conversion_n", Some(self.cart_conversion_n as f64)),
            row("cart_conversion_pct", self.cart_conversion_pct),
            row("avg_steps_cart_conversion", self.avg_steps_cart_conversion),
            row("avg_time_cart_conversion", self.avg_time_cart_conversion),
            row("sales_conversion_n", Some(self.sales_conversion_n as f64)),
            row("sales_conversion_pct", Some(self.sales_conversion_pct)),
            row("avg_steps_sales_conversion", self.avg_steps_sales_conversion),
            row("avg_time_sales_conversion", self.avg_time_sales_conversion),
        ]
    }
}

fn ratio(n: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| n as f64 / total as f64)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
