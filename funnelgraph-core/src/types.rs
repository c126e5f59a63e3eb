//! Core domain types for funnelgraph
//!
//! These types represent the flat event table produced by ingestion, the
//! journeys the segmenter cuts out of it, and the edge table the graph
//! builder emits.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Identity** | The (ip, client id, device, subdomain) tuple grouping one visitor's events |
//! | **Journey** | A maximal run of one identity's events between two boundaries |
//! | **Boundary** | The previous event was a cart-add, or the gap to it exceeds the timeout |
//! | **Phase** | Ordinal funnel level: landing < category < product < cart < exit |
//! | **Node** | A named point in the funnel graph (a url, category, product, `CART` or `STOP`) |
//! | **Edge** | A directed transition between two nodes within one journey |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic origin node (and node type) of every journey
pub const NODE_START: &str = "START";
/// Synthetic terminal node of every journey
pub const NODE_STOP: &str = "STOP";
/// Node name shared by all cart-add events
pub const NODE_CART: &str = "CART";

// ============================================
// Events
// ============================================

/// Type of a logged interaction.
///
/// Unrecognized types are kept verbatim so that they still take part in
/// journey segmentation; the graph builder drops them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Landing (index) page view
    LandingView,
    /// Category listing view
    CategoryView,
    /// Product detail view
    ProductView,
    /// Product added to cart
    CartAdd,
    /// Synthetic journey end
    Exit,
    /// Anything else the tracker emits
    Other(String),
}

impl EventType {
    /// Returns the identifier used in logs and tables
    pub fn as_str(&self) -> &str {
        match self {
            EventType::LandingView => "index_view",
            EventType::CategoryView => "category_view",
            EventType::ProductView => "product_view",
            EventType::CartAdd => "product_in_cart",
            EventType::Exit => NODE_STOP,
            EventType::Other(s) => s,
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "index_view" => EventType::LandingView,
            "category_view" => EventType::CategoryView,
            "product_view" => EventType::ProductView,
            "product_in_cart" => EventType::CartAdd,
            NODE_STOP => EventType::Exit,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        EventType::from(s.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logged interaction, flattened.
///
/// Identity fields are plain strings: a missing value is an empty string and
/// still contributes to the identity key. Payload fields are only present for
/// the event types that use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub url_subdomain: String,
    pub event_type: EventType,
    pub url: Option<String>,
    pub category: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub referrer: Option<String>,
    /// Traffic source classification (carried through, not used by the graph)
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub user_agent: String,
}

impl RawEvent {
    /// Create an event with empty identity and payload.
    pub fn new(timestamp: DateTime<Utc>, event_type: EventType) -> Self {
        Self {
            timestamp,
            ip: String::new(),
            client_id: String::new(),
            device: String::new(),
            url_subdomain: String::new(),
            event_type,
            url: None,
            category: None,
            product_name: None,
            price: None,
            quantity: None,
            referrer: None,
            source_type: String::new(),
            user_agent: String::new(),
        }
    }

    /// Synthesize the exit event that closes a journey.
    ///
    /// Copies identity, timestamp and carried attributes from `last`; never
    /// copies payload fields.
    pub fn exit_from(last: &RawEvent) -> Self {
        Self {
            ip: last.ip.clone(),
            client_id: last.client_id.clone(),
            device: last.device.clone(),
            url_subdomain: last.url_subdomain.clone(),
            source_type: last.source_type.clone(),
            user_agent: last.user_agent.clone(),
            ..Self::new(last.timestamp, EventType::Exit)
        }
    }

    /// Identity key grouping this event with the rest of its visitor's events.
    pub fn identity_key(&self) -> String {
        [
            self.ip.as_str(),
            self.client_id.as_str(),
            self.device.as_str(),
            self.url_subdomain.as_str(),
        ]
        .join("_")
    }

    pub fn is_cart_add(&self) -> bool {
        self.event_type == EventType::CartAdd
    }
}

// ============================================
// Journeys
// ============================================

/// A maximal run of one identity's events between two boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    /// `<identity key>_<sub-journey index>`
    pub id: String,
    /// Events in time order (ties in arrival order)
    pub events: Vec<RawEvent>,
    /// Sum of the gaps between consecutive events, in seconds
    pub total_time: f64,
    /// Number of events, including ones of unrecognized type
    pub total_steps: usize,
    /// Whether any event is a cart-add
    pub has_cart_event: bool,
}

// ============================================
// Edges
// ============================================

/// A directed transition between two funnel nodes within one journey.
///
/// Node names are `None` when the event lacked the payload field its type is
/// named by (e.g. a product view without a product name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub journey_id: String,
    #[serde(default)]
    pub url_subdomain: String,
    /// Same as `to_node_type`
    pub event_type: String,
    /// Funnel level of the destination node
    pub phase_level: u8,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub source_type: String,
    pub from_node: Option<String>,
    pub from_node_type: String,
    pub to_node: Option<String>,
    pub to_node_type: String,
    pub total_time: f64,
    pub total_steps: usize,
    /// Always 1; summed by the analytics step
    pub freq: u64,
}

impl Edge {
    /// True when this edge leaves the funnel without passing through the cart.
    pub fn is_abandonment(&self) -> bool {
        self.to_node.as_deref() == Some(NODE_STOP) && self.from_node.as_deref() != Some(NODE_CART)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_event_type_roundtrip_names() {
        for name in [
            "index_view",
            "category_view",
            "product_view",
            "product_in_cart",
            "STOP",
        ] {
            assert_eq!(EventType::from(name).as_str(), name);
        }
        assert_eq!(
            EventType::from("newsletter_signup"),
            EventType::Other("newsletter_signup".to_string())
        );
        assert_eq!(
            EventType::from("newsletter_signup").to_string(),
            "newsletter_signup"
        );
    }

    #[test]
    fn test_identity_key_keeps_empty_components() {
        let mut event = RawEvent::new(ts(0), EventType::LandingView);
        event.ip = "1.1.1.1".to_string();
        event.device = "Mobile".to_string();
        event.url_subdomain = "example".to_string();

        assert_eq!(event.identity_key(), "1.1.1.1__Mobile_example");
    }

    #[test]
    fn test_exit_from_drops_payload() {
        let mut product = RawEvent::new(ts(42), EventType::ProductView);
        product.ip = "2.2.2.2".to_string();
        product.client_id = "7".to_string();
        product.source_type = "Misc".to_string();
        product.url = Some("http://example.com/product/a".to_string());
        product.product_name = Some("A".to_string());
        product.price = Some("10".to_string());
        product.referrer = Some("http://google.com".to_string());

        let exit = RawEvent::exit_from(&product);

        assert_eq!(exit.event_type, EventType::Exit);
        assert_eq!(exit.timestamp, product.timestamp);
        assert_eq!(exit.identity_key(), product.identity_key());
        assert_eq!(exit.source_type, "Misc");
        assert!(exit.url.is_none());
        assert!(exit.product_name.is_none());
        assert!(exit.price.is_none());
        assert!(exit.referrer.is_none());
    }

    #[test]
    fn test_edge_abandonment() {
        let mut edge = Edge {
            journey_id: "j_0".to_string(),
            url_subdomain: "example".to_string(),
            event_type: "STOP".to_string(),
            phase_level: 4,
            device: "Desktop".to_string(),
            source_type: "Misc".to_string(),
            from_node: Some("Shoes".to_string()),
            from_node_type: "category_view".to_string(),
            to_node: Some(NODE_STOP.to_string()),
            to_node_type: "STOP".to_string(),
            total_time: 0.0,
            total_steps: 1,
            freq: 1,
        };
        assert!(edge.is_abandonment());

        edge.from_node = Some(NODE_CART.to_string());
        assert!(!edge.is_abandonment());

        edge.from_node = None;
        assert!(edge.is_abandonment());
    }
}
