//! Ingestion layer for raw tracker logs
//!
//! Turns the raw log text into the flat [`RawEvent`] table the graph builder
//! consumes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │  Raw log     │ ──► │ parse_line   │ ──► │ drop irrelevant  │ ──► │ classify    │
//! │  (text)      │     │ (per line)   │     │ rows (no url,    │     │ subdomain,  │
//! │              │     │              │     │  excluded urls)  │     │ device, src │
//! └──────────────┘     └──────────────┘     └──────────────────┘     └─────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Malformed lines never fail the batch: they are logged as warnings, recorded
//! in [`PrepareResult::warnings`] and skipped. Only I/O errors are returned.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnelgraph_core::config::IngestConfig;
//! use funnelgraph_core::ingest;
//!
//! let result = ingest::prepare(&content, &IngestConfig::default());
//! println!("{} events, {} warnings", result.events.len(), result.warnings.len());
//! ```

pub mod classify;
mod parser;
pub mod url;

pub use classify::{Device, SourceType};
pub use parser::{parse_line, split_line, LineParts};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::types::RawEvent;
use std::path::Path;

/// Result of preparing one raw log.
#[derive(Debug, Default)]
pub struct PrepareResult {
    /// Prepared events, in log order
    pub events: Vec<RawEvent>,
    /// Non-blank lines read
    pub lines_read: usize,
    /// Parsed rows dropped as irrelevant (no url, or excluded url)
    pub dropped: usize,
    /// Warnings encountered during parsing (non-fatal)
    pub warnings: Vec<String>,
}

/// Prepare raw log text.
pub fn prepare(content: &str, config: &IngestConfig) -> PrepareResult {
    let mut result = PrepareResult::default();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        result.lines_read += 1;

        let mut event = match parse_line(line, i + 1) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed log line");
                result.warnings.push(e.to_string());
                continue;
            }
        };

        if !is_relevant(&event, config) {
            result.dropped += 1;
            continue;
        }

        annotate(&mut event);
        result.events.push(event);
    }

    tracing::info!(
        lines = result.lines_read,
        events = result.events.len(),
        dropped = result.dropped,
        warnings = result.warnings.len(),
        "Data preparation completed successfully"
    );

    result
}

/// Read and prepare a raw log file.
pub fn prepare_file(path: &Path, config: &IngestConfig) -> Result<PrepareResult> {
    tracing::debug!(path = %path.display(), "Reading raw log");
    let content = std::fs::read_to_string(path)?;
    Ok(prepare(&content, config))
}

/// Rows without a url, or with an excluded url, are test or bot traffic.
fn is_relevant(event: &RawEvent, config: &IngestConfig) -> bool {
    match event.url.as_deref() {
        None => false,
        Some(url) => !config
            .exclude_url_patterns
            .iter()
            .any(|pattern| url.contains(pattern.as_str())),
    }
}

/// Fill in the fields derived from url, referrer and user agent.
fn annotate(event: &mut RawEvent) {
    let page_url = event.url.as_deref();
    event.url_subdomain = page_url.and_then(url::subdomain).unwrap_or_default();
    event.device = Device::from_user_agent(&event.user_agent).to_string();
    event.source_type = SourceType::classify(page_url, event.referrer.as_deref()).to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;

    const LOG: &str = r#"2022-09-01 10:00:00 1.1.1.1 {"cid": "1", "data": {"event": "index_view", "url": "http://shop.example.com/landing/home", "referrer": "https://www.google.com/"}} Mozilla/5.0 (Windows NT 10.0; Win64; x64)
2022-09-01 10:00:05 1.1.1.1 {"cid": "1", "data": {"event": "product_view", "name": "Red Shoe", "url": "http://shop.example.com/product/red-shoe", "referrer": ""}} Mozilla/5.0 (Windows NT 10.0; Win64; x64)

this line is not a log record
2022-09-01 10:00:07 9.9.9.9 {"cid": "9", "data": {"event": "index_view"}} curl/7.0
2022-09-01 10:00:09 8.8.8.8 {"cid": "8", "data": {"event": "index_view", "url": "http://staging.internal.net/"}} Mozilla/5.0 (iPhone)
2022-09-01 10:00:10 2.2.2.2 {"cid": "2", "data": {"event": "product_in_cart", "url": "http://shop.example.com/cart?fbclid=1"}} Mozilla/5.0 (Linux; Android 11) Mobile
"#;

    fn config() -> IngestConfig {
        IngestConfig {
            exclude_url_patterns: vec!["internal.net".to_string()],
        }
    }

    #[test]
    fn test_prepare_counts() {
        let result = prepare(LOG, &config());

        assert_eq!(result.lines_read, 6);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("line 4"));
        // one row without url, one excluded
        assert_eq!(result.dropped, 2);
        assert_eq!(result.events.len(), 3);
    }

    #[test]
    fn test_prepare_annotates_events() {
        let result = prepare(LOG, &config());

        let landing = &result.events[0];
        assert_eq!(landing.event_type, EventType::LandingView);
        assert_eq!(landing.url_subdomain, "example");
        assert_eq!(landing.device, "Desktop");
        assert_eq!(landing.source_type, "Organic Search");
        assert_eq!(landing.identity_key(), "1.1.1.1_1_Desktop_example");

        let product = &result.events[1];
        assert_eq!(product.source_type, "Misc");
        assert_eq!(product.product_name.as_deref(), Some("Red Shoe"));

        let cart = &result.events[2];
        assert_eq!(cart.device, "Mobile");
        assert_eq!(cart.source_type, "Social Sites");
    }

    #[test]
    fn test_prepare_without_exclusions_keeps_all_urls() {
        let result = prepare(LOG, &IngestConfig::default());
        assert_eq!(result.dropped, 1);
        assert_eq!(result.events.len(), 4);
    }

    #[test]
    fn test_prepare_file_missing() {
        let err = prepare_file(Path::new("/nonexistent/funnelgraph/log.txt"), &config());
        assert!(matches!(err, Err(crate::error::Error::Io(_))));
    }
}
