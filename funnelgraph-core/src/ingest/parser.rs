//! Raw log line parser
//!
//! Each line of the tracker log has the shape
//!
//! ```text
//! 2022-09-01 10:00:00 1.1.1.1 {"cid": "1", "data": {"event": "index_view", "url": "..."}} Mozilla/5.0 (...)
//! └──── timestamp ──┘ └─ ip ─┘ └──────────────────── JSON payload ─────────────────────┘ └─ user agent ─┘
//! ```
//!
//! The JSON payload is located by brace matching (quote-aware), so the user
//! agent may contain spaces, braces or anything else.
//!
//! Keys of nested `data` and `"0"` objects are merged into the top level
//! before fields are read; nested keys win over top-level ones.

use crate::error::{Error, Result};
use crate::types::{EventType, RawEvent};
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The three parts of a raw log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParts<'a> {
    /// `<date> <time> <ip>`
    pub timestamp_ip: &'a str,
    /// The JSON object, braces included
    pub data: &'a str,
    /// Everything after the JSON object, trimmed
    pub user_agent: &'a str,
}

/// Split a line into timestamp/ip, JSON payload and user agent.
pub fn split_line(line: &str) -> Option<LineParts<'_>> {
    let line = line.trim();

    // end of the third space-separated token
    let mut head_end = 0;
    for token in 0..3 {
        let rest = &line[head_end..];
        let skip = if token == 0 { 0 } else { 1 };
        let token_len = rest.get(skip..)?.find(' ').unwrap_or(rest.len() - skip);
        head_end += skip + token_len;
    }

    let timestamp_ip = &line[..head_end];
    let rest = line[head_end..].trim_start();
    if !rest.starts_with('{') {
        return None;
    }

    let data_end = matching_brace(rest)?;
    Some(LineParts {
        timestamp_ip,
        data: &rest[..=data_end],
        user_agent: rest[data_end + 1..].trim(),
    })
}

/// Byte index of the brace closing the object that opens `s`.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse one raw log line into an event.
///
/// `line_no` is 1-based and only used in error messages. Identity fields that
/// depend on classification (`device`, `url_subdomain`, `source_type`) are
/// left empty here and filled in by [`super::prepare`].
pub fn parse_line(line: &str, line_no: usize) -> Result<RawEvent> {
    let parse_err = |message: String| Error::Parse {
        line: line_no,
        message,
    };

    let parts = split_line(line)
        .ok_or_else(|| parse_err("expected `<date> <time> <ip> {json} <user agent>`".into()))?;

    let (timestamp_str, ip) = parts
        .timestamp_ip
        .rsplit_once(' ')
        .ok_or_else(|| parse_err("missing ip address".into()))?;
    let naive = NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT)
        .map_err(|e| parse_err(format!("invalid timestamp {:?}: {}", timestamp_str, e)))?;

    let payload: Value = serde_json::from_str(parts.data)
        .map_err(|e| parse_err(format!("invalid JSON payload: {}", e)))?;
    let Value::Object(payload) = payload else {
        return Err(parse_err("JSON payload is not an object".into()));
    };
    let fields = flatten_payload(payload);

    let event_type = field(&fields, "event").unwrap_or_default();
    let mut event = RawEvent::new(Utc.from_utc_datetime(&naive), EventType::from(event_type));
    event.ip = ip.to_string();
    event.client_id = field(&fields, "cid").unwrap_or_default();
    event.url = field(&fields, "url");
    event.category = field(&fields, "category");
    event.product_name = field(&fields, "name");
    event.price = field(&fields, "price");
    event.quantity = field(&fields, "quantity");
    event.referrer = field(&fields, "referrer");
    event.user_agent = parts.user_agent.to_string();

    Ok(event)
}

/// Merge `data` and `"0"` sub-objects into the top level.
fn flatten_payload(mut fields: Map<String, Value>) -> Map<String, Value> {
    for nested_key in ["data", "0"] {
        if let Some(Value::Object(nested)) = fields.remove(nested_key) {
            fields.extend(nested);
        }
    }
    fields
}

/// Read a field as text. Numbers keep their JSON spelling; null is absent.
fn field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
