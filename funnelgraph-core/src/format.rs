//! Formatting helpers for human-readable reports.

/// Format a duration in seconds compactly (e.g., "1h 5m", "42s").
pub fn format_duration_secs(secs: f64) -> String {
    let secs = secs.max(0.0).round() as u64;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a ratio as a percentage with one decimal (e.g., "66.7%").
pub fn format_pct(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format an optional value, or a dash if missing.
pub fn format_opt<T>(value: Option<T>, format: impl Fn(T) -> String) -> String {
    match value {
        Some(v) => format(v),
        None => "-".to_string(),
    }
}
