//! Raw log collection
//!
//! Downloads the most recent tracker log from the URL configured in
//! `~/.config/funnelgraph/config.toml`:
//!
//! ```toml
//! [collector]
//! url = "https://tracker.example.com/l/log.txt"
//! timeout_secs = 30
//! ```
//!
//! [`LogCollector`] is async; [`SyncLogCollector`] wraps it in a
//! current-thread runtime for the command-line tools.

mod client;

pub use client::{LogCollector, SyncLogCollector};

use std::path::Path;

use crate::error::Result;

/// What was collected, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSummary {
    /// Where the log came from
    pub source: String,
    /// Number of newline-terminated lines
    pub lines: usize,
    /// `<date> <time>` of the last line, if any
    pub last_date: Option<String>,
}

impl CollectSummary {
    pub fn new(source: &str, content: &str) -> Self {
        let last_date = content
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.split(' ').take(2).collect::<Vec<_>>().join(" "));

        Self {
            source: source.to_string(),
            lines: content.matches('\n').count(),
            last_date,
        }
    }
}

/// Write collected log text to disk.
pub fn save(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "Data written");
    Ok(())
}
