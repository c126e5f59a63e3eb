//! CSV tables
//!
//! Every stage of the pipeline reads and writes plain CSV with a header row,
//! so stages can run as separate tools. Empty cells are absent optional
//! values.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::analytics::{GlobalStats, WeightedEdge};
use crate::error::Result;
use crate::types::{Edge, RawEvent};

/// Read every record of a CSV file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<T>()
        .collect::<std::result::Result<Vec<T>, _>>()?;
    tracing::debug!(path = %path.display(), records = records.len(), "Read table");
    Ok(records)
}

/// Write records to a CSV file, replacing it.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), records = records.len(), "Wrote table");
    Ok(())
}

pub fn read_events(path: &Path) -> Result<Vec<RawEvent>> {
    read_records(path)
}

pub fn write_events(path: &Path, events: &[RawEvent]) -> Result<()> {
    write_records(path, events)
}

pub fn read_edges(path: &Path) -> Result<Vec<Edge>> {
    read_records(path)
}

pub fn write_edges(path: &Path, edges: &[Edge]) -> Result<()> {
    write_records(path, edges)
}

/// Write stats as `name,value` rows.
pub fn write_stats(path: &Path, stats: &GlobalStats) -> Result<()> {
    write_records(path, &stats.to_rows())
}

pub fn write_weighted_edges(path: &Path, edges: &[WeightedEdge]) -> Result<()> {
    write_records(path, edges)
}
