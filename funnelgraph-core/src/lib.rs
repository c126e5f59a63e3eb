//! # funnelgraph-core
//!
//! Core library for funnelgraph - turns raw e-commerce tracker logs into a
//! shopping-funnel graph.
//!
//! This library provides:
//! - Raw log ingestion (parsing, device and traffic-source classification)
//! - Journey segmentation, phase compression and edge extraction
//! - Funnel analytics (abandonment, cart conversion, weighted edges)
//! - CSV tables, configuration and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through four stages, each with a CSV table between them:
//! - **Collect:** the raw log text, fetched over HTTP or read from disk
//! - **Prepare:** one [`RawEvent`] per relevant log line
//! - **Graph:** one [`Edge`] per compressed funnel step, per journey
//! - **Analyze:** global stats and weighted node-to-node edges
//!
//! ## Example
//!
//! ```rust,no_run
//! use funnelgraph_core::{analytics, build_graph, ingest, Config};
//! use std::path::Path;
//!
//! let config = Config::load().expect("failed to load config");
//! let prepared = ingest::prepare_file(Path::new("log.txt"), &config.ingest)
//!     .expect("failed to read log");
//! let graph = build_graph(prepared.events, &config.journey);
//! let analysis = analytics::analyze(&graph.edges);
//! println!("{} visitors", analysis.stats.visitors);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use graph::{build_graph, GraphResult};
pub use types::*;

// Public modules
pub mod analytics;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod table;
pub mod types;
