//! Startup shared by every funnelgraph binary.

use anyhow::{Context, Result};
use funnelgraph_core::logging::LoggingGuard;
use funnelgraph_core::Config;

/// Load configuration and initialize file logging.
///
/// Keep the returned guard alive for the whole run so buffered log lines are
/// flushed on exit.
pub fn init(bin_name: &str) -> Result<(Config, LoggingGuard)> {
    let config = Config::load().context("failed to load configuration")?;

    let log_guard =
        funnelgraph_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(bin = bin_name, "Program started");

    Ok((config, log_guard))
}
