//! HTTP client for the raw tracker log

use std::time::Duration;

use crate::config::CollectorConfig;
use crate::error::{Error, Result};

use super::CollectSummary;

/// Fetches the most recent raw log over HTTP.
pub struct LogCollector {
    http_client: reqwest::Client,
    url: String,
}

impl LogCollector {
    /// Create a new collector from configuration
    ///
    /// Returns an error if the configuration is invalid or missing the url.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        config.validate()?;

        let url = config
            .url
            .clone()
            .ok_or_else(|| Error::Config("collector.url is required".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, url })
    }

    /// The url logs are fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the log body.
    pub async fn fetch(&self) -> Result<String> {
        tracing::debug!(url = %self.url, "Fetching raw log");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Collector(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| Error::Collector(format!("failed to read response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Collector(format!(
                "could not fetch log file ({}): {}",
                status, error_text
            )))
        }
    }

    /// Download the log and summarize it.
    pub async fn collect(&self) -> Result<(String, CollectSummary)> {
        let content = self.fetch().await.map_err(|e| {
            tracing::error!(
                url = %self.url,
                error = %e,
                "Could not fetch log file. Please check internet connection"
            );
            e
        })?;

        let summary = CollectSummary::new(&self.url, &content);
        tracing::info!(
            source = %summary.source,
            lines = summary.lines,
            last_date = summary.last_date.as_deref().unwrap_or("-"),
            "Data collection completed successfully"
        );

        Ok((content, summary))
    }
}

/// Synchronous wrapper for [`LogCollector`]
///
/// Provides blocking methods for use in synchronous code.
pub struct SyncLogCollector {
    inner: LogCollector,
    runtime: tokio::runtime::Runtime,
}

impl SyncLogCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Collector(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            inner: LogCollector::new(config)?,
            runtime,
        })
    }

    pub fn url(&self) -> &str {
        self.inner.url()
    }

    /// Download the log body (blocking)
    pub fn fetch(&self) -> Result<String> {
        self.runtime.block_on(self.inner.fetch())
    }

    /// Download and summarize the log (blocking)
    pub fn collect(&self) -> Result<(String, CollectSummary)> {
        self.runtime.block_on(self.inner.collect())
    }
}
