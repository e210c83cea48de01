//! SB8200 adapter: fetches `cmconnectionstatus.html` and extracts readings.
//!
//! One collection issues exactly one GET. There is no retry: the next scrape
//! is the retry. The response body is read chunk by chunk into a bounded
//! buffer so a misbehaving endpoint cannot grow memory without limit.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sb8200_adapters::{ModemSource, sb8200::Sb8200Adapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = Sb8200Adapter::builder()
//!         .url("http://192.168.100.1/cmconnectionstatus.html")
//!         .build()?;
//!
//!     let snapshot = adapter.collect_within(Duration::from_secs(30)).await?;
//!
//!     for ds in &snapshot.downstream {
//!         println!("channel {}: {} dBmV, {} dB SNR", ds.channel, ds.power_dbmv, ds.snr_db);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use sb8200_types::Snapshot;

use crate::extract::extract_with;
use crate::layout::{PageLayout, SB8200_LAYOUT};
use crate::{AdapterError, ModemSource};

/// Status page of an SB8200 on its default management address.
pub const DEFAULT_URL: &str = "http://192.168.100.1/cmconnectionstatus.html";

/// Upper bound on the status page body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// SB8200 adapter for collecting channel readings.
#[derive(Debug, Clone)]
pub struct Sb8200Adapter {
    client: Client,
    url: String,
    max_body_bytes: usize,
    layout: PageLayout,
}

impl Sb8200Adapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> Sb8200AdapterBuilder {
        Sb8200AdapterBuilder::default()
    }

    /// The status page URL this adapter fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw status page.
    pub async fn fetch_page(&self) -> Result<String, AdapterError> {
        let mut response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "modem returned status {}",
                response.status()
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(AdapterError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(AdapterError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %self.url, bytes = body.len(), "fetched status page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl ModemSource for Sb8200Adapter {
    async fn collect(&self) -> Result<Snapshot, AdapterError> {
        let page = self.fetch_page().await?;
        extract_with(&page, &self.layout)
    }

    fn description(&self) -> &str {
        &self.url
    }
}

/// Builder for Sb8200Adapter.
#[derive(Debug, Default)]
pub struct Sb8200AdapterBuilder {
    url: Option<String>,
    timeout: Option<Duration>,
    max_body_bytes: Option<usize>,
    layout: Option<PageLayout>,
}

impl Sb8200AdapterBuilder {
    /// Set the status page URL (default: [`DEFAULT_URL`]).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the HTTP client timeout (default: 30 seconds).
    ///
    /// Callers normally bound each collection with
    /// [`ModemSource::collect_within`]; this is the backstop.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum accepted body size (default: 2 MiB).
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    /// Override the page layout (default: [`SB8200_LAYOUT`]).
    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<Sb8200Adapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Sb8200Adapter {
            client,
            url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            max_body_bytes: self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            layout: self.layout.unwrap_or(SB8200_LAYOUT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let adapter = Sb8200Adapter::builder().build().unwrap();
        assert_eq!(adapter.url, DEFAULT_URL);
        assert_eq!(adapter.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(adapter.layout, SB8200_LAYOUT);
        assert_eq!(adapter.description(), DEFAULT_URL);
    }

    #[test]
    fn test_builder_custom() {
        let adapter = Sb8200Adapter::builder()
            .url("http://modem.lan/cmconnectionstatus.html")
            .timeout(Duration::from_secs(5))
            .max_body_bytes(4096)
            .build()
            .unwrap();

        assert_eq!(adapter.url(), "http://modem.lan/cmconnectionstatus.html");
        assert_eq!(adapter.max_body_bytes, 4096);
    }
}
