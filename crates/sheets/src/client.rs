//! HTTP client for published spreadsheet CSV exports.
//!
//! Wraps the export endpoint (`/d/{sheet_id}/export?format=csv&gid={gid}`)
//! using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;

use crate::source::{CsvSource, SheetRef};

/// Default export host.
pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets";

/// Upper bound on how much of an error body is kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Errors from the spreadsheet export layer.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The export endpoint returned a non-2xx status code.
    #[error("Spreadsheet export error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },
}

/// HTTP client for spreadsheet exports.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    /// Create a client whose requests give up after `timeout`.
    ///
    /// * `base_url` - Export host, e.g. `https://docs.google.com/spreadsheets`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// CSV export URL for a tab.
    pub fn export_url(&self, sheet: &SheetRef) -> String {
        format!(
            "{}/d/{}/export?format=csv&gid={}",
            self.base_url, sheet.sheet_id, sheet.gid
        )
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise return a
    /// [`SheetsError::Upstream`] carrying the status and (truncated) body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SheetsError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CsvSource for SheetsClient {
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String, SheetsError> {
        let url = self.export_url(sheet);
        tracing::debug!(%url, "Fetching spreadsheet export");

        let response = self.client.get(&url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }
}
