pub mod error;
pub mod types;

pub use error::{CitoidError, Result};
pub use types::{CitoidItem, Creator};

/// Public Wikimedia endpoint returning Zotero-format JSON.
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/data/citation/zotero";

/// Thin client for the Citoid citation service.
///
/// The underlying `reqwest::Client` is passed in so one connection pool
/// (and its timeout/user-agent settings) can be shared across callers.
#[derive(Clone)]
pub struct CitoidClient {
    client: reqwest::Client,
    base_url: String,
}

impl CitoidClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different Citoid deployment (or a mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up citation metadata for `target`. One HTTP request, no retry.
    ///
    /// The target is sent as-is (percent-encoded into the path); Citoid
    /// decides whether it is a URL, DOI, ISBN or garbage.
    pub async fn fetch_citation(&self, target: &str) -> Result<Vec<CitoidItem>> {
        let endpoint = format!("{}/{}", self.base_url, urlencoding::encode(target));
        tracing::debug!(lookup = target, endpoint = endpoint.as_str(), "Requesting citation");

        let resp = self
            .client
            .get(&endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CitoidError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let items: Vec<CitoidItem> = serde_json::from_str(&body)?;
        tracing::debug!(lookup = target, count = items.len(), "Citation items received");

        Ok(items)
    }
}
