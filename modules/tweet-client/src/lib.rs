pub mod error;
pub mod types;

pub use error::{Result, TweetError};
pub use types::VxTweet;

pub const DEFAULT_BASE_URL: &str = "https://api.vxtwitter.com";

#[derive(Clone)]
pub struct TweetClient {
    client: reqwest::Client,
    base_url: String,
}

impl TweetClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch a single tweet by its numeric status id.
    pub async fn fetch_tweet(&self, status_id: &str) -> Result<VxTweet> {
        let url = format!("{}/i/status/{}", self.base_url, status_id);
        tracing::debug!(status_id, url = url.as_str(), "Fetching tweet");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TweetError::NotFound(status_id.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TweetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Follow redirects from a shortened link (e.g. `t.co`) and return the final URL.
    pub async fn expand_short_link(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() && !status.is_redirection() {
            return Err(TweetError::Api {
                status: status.as_u16(),
                message: format!("could not expand {url}"),
            });
        }
        Ok(resp.url().to_string())
    }
}
