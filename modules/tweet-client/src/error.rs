use thiserror::Error;

pub type Result<T> = std::result::Result<T, TweetError>;

#[derive(Debug, Error)]
pub enum TweetError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Tweet not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TweetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TweetError::Parse(err.to_string())
        } else {
            TweetError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TweetError {
    fn from(err: serde_json::Error) -> Self {
        TweetError::Parse(err.to_string())
    }
}
