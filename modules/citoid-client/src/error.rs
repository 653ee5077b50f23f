use thiserror::Error;

pub type Result<T> = std::result::Result<T, CitoidError>;

#[derive(Debug, Error)]
pub enum CitoidError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CitoidError {
    /// HTTP status of the failed response, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CitoidError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CitoidError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CitoidError::Timeout(err.to_string())
        } else if err.is_decode() {
            CitoidError::Parse(err.to_string())
        } else {
            CitoidError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CitoidError {
    fn from(err: serde_json::Error) -> Self {
        CitoidError::Parse(err.to_string())
    }
}
