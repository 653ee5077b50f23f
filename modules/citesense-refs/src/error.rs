/// Result type alias for reference extraction.
pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Not a post URL (no status id): {0}")]
    InvalidPostUrl(String),

    #[error("Failed to fetch post {post_url}: {message}")]
    Fetch { post_url: String, message: String },
}
