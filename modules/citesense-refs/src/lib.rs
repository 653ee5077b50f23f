pub mod error;
pub mod extractor;
pub mod links;
pub mod source;
pub mod status;

pub use error::{ParseError, Result};
pub use extractor::ReferenceExtractor;
pub use links::extract_urls_from_text;
pub use source::{MockPostSource, PostSource, SourcePost, TweetSource};
pub use status::extract_twitter_status_id;
