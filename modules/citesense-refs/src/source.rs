// Post source: trait boundary between the extractor and the social platform.
//
// Production wires in the vxtwitter-compatible TweetClient; tests use
// MockPostSource.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tweet_client::{TweetClient, VxTweet};

/// One post as fetched from the platform, before any link filtering.
#[derive(Debug, Clone, Default)]
pub struct SourcePost {
    pub post_url: String,
    pub status_id: String,
    pub text: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub quoted_post_url: Option<String>,
    /// Set when this post is a reply.
    pub replying_to_status_id: Option<String>,
}

#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_post(&self, status_id: &str) -> Result<SourcePost>;

    /// Resolve a shortened link to its destination. Default: no expansion.
    async fn expand_link(&self, url: &str) -> Result<String> {
        Ok(url.to_string())
    }
}

// ---------------------------------------------------------------------------
// TweetSource (production)
// ---------------------------------------------------------------------------

pub struct TweetSource {
    client: TweetClient,
}

impl TweetSource {
    pub fn new(client: TweetClient) -> Self {
        Self { client }
    }
}

impl From<VxTweet> for SourcePost {
    fn from(tweet: VxTweet) -> Self {
        let created_at = tweet.created_at();
        let quoted_post_url = tweet.quoted_url().map(str::to_string);
        let replying_to_status_id = tweet.parent_status_id().map(str::to_string);
        SourcePost {
            post_url: tweet.tweet_url.unwrap_or_default(),
            status_id: tweet.tweet_id.unwrap_or_default(),
            text: tweet.text,
            author: tweet.user_screen_name,
            created_at,
            quoted_post_url,
            replying_to_status_id,
        }
    }
}

#[async_trait]
impl PostSource for TweetSource {
    async fn fetch_post(&self, status_id: &str) -> Result<SourcePost> {
        let tweet = self.client.fetch_tweet(status_id).await?;
        let mut post = SourcePost::from(tweet);
        if post.status_id.is_empty() {
            post.status_id = status_id.to_string();
        }
        Ok(post)
    }

    async fn expand_link(&self, url: &str) -> Result<String> {
        Ok(self.client.expand_short_link(url).await?)
    }
}

// ---------------------------------------------------------------------------
// MockPostSource (for tests)
// ---------------------------------------------------------------------------

/// Serves posts from memory and records which status ids were fetched.
pub struct MockPostSource {
    posts: HashMap<String, SourcePost>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockPostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPostSource {
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            redirects: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_post(mut self, post: SourcePost) -> Self {
        self.posts.insert(post.status_id.clone(), post);
        self
    }

    pub fn with_redirect(mut self, short: &str, target: &str) -> Self {
        self.redirects.insert(short.to_string(), target.to_string());
        self
    }

    /// Fetching this status id fails like a network error would.
    pub fn with_failure(mut self, status_id: &str) -> Self {
        self.failing.insert(status_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostSource for MockPostSource {
    async fn fetch_post(&self, status_id: &str) -> Result<SourcePost> {
        self.calls.lock().unwrap().push(status_id.to_string());
        if self.failing.contains(status_id) {
            anyhow::bail!("connection reset while fetching {status_id}");
        }
        self.posts
            .get(status_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Tweet not found: {status_id}"))
    }

    async fn expand_link(&self, url: &str) -> Result<String> {
        self.redirects
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no redirect for {url}"))
    }
}
