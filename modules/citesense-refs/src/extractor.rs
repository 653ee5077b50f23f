// Reference extraction: post URL → every external link the post points at,
// following quotes and reply parents.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use citesense_common::{CiteSenseError, Config, ReferencedPost};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{ParseError, Result};
use crate::links::{dedup_key, extract_urls_from_text, is_shortened, same_resource};
use crate::source::{PostSource, SourcePost};
use crate::status::{extract_twitter_status_id, is_platform_media_link, is_platform_status_link};

#[derive(Debug, Clone, Copy)]
enum Relation {
    Quote,
    Reply,
}

impl Relation {
    fn as_str(self) -> &'static str {
        match self {
            Relation::Quote => "quote",
            Relation::Reply => "reply",
        }
    }
}

pub struct ReferenceExtractor {
    source: Arc<dyn PostSource>,
    max_quote_depth: usize,
    max_concurrency: usize,
}

impl ReferenceExtractor {
    pub fn new(source: Arc<dyn PostSource>, max_quote_depth: usize) -> Self {
        Self {
            source,
            max_quote_depth,
            max_concurrency: 1,
        }
    }

    pub fn from_config(
        source: Arc<dyn PostSource>,
        config: &Config,
    ) -> std::result::Result<Self, CiteSenseError> {
        config.validate()?;
        Ok(Self::new(source, config.max_quote_depth).with_max_concurrency(config.max_concurrency))
    }

    /// Posts fetched in parallel by [`Self::extract_references_batch`]. Clamped to at least 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Fetch a post and collect its external references: own text first,
    /// then those of the posts it quotes or replies to.
    ///
    /// Related posts are walked breadth-first, at most `max_quote_depth` hops
    /// from the root, each status id fetched once.
    pub async fn extract_references(&self, post_url: &str) -> Result<ReferencedPost> {
        let status_id = extract_twitter_status_id(post_url)
            .ok_or_else(|| ParseError::InvalidPostUrl(post_url.to_string()))?;

        let root = self
            .source
            .fetch_post(&status_id)
            .await
            .map_err(|e| ParseError::Fetch {
                post_url: post_url.to_string(),
                message: e.to_string(),
            })?;

        let mut collector = RefCollector::new(post_url);
        collector.collect(self.source.as_ref(), &root).await;

        let mut visited = HashSet::from([status_id.clone()]);
        let mut frontier = VecDeque::new();
        self.enqueue_related(post_url, &root, 1, &mut frontier);
        let mut depth_reached = 0;

        while let Some((related_id, depth, relation)) = frontier.pop_front() {
            if !visited.insert(related_id.clone()) {
                debug!(post_url, status_id = related_id.as_str(), "Related post already visited");
                continue;
            }

            match self.source.fetch_post(&related_id).await {
                Ok(related) => {
                    depth_reached = depth_reached.max(depth);
                    collector.collect(self.source.as_ref(), &related).await;
                    self.enqueue_related(post_url, &related, depth + 1, &mut frontier);
                }
                Err(e) => {
                    warn!(
                        post_url,
                        status_id = related_id.as_str(),
                        relation = relation.as_str(),
                        error = %e,
                        "Failed to fetch related post, keeping refs collected so far"
                    );
                }
            }
        }

        let post = ReferencedPost {
            post_url: post_url.to_string(),
            status_id,
            text: root.text,
            author: root.author,
            created_at: root.created_at,
            quoted_post_url: root.quoted_post_url,
            replying_to_status_id: root.replying_to_status_id,
            ref_urls: collector.into_urls(),
        };

        info!(
            post_url,
            refs = post.ref_urls.len(),
            depth = depth_reached,
            "Extracted post references"
        );
        Ok(post)
    }

    /// Queue the quoted post, then the parent post, unless `depth` is past the limit.
    fn enqueue_related(
        &self,
        post_url: &str,
        post: &SourcePost,
        depth: usize,
        frontier: &mut VecDeque<(String, usize, Relation)>,
    ) {
        if post.quoted_post_url.is_none() && post.replying_to_status_id.is_none() {
            return;
        }
        if depth > self.max_quote_depth {
            debug!(post_url, depth, "Related post depth limit reached");
            return;
        }

        if let Some(quoted_url) = post.quoted_post_url.as_deref() {
            match extract_twitter_status_id(quoted_url) {
                Some(quoted_id) => frontier.push_back((quoted_id, depth, Relation::Quote)),
                None => warn!(post_url, quoted_url, "Quoted post URL has no status id"),
            }
        }
        if let Some(parent_id) = &post.replying_to_status_id {
            frontier.push_back((parent_id.clone(), depth, Relation::Reply));
        }
    }

    /// Extract many posts; one result per input, in input order. A failure
    /// for one post never affects the others.
    pub async fn extract_references_batch(&self, post_urls: &[String]) -> Vec<Result<ReferencedPost>> {
        let mut slots: Vec<Option<Result<ReferencedPost>>> = (0..post_urls.len()).map(|_| None).collect();

        let mut completed = stream::iter(post_urls.iter().enumerate().map(|(idx, url)| async move {
            (idx, self.extract_references(url).await)
        }))
        .buffer_unordered(self.max_concurrency);

        while let Some((idx, result)) = completed.next().await {
            slots[idx] = Some(result);
        }

        slots
            .into_iter()
            .zip(post_urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    Err(ParseError::Fetch {
                        post_url: url.clone(),
                        message: "extraction result was never collected".to_string(),
                    })
                })
            })
            .collect()
    }
}

/// Accumulates external URLs across related posts, deduplicated in first-seen order.
struct RefCollector {
    root_url: String,
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl RefCollector {
    fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            seen: HashSet::new(),
            urls: Vec::new(),
        }
    }

    async fn collect(&mut self, source: &dyn PostSource, post: &SourcePost) {
        for raw in extract_urls_from_text(&post.text) {
            let url = if is_shortened(&raw) {
                match source.expand_link(&raw).await {
                    Ok(expanded) => expanded,
                    Err(e) => {
                        debug!(url = raw.as_str(), error = %e, "Could not expand short link");
                        raw
                    }
                }
            } else {
                raw
            };

            if self.is_self_reference(&url, post) {
                continue;
            }
            if self.seen.insert(dedup_key(&url)) {
                self.urls.push(url);
            }
        }
    }

    fn is_self_reference(&self, url: &str, post: &SourcePost) -> bool {
        same_resource(url, &self.root_url)
            || (!post.post_url.is_empty() && same_resource(url, &post.post_url))
            || is_platform_status_link(url)
            || is_platform_media_link(url)
    }

    fn into_urls(self) -> Vec<String> {
        self.urls
    }
}
