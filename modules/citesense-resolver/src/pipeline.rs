use std::sync::Arc;
use std::time::Duration;

use citesense_common::{CiteSenseError, Config, RefMetadata, ResolutionOutcome, UrlResolutionRequest};
use citoid_client::CitoidClient;
use tracing::info;

use crate::batch::BatchResolver;
use crate::normalize::normalize;
use crate::resolver::SingleUrlResolver;
use crate::source::{CitationSource, CitoidSource};

/// URLs in, normalized citation records out.
pub struct MetadataPipeline {
    batch: BatchResolver,
}

impl MetadataPipeline {
    pub fn new(
        source: Arc<dyn CitationSource>,
        request_timeout: Duration,
        max_concurrency: usize,
    ) -> Result<Self, CiteSenseError> {
        let resolver = SingleUrlResolver::new(source, request_timeout);
        Ok(Self {
            batch: BatchResolver::new(resolver, max_concurrency)?,
        })
    }

    /// Wire the production Citoid source around a shared HTTP client.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Result<Self, CiteSenseError> {
        config.validate()?;
        let citoid = CitoidClient::new(http).with_base_url(&config.citoid_base_url);
        Self::new(
            Arc::new(CitoidSource::new(citoid)),
            config.request_timeout,
            config.max_concurrency,
        )
    }

    /// Resolve without normalizing; one outcome per URL, in order.
    pub async fn resolve(&self, urls: &[String], max_summary_length: usize) -> Vec<ResolutionOutcome> {
        let requests: Vec<UrlResolutionRequest> = urls
            .iter()
            .map(|url| UrlResolutionRequest::new(url.as_str(), max_summary_length))
            .collect();
        self.batch.resolve_batch(&requests).await
    }

    /// Resolve and normalize. Fails only for a zero summary budget; per-URL
    /// problems show up as `debug["error"]` on the matching record.
    pub async fn extract_metadata(
        &self,
        urls: &[String],
        max_summary_length: usize,
    ) -> Result<Vec<RefMetadata>, CiteSenseError> {
        if max_summary_length == 0 {
            return Err(CiteSenseError::Validation(
                "max_summary_length must be positive".to_string(),
            ));
        }

        info!(count = urls.len(), max_summary_length, "Extracting reference metadata");
        let outcomes = self.resolve(urls, max_summary_length).await;
        Ok(normalize(outcomes, max_summary_length))
    }
}
