// Batch resolution: bounded fan-out over SingleUrlResolver with results
// re-assembled in request order.

use std::time::Instant;

use citesense_common::{CiteSenseError, ResolutionFailure, ResolutionOutcome, UrlResolutionRequest};
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::resolver::SingleUrlResolver;

pub struct BatchResolver {
    resolver: SingleUrlResolver,
    max_concurrency: usize,
}

impl BatchResolver {
    /// `max_concurrency` caps how many lookups are in flight at once. Zero is
    /// a configuration error.
    pub fn new(resolver: SingleUrlResolver, max_concurrency: usize) -> Result<Self, CiteSenseError> {
        if max_concurrency == 0 {
            return Err(CiteSenseError::Config(
                "batch resolver needs max_concurrency >= 1".to_string(),
            ));
        }
        Ok(Self {
            resolver,
            max_concurrency,
        })
    }

    /// Resolve every request and return one outcome per request, in request order.
    ///
    /// Lookups complete in whatever order the network allows; each result is
    /// slotted back by its index. Duplicate URLs are looked up independently.
    pub async fn resolve_batch(&self, requests: &[UrlResolutionRequest]) -> Vec<ResolutionOutcome> {
        if requests.is_empty() {
            return Vec::new();
        }

        let started = Instant::now();
        let mut slots: Vec<Option<ResolutionOutcome>> = (0..requests.len()).map(|_| None).collect();

        let mut completed = stream::iter(requests.iter().enumerate().map(|(idx, request)| {
            let resolver = &self.resolver;
            async move { (idx, resolver.resolve(request).await) }
        }))
        .buffer_unordered(self.max_concurrency);

        while let Some((idx, outcome)) = completed.next().await {
            slots[idx] = Some(outcome);
        }

        let outcomes: Vec<ResolutionOutcome> = slots
            .into_iter()
            .zip(requests)
            .map(|(slot, request)| {
                slot.unwrap_or_else(|| {
                    ResolutionOutcome::Failure(ResolutionFailure::new(
                        request.url(),
                        "resolution result was never collected",
                    ))
                })
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            total = outcomes.len(),
            succeeded,
            failed = outcomes.len() - succeeded,
            max_concurrency = self.max_concurrency,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch resolution finished"
        );

        outcomes
    }
}
