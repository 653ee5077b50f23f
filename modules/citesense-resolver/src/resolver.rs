// Single-URL resolution: one citation lookup, every failure mode folded into
// a ResolutionOutcome.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use citesense_common::{
    truncate_chars, DebugInfo, ResolutionFailure, ResolutionOutcome, ResolvedMetadata,
    SourceType, UrlResolutionRequest,
};
use citoid_client::{CitoidError, CitoidItem, Creator};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::source::CitationSource;

#[derive(Clone)]
pub struct SingleUrlResolver {
    source: Arc<dyn CitationSource>,
    timeout: Duration,
}

impl SingleUrlResolver {
    pub fn new(source: Arc<dyn CitationSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Resolve one URL. Never returns an error and never panics: network
    /// errors, bad status codes, garbage bodies, timeouts and panics inside
    /// the source all come back as `ResolutionOutcome::Failure`.
    pub async fn resolve(&self, request: &UrlResolutionRequest) -> ResolutionOutcome {
        let url = request.url();
        let lookup = AssertUnwindSafe(self.source.lookup(url)).catch_unwind();

        let outcome = match tokio::time::timeout(self.timeout, lookup).await {
            Err(_) => ResolutionOutcome::Failure(ResolutionFailure::new(
                url,
                format!("timed out after {}s", self.timeout.as_secs_f64()),
            )),
            Ok(Err(panic)) => ResolutionOutcome::Failure(ResolutionFailure::new(
                url,
                format!("citation lookup panicked: {}", panic_message(&*panic)),
            )),
            Ok(Ok(Err(e))) => ResolutionOutcome::Failure(failure_from_error(url, &e)),
            Ok(Ok(Ok(items))) => from_items(url, items, request.max_summary_length()),
        };

        match &outcome {
            ResolutionOutcome::Success(_) => debug!(url, "Resolved citation"),
            ResolutionOutcome::Failure(f) => warn!(url, error = f.error(), "Citation lookup failed"),
        }
        outcome
    }
}

fn failure_from_error(url: &str, err: &CitoidError) -> ResolutionFailure {
    let failure = ResolutionFailure::new(url, err);
    match err.status() {
        Some(status) => failure.with_detail("status", status),
        None => failure,
    }
}

/// Build metadata from the first usable item. An empty or blank response is a failure.
fn from_items(url: &str, items: Vec<CitoidItem>, max_summary_length: usize) -> ResolutionOutcome {
    let item_count = items.len();
    let Some(item) = items.into_iter().find(CitoidItem::is_usable) else {
        let reason = if item_count == 0 {
            "citation service returned no items"
        } else {
            "citation service returned no usable metadata"
        };
        return ResolutionOutcome::Failure(ResolutionFailure::new(url, reason));
    };

    let mut debug = DebugInfo::new();
    if item_count > 1 {
        debug.insert("candidates".to_string(), item_count.to_string());
    }

    let title = match non_blank(item.title.as_deref()) {
        Some(t) => t.to_string(),
        None => {
            debug.insert("missing".to_string(), "title".to_string());
            String::new()
        }
    };

    let summary = non_blank(item.abstract_note.as_deref())
        .map(|s| truncate_chars(s, max_summary_length))
        .unwrap_or_default();

    ResolutionOutcome::Success(ResolvedMetadata {
        url: url.to_string(),
        title,
        summary,
        authors: item.creators.iter().filter_map(Creator::display_name).collect(),
        publication_date: non_blank(item.date.as_deref()).map(str::to_string),
        source_type: SourceType::from(item.item_type.as_deref().unwrap_or_default()),
        image: non_blank(item.image.as_deref()).map(str::to_string),
        site_name: item.site_name().map(str::to_string),
        debug,
    })
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
