use citesense_common::{truncate_chars, RefMetadata, ResolutionOutcome};

/// Turn raw outcomes into user-facing records, keeping their order.
///
/// `order` is the 1-based batch position. Summaries are clamped to
/// `max_summary_length` again here so records built from outcomes produced
/// with a larger budget still honour the caller's limit.
pub fn normalize(outcomes: Vec<ResolutionOutcome>, max_summary_length: usize) -> Vec<RefMetadata> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(idx, outcome)| to_record(idx + 1, outcome, max_summary_length))
        .collect()
}

fn to_record(order: usize, outcome: ResolutionOutcome, max_summary_length: usize) -> RefMetadata {
    match outcome {
        ResolutionOutcome::Success(meta) => RefMetadata {
            url: meta.url,
            order,
            item_type: Some(meta.source_type.to_string()),
            title: Some(meta.title),
            summary: Some(truncate_chars(&meta.summary, max_summary_length)),
            authors: meta.authors,
            publication_date: meta.publication_date,
            image: meta.image,
            site_name: meta.site_name,
            debug: meta.debug,
        },
        ResolutionOutcome::Failure(failure) => RefMetadata {
            url: failure.url().to_string(),
            order,
            item_type: None,
            title: None,
            summary: None,
            authors: Vec::new(),
            publication_date: None,
            image: None,
            site_name: None,
            debug: failure.debug().clone(),
        },
    }
}
