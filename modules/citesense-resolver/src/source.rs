// Citation source: trait boundary between the resolver and the citation service.
//
// Production wires in Citoid over HTTP; tests use MockCitationSource.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use citoid_client::{CitoidClient, CitoidError, CitoidItem};

/// Anything that can turn a URL into Zotero-style citation items.
#[async_trait]
pub trait CitationSource: Send + Sync {
    async fn lookup(&self, url: &str) -> citoid_client::Result<Vec<CitoidItem>>;
}

// ---------------------------------------------------------------------------
// CitoidSource (production)
// ---------------------------------------------------------------------------

pub struct CitoidSource {
    client: CitoidClient,
}

impl CitoidSource {
    pub fn new(client: CitoidClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CitationSource for CitoidSource {
    async fn lookup(&self, url: &str) -> citoid_client::Result<Vec<CitoidItem>> {
        self.client.fetch_citation(url).await
    }
}

// ---------------------------------------------------------------------------
// MockCitationSource (for tests)
// ---------------------------------------------------------------------------

/// Canned behaviour for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Items(Vec<CitoidItem>),
    Error { status: u16, message: String },
    /// Never completes; only a caller-side deadline ends the call.
    Hang,
    Panic,
}

impl MockResponse {
    /// A single webpage item with the given title and abstract.
    pub fn page(title: &str, summary: &str) -> Self {
        MockResponse::Items(vec![CitoidItem {
            item_type: Some("webpage".to_string()),
            title: Some(title.to_string()),
            abstract_note: Some(summary.to_string()),
            ..Default::default()
        }])
    }
}

/// Records lookups and replays canned responses. Unknown URLs get a 404.
pub struct MockCitationSource {
    responses: Mutex<HashMap<String, (MockResponse, Duration)>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockCitationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCitationSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn on(self, url: &str, response: MockResponse) -> Self {
        self.on_delayed(url, response, Duration::ZERO)
    }

    /// Respond after `delay`, to shuffle completion order in concurrent tests.
    pub fn on_delayed(self, url: &str, response: MockResponse, delay: Duration) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (response, delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of lookups that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CitationSource for MockCitationSource {
    async fn lookup(&self, url: &str) -> citoid_client::Result<Vec<CitoidItem>> {
        self.calls.lock().unwrap().push(url.to_string());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let canned = self.responses.lock().unwrap().get(url).cloned();
        let (response, delay) = canned.unwrap_or_else(|| {
            (
                MockResponse::Error {
                    status: 404,
                    message: format!("Unable to load URL {url}"),
                },
                Duration::ZERO,
            )
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Items(items) => Ok(items),
            MockResponse::Error { status, message } => Err(CitoidError::Api { status, message }),
            MockResponse::Hang => std::future::pending().await,
            MockResponse::Panic => panic!("mock citation source exploded on {url}"),
        }
    }
}
