use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key under which a failure's cause is recorded in `debug` maps.
pub const DEBUG_ERROR_KEY: &str = "error";

/// Diagnostic annotations attached to a resolution result.
pub type DebugInfo = BTreeMap<String, String>;

// --- Resolution requests and outcomes ---

/// One URL to resolve, with the summary length budget for its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolutionRequest {
    url: String,
    max_summary_length: usize,
}

impl UrlResolutionRequest {
    /// The URL is taken verbatim; malformed input is left for the resolver to reject.
    pub fn new(url: impl Into<String>, max_summary_length: usize) -> Self {
        Self {
            url: url.into(),
            max_summary_length,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_summary_length(&self) -> usize {
        self.max_summary_length
    }
}

/// Kind of work a URL points at, as reported by the citation service.
///
/// Names follow Zotero item types; anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    JournalArticle,
    Preprint,
    ConferencePaper,
    Book,
    BookSection,
    Thesis,
    Report,
    Dataset,
    Software,
    NewspaperArticle,
    MagazineArticle,
    BlogPost,
    ForumPost,
    VideoRecording,
    Podcast,
    Webpage,
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::JournalArticle => "journalArticle",
            SourceType::Preprint => "preprint",
            SourceType::ConferencePaper => "conferencePaper",
            SourceType::Book => "book",
            SourceType::BookSection => "bookSection",
            SourceType::Thesis => "thesis",
            SourceType::Report => "report",
            SourceType::Dataset => "dataset",
            SourceType::Software => "computerProgram",
            SourceType::NewspaperArticle => "newspaperArticle",
            SourceType::MagazineArticle => "magazineArticle",
            SourceType::BlogPost => "blogPost",
            SourceType::ForumPost => "forumPost",
            SourceType::VideoRecording => "videoRecording",
            SourceType::Podcast => "podcast",
            SourceType::Webpage => "webpage",
            SourceType::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for SourceType {
    fn from(s: &str) -> Self {
        match s {
            "journalArticle" => SourceType::JournalArticle,
            "preprint" => SourceType::Preprint,
            "conferencePaper" => SourceType::ConferencePaper,
            "book" => SourceType::Book,
            "bookSection" => SourceType::BookSection,
            "thesis" => SourceType::Thesis,
            "report" => SourceType::Report,
            "dataset" => SourceType::Dataset,
            "computerProgram" => SourceType::Software,
            "newspaperArticle" => SourceType::NewspaperArticle,
            "magazineArticle" => SourceType::MagazineArticle,
            "blogPost" => SourceType::BlogPost,
            "forumPost" => SourceType::ForumPost,
            "videoRecording" => SourceType::VideoRecording,
            "podcast" => SourceType::Podcast,
            "webpage" | "" => SourceType::Webpage,
            other => SourceType::Other(other.to_string()),
        }
    }
}

impl From<String> for SourceType {
    fn from(s: String) -> Self {
        SourceType::from(s.as_str())
    }
}

impl From<SourceType> for String {
    fn from(t: SourceType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bibliographic metadata for one successfully resolved URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// Echo of the requested URL, not the canonical URL the service reports.
    pub url: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub publication_date: Option<String>,
    pub source_type: SourceType,
    pub image: Option<String>,
    pub site_name: Option<String>,
    pub debug: DebugInfo,
}

/// A resolution that produced no usable metadata.
///
/// `debug` always holds an `"error"` entry; construction goes through
/// [`ResolutionFailure::new`] so that cannot be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    url: String,
    debug: DebugInfo,
}

impl ResolutionFailure {
    pub fn new(url: impl Into<String>, error: impl fmt::Display) -> Self {
        let mut debug = DebugInfo::new();
        debug.insert(DEBUG_ERROR_KEY.to_string(), error.to_string());
        Self {
            url: url.into(),
            debug,
        }
    }

    /// Attach an extra diagnostic. The `"error"` entry cannot be overwritten here.
    pub fn with_detail(mut self, key: &str, value: impl fmt::Display) -> Self {
        if key != DEBUG_ERROR_KEY {
            self.debug.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn error(&self) -> &str {
        self.debug
            .get(DEBUG_ERROR_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn debug(&self) -> &DebugInfo {
        &self.debug
    }
}

/// Result of resolving one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Success(ResolvedMetadata),
    Failure(ResolutionFailure),
}

impl ResolutionOutcome {
    pub fn url(&self) -> &str {
        match self {
            ResolutionOutcome::Success(meta) => &meta.url,
            ResolutionOutcome::Failure(failure) => failure.url(),
        }
    }

    pub fn debug(&self) -> &DebugInfo {
        match self {
            ResolutionOutcome::Success(meta) => &meta.debug,
            ResolutionOutcome::Failure(failure) => failure.debug(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success(_))
    }

    pub fn metadata(&self) -> Option<&ResolvedMetadata> {
        match self {
            ResolutionOutcome::Success(meta) => Some(meta),
            ResolutionOutcome::Failure(_) => None,
        }
    }
}

// --- User-facing records ---

/// Normalized, serializable record handed back to callers of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefMetadata {
    pub url: String,
    /// 1-based position of this URL in the batch.
    pub order: usize,
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publication_date: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    #[serde(default)]
    pub debug: DebugInfo,
}

impl RefMetadata {
    pub fn is_error(&self) -> bool {
        self.debug.contains_key(DEBUG_ERROR_KEY)
    }
}

// --- Social posts ---

/// A post with every external URL it references, quoted posts included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedPost {
    pub post_url: String,
    pub status_id: String,
    pub text: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub quoted_post_url: Option<String>,
    /// Status id of the parent post when this post is a reply.
    pub replying_to_status_id: Option<String>,
    pub ref_urls: Vec<String>,
}

impl ReferencedPost {
    pub fn has_refs(&self) -> bool {
        !self.ref_urls.is_empty()
    }
}

/// Clamp `text` to at most `max_chars` characters.
///
/// A raw cut: no word-boundary search and no ellipsis. Counts chars rather
/// than bytes so multi-byte text is never split mid-sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_shorter_text_is_unchanged() {
        assert_eq!(truncate_chars("short", 30), "short");
    }

    #[test]
    fn truncate_cuts_at_exact_length() {
        assert_eq!(truncate_chars("abcdefghij", 4), "abcd");
        assert_eq!(truncate_chars("abcd", 4), "abcd");
    }

    #[test]
    fn truncate_respects_multibyte_chars() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn truncate_zero_yields_empty() {
        assert_eq!(truncate_chars("anything", 0), "");
    }

    #[test]
    fn failure_always_carries_error_key() {
        let failure = ResolutionFailure::new("bad://url", "unsupported scheme")
            .with_detail("status", 400)
            .with_detail(DEBUG_ERROR_KEY, "overwritten?");
        assert_eq!(failure.error(), "unsupported scheme");
        assert_eq!(failure.debug().get("status").map(String::as_str), Some("400"));
    }

    #[test]
    fn outcome_exposes_url_for_both_variants() {
        let ok = ResolutionOutcome::Success(ResolvedMetadata {
            url: "https://a.com".into(),
            title: "A".into(),
            summary: String::new(),
            authors: vec![],
            publication_date: None,
            source_type: SourceType::Webpage,
            image: None,
            site_name: None,
            debug: DebugInfo::new(),
        });
        let err = ResolutionOutcome::Failure(ResolutionFailure::new("https://b.com", "boom"));
        assert_eq!(ok.url(), "https://a.com");
        assert_eq!(err.url(), "https://b.com");
        assert!(ok.is_success());
        assert!(!err.debug().is_empty());
    }

    #[test]
    fn source_type_round_trips_known_and_unknown_names() {
        assert_eq!(SourceType::from("journalArticle"), SourceType::JournalArticle);
        assert_eq!(SourceType::from("computerProgram").as_str(), "computerProgram");
        assert_eq!(
            SourceType::from("hearing"),
            SourceType::Other("hearing".to_string())
        );
        assert_eq!(SourceType::from(""), SourceType::Webpage);
    }

    #[test]
    fn source_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&SourceType::Preprint).unwrap();
        assert_eq!(json, "\"preprint\"");
        let parsed: SourceType = serde_json::from_str("\"statute\"").unwrap();
        assert_eq!(parsed, SourceType::Other("statute".into()));
    }

    #[test]
    fn has_refs_follows_ref_urls() {
        let mut post = ReferencedPost {
            post_url: "https://x.com/a/status/1".into(),
            status_id: "1".into(),
            text: String::new(),
            author: None,
            created_at: None,
            quoted_post_url: None,
            replying_to_status_id: None,
            ref_urls: vec![],
        };
        assert!(!post.has_refs());
        post.ref_urls.push("https://example.com".into());
        assert!(post.has_refs());
    }
}
