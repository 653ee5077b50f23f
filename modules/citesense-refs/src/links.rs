use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Bare `http(s)://` URLs in plain post text.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bhttps?://[^\s<>"'\x{2026}]+"#).expect("valid regex"));

/// Hosts whose links only redirect somewhere else.
const SHORTENER_HOSTS: &[&str] = &["t.co", "bit.ly", "buff.ly", "ow.ly", "tinyurl.com", "dlvr.it"];

/// Strip punctuation that belongs to the sentence rather than the URL.
/// A closing paren is kept when the URL itself opened one (Wikipedia style).
fn trim_trailing_punctuation(raw: &str) -> &str {
    let mut url = raw;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | ']' | '}' | '>' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Extract every URL from plain text, in order of appearance. Deduplicates.
pub fn extract_urls_from_text(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for m in URL_RE.find_iter(text) {
        let url = trim_trailing_punctuation(m.as_str());
        if url::Url::parse(url).is_err() {
            continue;
        }
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }

    urls
}

/// True for links on a known link-shortener host.
pub fn is_shortened(url: &str) -> bool {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| SHORTENER_HOSTS.contains(&host.as_str()))
}

/// Identity used to deduplicate references: host without `www.`, path without a
/// trailing slash, and the query string. Unparseable input is its own key.
pub(crate) fn dedup_key(raw: &str) -> String {
    let Ok(parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };
    let host = host.trim_start_matches("www.").to_ascii_lowercase();
    let path = parsed.path().trim_end_matches('/');
    match parsed.query() {
        Some(query) => format!("{host}{path}?{query}"),
        None => format!("{host}{path}"),
    }
}

/// Compare two URLs by host and path only (no scheme, `www.`, trailing slash or query).
pub(crate) fn same_resource(a: &str, b: &str) -> bool {
    fn key(raw: &str) -> Option<String> {
        let parsed = url::Url::parse(raw).ok()?;
        let host = parsed.host_str()?.trim_start_matches("www.").to_ascii_lowercase();
        Some(format!("{host}{}", parsed.path().trim_end_matches('/')))
    }
    match (key(a), key(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}
