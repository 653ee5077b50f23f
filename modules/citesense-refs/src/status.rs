// Twitter/X URL recognition: status ids, platform hosts, media links.

use std::sync::LazyLock;

use regex::Regex;

/// `https://[www.|mobile.](twitter|x).com/<any path>/status/<digits>`, the id ending the path segment.
static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.|mobile\.)?(?:twitter|x)\.com/(?:[^/?#]+/)*status(?:es)?/(\d+)(?:[/?#]|$)")
        .expect("valid regex")
});

/// Status links on Twitter/X and the common embed mirrors.
static ANY_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:www\.|mobile\.)?(?:twitter|x|fxtwitter|vxtwitter|fixupx|fixvx)\.com/(?:[^/?#]+/)*status(?:es)?/\d+(?:[/?#]|$)",
    )
    .expect("valid regex")
});

const MEDIA_HOSTS: &[&str] = &["pic.twitter.com", "pic.x.com", "pbs.twimg.com", "video.twimg.com"];

/// Extract the numeric status id from a Twitter/X post URL.
///
/// "https://twitter.com/TechCrunch/status/1798026045544710492?ref_src=twsrc" → "1798026045544710492"
///
/// Returns `None` for other hosts, URLs without a `/status/` segment, and
/// empty or non-numeric ids.
pub fn extract_twitter_status_id(url: &str) -> Option<String> {
    STATUS_RE
        .captures(url.trim())
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// True for links that point back at a post on the platform itself.
pub fn is_platform_status_link(url: &str) -> bool {
    ANY_STATUS_RE.is_match(url.trim())
}

/// True for attached-media links (`pic.twitter.com/...`, `pbs.twimg.com/...`).
pub fn is_platform_media_link(url: &str) -> bool {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| MEDIA_HOSTS.contains(&host.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_id_from_twitter_url() {
        assert_eq!(
            extract_twitter_status_id("https://twitter.com/TechCrunch/status/1798026045544710492"),
            Some("1798026045544710492".to_string())
        );
    }

    #[test]
    fn status_id_from_x_url() {
        assert_eq!(
            extract_twitter_status_id("https://x.com/TechCrunch/status/1798026045544710492"),
            Some("1798026045544710492".to_string())
        );
    }

    #[test]
    fn status_id_ignores_query_parameters() {
        assert_eq!(
            extract_twitter_status_id(
                "https://twitter.com/TechCrunch/status/1798026045544710492?ref_src=twsrc%5Etfw"
            ),
            Some("1798026045544710492".to_string())
        );
    }

    #[test]
    fn status_id_from_www_and_mobile_hosts() {
        assert_eq!(
            extract_twitter_status_id("https://mobile.twitter.com/a/status/42").as_deref(),
            Some("42")
        );
        assert_eq!(
            extract_twitter_status_id("https://www.x.com/a/status/42/photo/1").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn status_id_from_web_status_path() {
        assert_eq!(
            extract_twitter_status_id("https://twitter.com/i/web/status/1722235666724192688")
                .as_deref(),
            Some("1722235666724192688")
        );
    }

    #[test]
    fn other_domain_yields_none() {
        assert_eq!(
            extract_twitter_status_id("https://example.com/TechCrunch/status/1798026045544710492"),
            None
        );
        assert_eq!(
            extract_twitter_status_id("https://notx.com/TechCrunch/status/1798026045544710492"),
            None
        );
    }

    #[test]
    fn missing_status_yields_none() {
        assert_eq!(extract_twitter_status_id("https://twitter.com/TechCrunch"), None);
    }

    #[test]
    fn empty_id_yields_none() {
        assert_eq!(extract_twitter_status_id("https://twitter.com/TechCrunch/status/"), None);
        assert_eq!(extract_twitter_status_id("https://twitter.com/TechCrunch/status/abc"), None);
        assert_eq!(extract_twitter_status_id("https://twitter.com/TechCrunch/status/123abc"), None);
    }

    #[test]
    fn status_links_include_mirrors() {
        assert!(is_platform_status_link("https://x.com/a/status/1"));
        assert!(is_platform_status_link("https://fxtwitter.com/a/status/1"));
        assert!(!is_platform_status_link("https://twitter.com/a"));
        assert!(!is_platform_status_link("https://arxiv.org/abs/2311.03348"));
    }

    #[test]
    fn media_links() {
        assert!(is_platform_media_link("https://pic.twitter.com/abc123"));
        assert!(is_platform_media_link("https://pbs.twimg.com/media/x.jpg"));
        assert!(!is_platform_media_link("https://twitter.com/a/status/1"));
        assert!(!is_platform_media_link("not a url"));
    }
}
