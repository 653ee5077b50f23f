use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A tweet as returned by a vxtwitter-compatible API.
///
/// `t.co` links in `text` are usually already expanded by the API; the
/// quoted tweet, when present, is embedded one level deep under `qrt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VxTweet {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "tweetURL")]
    pub tweet_url: Option<String>,
    #[serde(rename = "tweetID")]
    pub tweet_id: Option<String>,
    pub user_name: Option<String>,
    pub user_screen_name: Option<String>,
    pub date: Option<String>,
    pub date_epoch: Option<i64>,
    #[serde(rename = "conversationID")]
    pub conversation_id: Option<String>,
    #[serde(rename = "replyingTo")]
    pub replying_to: Option<String>,
    #[serde(rename = "replyingToID")]
    pub replying_to_id: Option<String>,
    #[serde(rename = "qrtURL")]
    pub qrt_url: Option<String>,
    pub qrt: Option<Box<VxTweet>>,
    #[serde(rename = "mediaURLs", default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl VxTweet {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_epoch
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// URL of the quoted tweet, from `qrtURL` or the embedded `qrt` object.
    pub fn quoted_url(&self) -> Option<&str> {
        self.qrt_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.qrt.as_ref().and_then(|q| q.tweet_url.as_deref()))
    }

    /// Status id of the post this one replies to, if it is a reply.
    pub fn parent_status_id(&self) -> Option<&str> {
        self.replying_to_id.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE_TWEET: &str = r#"{
        "text": "This is worth a read",
        "tweetURL": "https://twitter.com/cognazor/status/1722598121887117753",
        "tweetID": "1722598121887117753",
        "user_name": "Cognazor",
        "user_screen_name": "cognazor",
        "date_epoch": 1699540000,
        "conversationID": "1722598121887117753",
        "replyingTo": null,
        "replyingToID": null,
        "qrtURL": "https://twitter.com/maksym_andr/status/1722235666724192688",
        "qrt": {
            "text": "Our new paper: https://arxiv.org/abs/2311.03348",
            "tweetURL": "https://twitter.com/maksym_andr/status/1722235666724192688",
            "tweetID": "1722235666724192688",
            "user_screen_name": "maksym_andr"
        },
        "mediaURLs": [],
        "hashtags": []
    }"#;

    #[test]
    fn parses_quote_tweet() {
        let tweet: VxTweet = serde_json::from_str(QUOTE_TWEET).unwrap();
        assert_eq!(tweet.user_screen_name.as_deref(), Some("cognazor"));
        assert_eq!(
            tweet.quoted_url(),
            Some("https://twitter.com/maksym_andr/status/1722235666724192688")
        );
        assert_eq!(tweet.parent_status_id(), None);
        assert_eq!(tweet.created_at().unwrap().timestamp(), 1699540000);
    }

    #[test]
    fn quoted_url_falls_back_to_embedded_qrt() {
        let tweet = VxTweet {
            qrt: Some(Box::new(VxTweet {
                tweet_url: Some("https://x.com/a/status/1".into()),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(tweet.quoted_url(), Some("https://x.com/a/status/1"));
    }

    #[test]
    fn empty_qrt_url_means_no_quote() {
        let tweet = VxTweet {
            qrt_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(tweet.quoted_url(), None);
    }

    #[test]
    fn reply_exposes_parent_status_id() {
        let tweet: VxTweet = serde_json::from_str(
            r#"{"text": "agreed", "replyingTo": "maksym_andr", "replyingToID": "1722235666724192688"}"#,
        )
        .unwrap();
        assert_eq!(tweet.parent_status_id(), Some("1722235666724192688"));

        let blank = VxTweet {
            replying_to_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.parent_status_id(), None);
    }

    #[test]
    fn sparse_payload_still_parses() {
        let tweet: VxTweet = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(tweet.text, "hi");
        assert!(tweet.media_urls.is_empty());
        assert!(tweet.created_at().is_none());
    }
}
