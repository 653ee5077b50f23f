use serde::{Deserialize, Serialize};

/// A single Zotero-format item returned by Citoid.
///
/// Citoid answers with a JSON array of these; every field is optional
/// because coverage depends entirely on what the upstream translator found.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CitoidItem {
    pub key: Option<String>,
    #[serde(rename = "itemType")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstractNote")]
    pub abstract_note: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(rename = "websiteTitle")]
    pub website_title: Option<String>,
    #[serde(rename = "publicationTitle")]
    pub publication_title: Option<String>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "accessDate")]
    pub access_date: Option<String>,
    pub language: Option<String>,
    /// Citoid sometimes returns a preview image; Zotero itself has no such field.
    pub image: Option<String>,
}

impl CitoidItem {
    /// Name of the site or venue the item was published in.
    pub fn site_name(&self) -> Option<&str> {
        self.website_title
            .as_deref()
            .or(self.publication_title.as_deref())
    }

    /// Whether the item carries anything worth showing to a user.
    pub fn is_usable(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        has(&self.title) || has(&self.url)
    }
}

/// Author, editor, etc. of a Zotero item.
///
/// Zotero emits either a split `firstName`/`lastName` pair or a single
/// `name` for institutional creators.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Creator {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "creatorType")]
    pub creator_type: Option<String>,
}

impl Creator {
    /// "First Last", the single-field name, or whichever half is present.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(name.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_zotero_item() {
        let json = r#"[{
            "key": "ABCD1234",
            "itemType": "journalArticle",
            "title": "Attention Is All You Need",
            "abstractNote": "The dominant sequence transduction models...",
            "url": "https://arxiv.org/abs/1706.03762",
            "date": "2017-06-12",
            "creators": [
                {"firstName": "Ashish", "lastName": "Vaswani", "creatorType": "author"},
                {"name": "Google Brain", "creatorType": "author"}
            ],
            "publicationTitle": "arXiv",
            "DOI": "10.48550/arXiv.1706.03762"
        }]"#;

        let items: Vec<CitoidItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.item_type.as_deref(), Some("journalArticle"));
        assert_eq!(item.site_name(), Some("arXiv"));
        assert_eq!(item.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        let names: Vec<_> = item.creators.iter().filter_map(Creator::display_name).collect();
        assert_eq!(names, vec!["Ashish Vaswani", "Google Brain"]);
    }

    #[test]
    fn missing_creators_defaults_to_empty() {
        let item: CitoidItem = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(item.creators.is_empty());
        assert!(item.is_usable());
    }

    #[test]
    fn website_title_wins_over_publication_title() {
        let item = CitoidItem {
            website_title: Some("Blog".into()),
            publication_title: Some("Journal".into()),
            ..Default::default()
        };
        assert_eq!(item.site_name(), Some("Blog"));
    }

    #[test]
    fn blank_item_is_not_usable() {
        let item = CitoidItem {
            title: Some("   ".into()),
            item_type: Some("webpage".into()),
            ..Default::default()
        };
        assert!(!item.is_usable());
    }

    #[test]
    fn creator_with_only_last_name() {
        let c = Creator {
            last_name: Some("Curie".into()),
            ..Default::default()
        };
        assert_eq!(c.display_name().as_deref(), Some("Curie"));
        assert_eq!(Creator::default().display_name(), None);
    }
}
