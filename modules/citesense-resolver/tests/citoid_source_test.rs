//! End-to-end through the real Citoid client against a local mock server.

use std::time::Duration;

use citesense_common::{Config, DEBUG_ERROR_KEY};
use citesense_resolver::MetadataPipeline;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        citoid_base_url: format!("{}/api/rest_v1/data/citation/zotero", server.uri()),
        request_timeout: Duration::from_secs(2),
        max_concurrency: 4,
        ..Config::default()
    }
}

#[tokio::test]
async fn mixed_batch_through_citoid_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/zotero/https%3A%2F%2Farxiv\.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "itemType": "preprint",
            "title": "A Preprint",
            "abstractNote": "We study the thing in considerable and exhausting detail.",
            "creators": [{"firstName": "Grace", "lastName": "Hopper", "creatorType": "author"}],
            "date": "2023-11-06",
            "url": "https://arxiv.org/abs/2311.03348"
        }])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/zotero/httpsss"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid URL"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/zotero/https%3A%2F%2Fslow\.example"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let http = config.http_client().unwrap();
    let pipeline = MetadataPipeline::from_config(&config, http).unwrap();

    let inputs = vec![
        "https://arxiv.org/abs/2311.03348".to_string(),
        "httpsss://ept.ms/3VUYqTRsdfs/ff".to_string(),
        "https://slow.example/page".to_string(),
    ];
    let records = pipeline.extract_metadata(&inputs, 30).await.unwrap();

    assert_eq!(records.len(), 3);

    let paper = &records[0];
    assert_eq!(paper.url, inputs[0]);
    assert_eq!(paper.item_type.as_deref(), Some("preprint"));
    assert_eq!(paper.title.as_deref(), Some("A Preprint"));
    assert_eq!(paper.summary.as_deref().map(|s| s.chars().count()), Some(30));
    assert_eq!(paper.authors, vec!["Grace Hopper"]);
    assert!(paper.debug.is_empty());

    let bad = &records[1];
    assert_eq!(bad.url, inputs[1]);
    assert!(bad.debug.contains_key(DEBUG_ERROR_KEY));
    assert_eq!(bad.debug.get("status").map(String::as_str), Some("400"));

    let slow = &records[2];
    assert_eq!(slow.url, inputs[2]);
    assert!(slow.debug.contains_key(DEBUG_ERROR_KEY));
}
