use std::time::Duration;

use newsfeed_core::{Article, FeedPage};
use newsfeed_engine::{FailureKind, FeedSource, GNewsSource, SourceSettings};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> GNewsSource {
    GNewsSource::new(SourceSettings {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..SourceSettings::default()
    })
    .expect("client")
}

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/json")
}

#[tokio::test]
async fn category_fetch_sends_paging_and_decodes_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("category", "sports"))
        .and(query_param("page", "2"))
        .and(query_param("max", "10"))
        .and(query_param("lang", "en"))
        .and(query_param("country", "us"))
        .and(query_param("apikey", "test-key"))
        .respond_with(json_response(
            r#"{
                "totalArticles": 35,
                "articles": [
                    {
                        "title": "Final score",
                        "description": "A close game.",
                        "url": "https://sports.example.com/final",
                        "image": "https://sports.example.com/final.jpg",
                        "publishedAt": "2024-05-01T18:30:00Z",
                        "source": { "name": "Sports Daily", "url": "https://sports.example.com" }
                    },
                    {
                        "title": "Trade rumours",
                        "url": "https://sports.example.com/trade",
                        "source": { "name": "Sports Daily" }
                    }
                ]
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let page = source_for(&server)
        .fetch_category("sports", 2, 10)
        .await
        .expect("fetch ok");

    assert_eq!(page.total_count, Some(35));
    assert_eq!(
        page.articles[0],
        Article {
            url: "https://sports.example.com/final".to_string(),
            title: "Final score".to_string(),
            description: Some("A close game.".to_string()),
            image: Some("https://sports.example.com/final.jpg".to_string()),
            source_name: Some("Sports Daily".to_string()),
            published_at: Some("2024-05-01T18:30:00Z".to_string()),
        }
    );
    assert_eq!(page.articles[1].description, None);
    assert_eq!(page.articles[1].image, None);
}

#[tokio::test]
async fn search_fetch_encodes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust & wasm"))
        .and(query_param("page", "1"))
        .respond_with(json_response(r#"{"articles": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    let page = source_for(&server)
        .fetch_search("rust & wasm", 1, 10)
        .await
        .expect("fetch ok");
    assert_eq!(page, FeedPage::new(Vec::new(), None));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = source_for(&server)
        .fetch_category("general", 1, 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = source_for(&server)
        .fetch_category("general", 1, 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            json_response(r#"{"articles": []}"#).set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    let source = GNewsSource::new(SourceSettings {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        request_timeout: Duration::from_millis(50),
        ..SourceSettings::default()
    })
    .unwrap();

    let err = source.fetch_search("slow", 1, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(!err.message.contains("test-key"));
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(json_response(r#"{"totalArticles": 0, "articles": []}"#))
        .mount(&server)
        .await;

    let source = GNewsSource::new(SourceSettings {
        base_url: server.uri(),
        max_bytes: 8,
        ..SourceSettings::default()
    })
    .unwrap();

    let err = source.fetch_category("general", 1, 10).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 8, .. }
    ));
}
