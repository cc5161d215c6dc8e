use std::time::Duration;

use feed_engine::{FailureKind, FetchSettings, PageSource, PhotoRecord, ReqwestPageSource};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"[
  {"id":"0","author":"Alejandro Escamilla","width":5000,"height":3333,
   "url":"https://unsplash.com/photos/yC-Yzbqy7PY",
   "download_url":"https://picsum.photos/id/0/5000/3333"},
  {"id":"1","author":"Paul Jarvis","width":2500,"height":1667,
   "url":"https://unsplash.com/photos/LNRyGwIJr5c",
   "download_url":"https://picsum.photos/id/1/2500/1667"}
]"#;

fn source_for(server: &MockServer, settings: FetchSettings) -> ReqwestPageSource {
    let settings = FetchSettings {
        base_url: format!("{}/v2/list", server.uri()),
        ..settings
    };
    ReqwestPageSource::new(settings).expect("client")
}

#[tokio::test]
async fn source_requests_page_and_limit_and_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .and(query_param("page", "3"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LISTING, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server, FetchSettings::default());
    let photos = source.fetch_page(3, 10).await.expect("fetch ok");

    assert_eq!(
        photos,
        vec![
            PhotoRecord {
                id: "0".to_string(),
                author: "Alejandro Escamilla".to_string(),
                width: 5000,
                height: 3333,
                url: "https://unsplash.com/photos/yC-Yzbqy7PY".to_string(),
                download_url: "https://picsum.photos/id/0/5000/3333".to_string(),
            },
            PhotoRecord {
                id: "1".to_string(),
                author: "Paul Jarvis".to_string(),
                width: 2500,
                height: 1667,
                url: "https://unsplash.com/photos/LNRyGwIJr5c".to_string(),
                download_url: "https://picsum.photos/id/1/2500/1667".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn page_url_carries_query() {
    let server = MockServer::start().await;
    let source = source_for(&server, FetchSettings::default());
    let url = source.page_url(2, 10).expect("url");
    assert_eq!(url.query(), Some("page=2&limit=10"));
    assert!(url.path().ends_with("/v2/list"));
}

#[tokio::test]
async fn source_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = source_for(&server, FetchSettings::default());
    let err = source.fetch_page(1, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert!(err.is_transient());
}

#[tokio::test]
async fn source_rejects_malformed_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"not":"a list"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let source = source_for(&server, FetchSettings::default());
    let err = source.fetch_page(1, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
    assert!(!err.is_transient());
}

#[tokio::test]
async fn source_rejects_unexpected_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let source = source_for(&server, FetchSettings::default());
    let err = source.fetch_page(1, 10).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn source_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("[]", "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let source = source_for(&server, settings);
    let err = source.fetch_page(1, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn source_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LISTING, "application/json"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let source = source_for(&server, settings);
    let err = source.fetch_page(1, 10).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(LISTING.len() as u64)
        }
    );
}
