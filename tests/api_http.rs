// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot; upstream sites
// are wiremock servers.
//
// Covered:
// - GET /health
// - unknown feed id -> 404 without touching any upstream
// - modify feed where every detail fetch fails -> 200, items unchanged, source order
// - modify feed with working detail pages -> titles/bodies rewritten, source order
// - upstream feed failure -> 412 with plain-text reason

use axum::{
    body::{self, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedproxy::extractors::dilbert::DilbertModifier;
use feedproxy::{router, AppState, ExtractorBinding, ProxyConfig, Registry};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests
const COMIC_FEED: &str = include_str!("fixtures/comic_feed.xml");

fn test_router(registry: Registry) -> Router {
    let state = AppState::with_registry(ProxyConfig::default(), registry).expect("state");
    router(state)
}

fn dilbert_registry(server: &MockServer) -> Registry {
    Registry::from_bindings([(
        "dilbert",
        ExtractorBinding::modify(&format!("{}/feed.xml", server.uri()), DilbertModifier),
    )])
}

async fn mount_comic_feed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(COMIC_FEED.replace("{{BASE}}", &server.uri())),
        )
        .mount(server)
        .await;
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "feeds.example")
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let ct = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, ct, String::from_utf8(bytes.to_vec()).expect("utf8"))
}

fn item_titles(xml: &str) -> Vec<String> {
    let feed = feed_rs::parser::parse(xml.as_bytes()).expect("served feed parses");
    feed.entries
        .into_iter()
        .map(|e| e.title.map(|t| t.content).unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router(Registry::default());
    let (status, _, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK, "health should be 200");
    assert_eq!(body.trim(), "OK");
}

#[tokio::test]
async fn unknown_feed_is_404_and_never_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_router(dilbert_registry(&server));
    let (status, _, _) = get(app.clone(), "/comics/garfield").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // lookup is case-sensitive
    let (status, _, _) = get(app, "/comics/Dilbert").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    server.verify().await;
}

#[tokio::test]
async fn failed_enrichment_leaves_items_unchanged() {
    let server = MockServer::start().await;
    mount_comic_feed(&server).await;
    Mock::given(method("GET"))
        .and(path_regex("^/strip/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let app = test_router(dilbert_registry(&server));
    let (status, ct, body) = get(app, "/comics/dilbert").await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(ct.as_deref(), Some("application/rss+xml; charset=utf-8"));
    assert_eq!(
        item_titles(&body),
        vec![
            "Comic for January 03, 2019",
            "Comic for January 02, 2019",
            "Comic for January 01, 2019",
        ]
    );
    assert!(body.contains("c3-200x150.png"), "original body kept: {body}");
    assert!(body.contains("<title>Daily Strip</title>"));
}

#[tokio::test]
async fn detail_pages_rewrite_items_in_source_order() {
    let server = MockServer::start().await;
    mount_comic_feed(&server).await;
    for (day, name) in [("03", "Third"), ("02", "Second"), ("01", "First")] {
        Mock::given(method("GET"))
            .and(path(format!("/strip/2019-01-{day}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<span class="comic-title-name">{name}</span><img class="img-comic" src="https://assets.example/{day}.gif">"#
            )))
            .mount(&server)
            .await;
    }

    let app = test_router(dilbert_registry(&server));
    let (status, _, body) = get(app, "/comics/dilbert").await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(
        item_titles(&body),
        vec![
            "Comic for January 03, 2019 - Third",
            "Comic for January 02, 2019 - Second",
            "Comic for January 01, 2019 - First",
        ]
    );
    assert!(body.contains("Third - Dilbert by Scott Adams"));
    assert!(!body.contains("200x150"));
}

#[tokio::test]
async fn upstream_failure_is_412_with_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = test_router(dilbert_registry(&server));
    let (status, _, body) = get(app, "/comics/dilbert").await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body.contains("HTTP 503"), "body: {body}");
}
