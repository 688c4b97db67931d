use std::sync::Arc;
use std::time::Duration;

use outlet::headless;
use outlet::routes::{self, LoaderSource};
use outlet::routing::{
    HttpLoader, LoadContext, Loader, LoaderFailure, RouteId, RouteParams,
};
use outlet::tui::view_lines::plain_text;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn context(route_path: &str) -> LoadContext {
    LoadContext {
        route: RouteId::new("routes/users+/$username"),
        path: route_path.to_string(),
        params: RouteParams::new(),
    }
}

// ============================================================================
// HttpLoader
// ============================================================================

#[tokio::test]
async fn test_http_loader_returns_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/jake"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Jake" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = HttpLoader::new("user", &format!("{}/api", mock_server.uri()));
    let value = loader.load(&context("/users/jake")).await.unwrap();

    assert_eq!(value, json!({ "name": "Jake" }));
}

#[tokio::test]
async fn test_http_loader_404_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let loader = HttpLoader::new("user", &mock_server.uri());
    let result = loader.load(&context("/users/nobody")).await;

    assert_eq!(result, Err(LoaderFailure::NotFound("/users/nobody".to_string())));
}

#[tokio::test]
async fn test_http_loader_server_error_is_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jake"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let loader = HttpLoader::new("user", &mock_server.uri());
    let result = loader.load(&context("/users/jake")).await;

    assert_eq!(
        result,
        Err(LoaderFailure::Status {
            status: 503,
            message: "maintenance".to_string()
        })
    );
}

#[tokio::test]
async fn test_http_loader_bad_json_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jake"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let loader = HttpLoader::new("user", &mock_server.uri());
    let result = loader.load(&context("/users/jake")).await;

    assert!(matches!(result, Err(LoaderFailure::Parse(_))));
}

#[tokio::test]
async fn test_http_loader_connection_refused_is_network_error() {
    // Nothing listens on port 9 (discard) in test environments.
    let loader = HttpLoader::new("user", "http://127.0.0.1:9");
    let result = loader.load(&context("/users/jake")).await;

    assert!(matches!(result, Err(LoaderFailure::Network(_))));
}

// ============================================================================
// Demo routes over HTTP
// ============================================================================

#[tokio::test]
async fn test_demo_routes_render_from_api() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jake"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "Jake Remote", "bio": "Served over HTTP" })),
        )
        .mount(&mock_server)
        .await;

    let tree = Arc::new(routes::tree(&LoaderSource::http(&mock_server.uri())).unwrap());
    let navigator = headless::render(tree, "/users/jake", Duration::from_secs(5)).await;
    let text = plain_text(&navigator.view(), 80);

    assert!(text.contains("Jake Remote"));
    assert!(text.contains("Served over HTTP"));
}

#[tokio::test]
async fn test_api_404_reaches_error_boundary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let tree = Arc::new(routes::tree(&LoaderSource::http(&mock_server.uri())).unwrap());
    let navigator = headless::render(tree, "/users/nobody", Duration::from_secs(5)).await;
    let text = plain_text(&navigator.view(), 80);

    assert!(text.contains("Epic Notes"));
    assert!(text.contains("Could not load this user"));
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jake"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "Jake" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let tree = Arc::new(routes::tree(&LoaderSource::http(&mock_server.uri())).unwrap());
    let navigator = headless::render(tree, "/users/jake", Duration::from_millis(50)).await;
    let text = plain_text(&navigator.view(), 80);

    assert!(text.contains("timed out after 50ms"));
}
