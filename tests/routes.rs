mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;
use url_shortener::routes::app_router;

#[tokio::test]
async fn test_full_router_shorten_then_redirect() {
    let (state, _pool) = common::create_test_state().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/shorten/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"url":"example.com"}"#))
        .unwrap();

    let response = app_router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let short_id = json["short_id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/{short_id}"))
        .body(Body::empty())
        .unwrap();

    let response = app_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/"
    );
}

#[tokio::test]
async fn test_full_router_health() {
    let (state, _pool) = common::create_test_state().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_router_unknown_identifier() {
    let (state, _pool) = common::create_test_state().await;

    let request = Request::builder()
        .uri("/zzzzzz/info")
        .body(Body::empty())
        .unwrap();

    let response = app_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_router_redirects_to_serialized_url() {
    let (state, _pool) = common::create_test_state().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/shorten")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"url":"Example.COM/a b?q=1"}"#))
        .unwrap();

    let response = app_router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let short_id = json["short_id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/{short_id}"))
        .body(Body::empty())
        .unwrap();

    let response = app_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a%20b?q=1"
    );
}
