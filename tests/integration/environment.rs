// tests/integration/environment.rs
use super::{create_test_config, create_test_state, echo_llm, empty_request};
use axum::http::{header, Request, StatusCode};
use dstl_chat::{api::build_app, config::Config};
use tempfile::TempDir;
use tower::ServiceExt;

fn production_config(static_dir: &TempDir) -> Config {
    Config {
        environment: "production".to_string(),
        static_dir: static_dir.path().display().to_string(),
        ..create_test_config()
    }
}

#[tokio::test]
async fn test_production_serves_frontend_bundle() {
    let static_dir = TempDir::new().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>chat</h1>").unwrap();

    let app = build_app(create_test_state(echo_llm(), production_config(&static_dir)).await);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/app/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>chat</h1>");

    // API stays available next to the bundle
    let response = app
        .oneshot(empty_request("GET", "/conversations/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_development_does_not_serve_frontend() {
    let static_dir = TempDir::new().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>chat</h1>").unwrap();

    let config = Config {
        environment: "development".to_string(),
        ..production_config(&static_dir)
    };
    let app = build_app(create_test_state(echo_llm(), config).await);

    let response = app
        .oneshot(empty_request("GET", "/app/index.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = build_app(create_test_state(echo_llm(), create_test_config()).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/conversations/")
                .header(header::ORIGIN, "http://frontend.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
